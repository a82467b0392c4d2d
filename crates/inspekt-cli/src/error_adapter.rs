//! Error adapter for converting InspektError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use inspekt::InspektError;

/// Adapter giving an [`InspektError`] a diagnostic code and, where one
/// applies, a hint on how to fix it.
pub struct ErrorAdapter<'a>(pub &'a InspektError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            InspektError::Io(_) => "inspekt::io",
            InspektError::Config(_) => "inspekt::config",
            InspektError::Image(_) => "inspekt::image",
            InspektError::Photo { .. } => "inspekt::photo",
            InspektError::UnsupportedFile(_) => "inspekt::unsupported_file",
            InspektError::Export(_) => "inspekt::export",
            InspektError::Notes(_) => "inspekt::notes",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            InspektError::Photo { .. } => {
                "set `photo_errors = \"skip\"` in the [export] section to leave unreadable photos out"
            }
            InspektError::UnsupportedFile(_) => "only PNG, JPEG and other image files can be attached",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap an [`InspektError`] for rendering with miette.
pub fn to_reportable(err: &InspektError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
