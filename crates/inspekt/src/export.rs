//! Export functionality for inspection reports.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a laid-out document into downloadable bytes. It is the final
//! stage of report assembly.
//!
//! # Pipeline Position
//!
//! ```text
//! Report
//!     ↓ layout
//! DocumentLayout
//!     ↓ export (this module)
//! ExportArtifact
//! ```
//!
//! # Available Backends
//!
//! - [`pdf`] - Paginated PDF via [`pdf::PdfExporter`]
//! - [`svg`] - Stacked-page SVG preview via [`svg::SvgExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`InspektError::Export`] at the crate boundary.
//!
//! [`InspektError::Export`]: crate::InspektError::Export

pub mod pdf;
pub mod svg;

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;

use inspekt_core::raster::RasterError;

use crate::{layout::DocumentLayout, photo::SkippedPhoto};

/// Abstraction for document export backends.
pub trait Exporter {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    /// Serialises a document layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] when an embedded image cannot be decoded and
    /// [`Error::Render`] when the backend fails to produce its output.
    fn export_document(&mut self, layout: &DocumentLayout) -> Result<Vec<u8>, Error>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Svg,
}

impl ExportFormat {
    /// Creates the exporter for this format.
    pub fn exporter(self, title: &str) -> Box<dyn Exporter> {
        match self {
            Self::Pdf => Box::new(pdf::PdfExporter::new(title)),
            Self::Svg => Box::new(svg::SvgExporter::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            _ => Err(format!("invalid export format `{s}`, valid values: pdf, svg")),
        }
    }
}

/// The result of exporting a report.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    file_name: String,
    bytes: Vec<u8>,
    page_count: usize,
    skipped: Vec<SkippedPhoto>,
}

impl ExportArtifact {
    pub(crate) fn new(
        file_name: String,
        bytes: Vec<u8>,
        page_count: usize,
        skipped: Vec<SkippedPhoto>,
    ) -> Self {
        Self {
            file_name,
            bytes,
            page_count,
            skipped,
        }
    }

    /// Suggested download file name, including the extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Photos that were left out because they could not be decoded.
    pub fn skipped(&self) -> &[SkippedPhoto] {
        &self.skipped
    }

    /// Writes the artifact bytes to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        fs::write(path, &self.bytes).map_err(Error::Io)
    }
}

/// Errors that can occur during document export.
///
/// This type is converted into [`InspektError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`InspektError::Export`]: crate::InspektError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or serialisation failure described by `message`.
    Render(String),
    /// An embedded image could not be decoded.
    Image(RasterError),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Image(err) => write!(f, "Image error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RasterError> for Error {
    fn from(err: RasterError) -> Self {
        Self::Image(err)
    }
}

/// Turns a client name into a safe file stem.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced with `_`. Blank names fall back to `default`.
pub fn file_stem(client_name: &str, default: &str) -> String {
    let stem: String = client_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.').trim();
    if stem.is_empty() {
        default.to_string()
    } else {
        stem.to_string()
    }
}
