//! Error types for Inspekt operations.
//!
//! This module provides the main error type [`InspektError`] which wraps the
//! error conditions that can occur while capturing sketches, normalising
//! photos and assembling a report.

use std::io;

use thiserror::Error;

use inspekt_core::raster::RasterError;

/// The main error type for Inspekt operations.
#[derive(Debug, Error)]
pub enum InspektError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] RasterError),

    #[error("Photo `{name}` could not be read: {reason}")]
    Photo { name: String, reason: String },

    #[error("Unsupported file `{0}`: only image files are accepted")]
    UnsupportedFile(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Note storage error: {0}")]
    Notes(String),
}

impl From<crate::export::Error> for InspektError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl InspektError {
    /// Create a new `Photo` error for the named photo.
    pub fn new_photo_error(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Photo {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
