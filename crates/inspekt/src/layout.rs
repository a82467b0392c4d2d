//! Document layout for inspection reports.
//!
//! This module turns a [`Report`](crate::report::Report) into a
//! [`DocumentLayout`]: pages of text and image elements at fixed positions,
//! expressed in millimetres with a top-left origin.
//!
//! # Pipeline Position
//!
//! ```text
//! Report + normalised photos
//!     ↓ layout (this module)
//! DocumentLayout
//!     ↓ export
//! PDF / SVG bytes
//! ```
//!
//! # Submodules
//!
//! - `assembler` - Places the report blocks and breaks pages
//! - `cursor` - The running vertical position
//! - `document` - The positioned output model
//! - [`text`] - Text measurement and wrapping

mod assembler;
mod cursor;
mod document;
pub mod text;

pub use assembler::Assembler;
pub use cursor::Cursor;
pub use document::{
    DocumentLayout, Element, ImageElement, ImageId, ImageKind, Page, TextElement,
};
