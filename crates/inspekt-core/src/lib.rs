//! Inspekt Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Inspekt report
//! builder. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Strokes**: Line appearance for sketch segments ([`stroke`] module)
//! - **Segments**: Straight strokes captured on a sketch surface ([`segment::LineSegment`])
//! - **Raster**: Encoded raster images and `data:` URL handling ([`raster`] module)

pub mod color;
pub mod geometry;
pub mod raster;
pub mod segment;
pub mod stroke;
