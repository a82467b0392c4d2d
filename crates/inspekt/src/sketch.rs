//! Freehand sketch capture.
//!
//! A [`SketchSurface`] turns pointer gestures into straight line segments,
//! keeps them in a [`SketchHistory`] with single-step undo, and flattens them
//! into a [`SketchSnapshot`] on commit.
//!
//! # Submodules
//!
//! - `surface` - The pointer state machine and its capability interface
//! - `history` - The append-only segment log
//! - `snapshot` - Committed, flattened sketches
//! - `render` - Anti-aliased segment rasterisation

mod history;
mod render;
mod snapshot;
mod surface;

pub use history::SketchHistory;
pub use snapshot::SketchSnapshot;
pub use surface::{CancelPolicy, SketchSurface};
