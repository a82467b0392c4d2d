//! Stroke definitions for sketch line segments.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width and cap of a line
//! - [`StrokeCap`]: how line endpoints are rendered (butt, round, square)
//!
//! Widths are expressed in surface pixels.

use std::str::FromStr;

use crate::color::Color;

/// Defines how line endpoints are rendered.
///
/// Follows the canvas/SVG `linecap` semantics. `Butt` is the default, so a
/// zero-length segment draws nothing unless a round or square cap is chosen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    /// Flat cap at the exact endpoint
    #[default]
    Butt,
    /// Rounded cap extending beyond the endpoint by half the stroke width
    Round,
    /// Square cap extending beyond the endpoint by half the stroke width
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

impl FromStr for StrokeCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "square" => Ok(Self::Square),
            _ => Err(format!(
                "invalid stroke cap `{s}`, valid values: butt, round, square"
            )),
        }
    }
}

/// A stroke definition for rendering sketch lines.
///
/// # Examples
///
/// ```
/// use inspekt_core::stroke::{StrokeCap, StrokeDefinition};
/// use inspekt_core::color::Color;
///
/// // Default sketch pen (black, 2px, butt caps)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(stroke.width(), 2.0);
///
/// let mut marker = StrokeDefinition::new(Color::new("red").unwrap(), 6.0);
/// marker.set_cap(StrokeCap::Round);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    cap: StrokeCap,
}

impl StrokeDefinition {
    /// Creates a new stroke with the given color and width and butt caps.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: StrokeCap::default(),
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Sets the stroke cap style.
    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 2.0)
    }
}
