//! Straight line segments captured on a sketch surface.

use crate::{
    geometry::{Bounds, Point},
    stroke::StrokeDefinition,
};

/// One straight stroke captured between pointer-down and pointer-up.
///
/// While a gesture is in progress the surface moves the end point with
/// [`LineSegment::set_end`]; once the segment has been appended to a history
/// it is only ever read.
///
/// # Examples
///
/// ```
/// # use inspekt_core::{geometry::Point, segment::LineSegment, stroke::StrokeDefinition};
/// let mut segment = LineSegment::new(Point::new(10.0, 10.0), StrokeDefinition::default());
/// assert!(segment.is_degenerate());
///
/// segment.set_end(Point::new(40.0, 50.0));
/// assert_eq!(segment.length(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Point,
    end: Point,
    stroke: StrokeDefinition,
}

impl LineSegment {
    /// Creates a zero-length segment anchored at `start`.
    pub fn new(start: Point, stroke: StrokeDefinition) -> Self {
        Self {
            start,
            end: start,
            stroke,
        }
    }

    /// Creates a segment between two points.
    pub fn between(start: Point, end: Point, stroke: StrokeDefinition) -> Self {
        Self { start, end, stroke }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Moves the end point of the segment.
    pub fn set_end(&mut self, end: Point) {
        self.end = end;
    }

    /// Length of the segment.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// A segment created by a click without movement.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Area touched by the segment including half the stroke width on every side.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.start, self.end).expand(self.stroke.width() / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_segment_new_is_degenerate() {
        let segment = LineSegment::new(Point::new(5.0, 5.0), StrokeDefinition::default());
        assert!(segment.is_degenerate());
        assert_approx_eq!(f32, segment.length(), 0.0);
        assert_eq!(segment.start(), segment.end());
    }

    #[test]
    fn test_segment_set_end() {
        let mut segment = LineSegment::new(Point::new(0.0, 0.0), StrokeDefinition::default());
        segment.set_end(Point::new(6.0, 8.0));
        assert!(!segment.is_degenerate());
        assert_approx_eq!(f32, segment.length(), 10.0);
        assert_eq!(segment.start(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_segment_bounds_include_stroke_width() {
        let segment = LineSegment::between(
            Point::new(10.0, 20.0),
            Point::new(30.0, 20.0),
            StrokeDefinition::default(),
        );
        let bounds = segment.bounds();
        assert_approx_eq!(f32, bounds.min_x(), 9.0);
        assert_approx_eq!(f32, bounds.max_x(), 31.0);
        assert_approx_eq!(f32, bounds.min_y(), 19.0);
        assert_approx_eq!(f32, bounds.max_y(), 21.0);
    }
}
