use inspekt_core::segment::LineSegment;

/// Ordered log of the segments drawn on a surface.
///
/// The log only grows at the end while drawing and only shrinks from the
/// end on undo. Clearing or committing the surface empties it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SketchHistory {
    segments: Vec<LineSegment>,
}

impl SketchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished segment.
    pub fn push(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    /// Removes and returns the most recent segment.
    pub fn pop_last(&mut self) -> Option<LineSegment> {
        self.segments.pop()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineSegment> {
        self.segments.iter()
    }
}
