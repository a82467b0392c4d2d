use image::RgbaImage;
use log::{debug, info, trace};
use serde::Deserialize;

use inspekt_core::{
    color::Color,
    geometry::{Point, Size},
    raster::RasterImage,
    segment::LineSegment,
    stroke::StrokeDefinition,
};

use super::{SketchHistory, SketchSnapshot, render};
use crate::{config::SketchConfig, error::InspektError};

/// What happens to an in-progress stroke when the pointer leaves the surface
/// or the gesture is cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelPolicy {
    /// Drop the in-progress segment.
    #[default]
    Discard,
    /// Keep the segment as if the pointer had been released.
    Finalize,
}

/// Relationship between the viewport and the surface size.
#[derive(Debug, Clone, Copy)]
struct Sizing {
    width_ratio: f32,
    height_ratio: f32,
    max_height: f32,
}

impl Sizing {
    fn surface_size(&self, viewport: Size) -> (u32, u32) {
        let width = (viewport.width() * self.width_ratio).round().max(1.0);
        let height = (viewport.height() * self.height_ratio)
            .min(self.max_height)
            .round()
            .max(1.0);
        (width as u32, height as u32)
    }
}

/// An interactive freehand surface capturing straight line segments.
///
/// Each pointer gesture produces one straight segment from the press point
/// to the release point. Finished segments are kept in a [`SketchHistory`]
/// and the pixels are always rebuilt from that history, so undo and resize
/// never lose or invent strokes.
///
/// Owners interact with the surface only through pointer events and the
/// capability methods [`clear`](Self::clear), [`undo_last`](Self::undo_last)
/// and [`commit`](Self::commit).
///
/// # Examples
///
/// ```
/// # use inspekt::{config::SketchConfig, sketch::SketchSurface};
/// # use inspekt_core::geometry::{Point, Size};
/// # fn main() -> Result<(), inspekt::InspektError> {
/// let mut surface = SketchSurface::new(&SketchConfig::default(), Size::new(1000.0, 800.0))?;
/// assert_eq!(surface.size(), (900, 500));
///
/// surface.pointer_down(Point::new(10.0, 10.0));
/// surface.pointer_move(Point::new(200.0, 120.0));
/// surface.pointer_up();
/// assert_eq!(surface.history().len(), 1);
///
/// let snapshot = surface.commit()?;
/// assert_eq!((snapshot.width(), snapshot.height()), (900, 500));
/// assert!(surface.history().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SketchSurface {
    background: Color,
    stroke: StrokeDefinition,
    cancel_policy: CancelPolicy,
    sizing: Sizing,
    history: SketchHistory,
    active: Option<LineSegment>,
    /// Background plus every finished segment.
    settled: RgbaImage,
    /// What is shown: `settled` plus the in-progress segment.
    visible: RgbaImage,
}

impl SketchSurface {
    /// Creates an empty surface sized for `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Config`] when the configured colors or stroke
    /// are invalid.
    pub fn new(config: &SketchConfig, viewport: Size) -> Result<Self, InspektError> {
        let background = config.background().map_err(InspektError::Config)?;
        let stroke = config.stroke().map_err(InspektError::Config)?;
        let sizing = Sizing {
            width_ratio: config.width_ratio(),
            height_ratio: config.height_ratio(),
            max_height: config.max_height(),
        };
        let (width, height) = sizing.surface_size(viewport);
        debug!(width, height; "Creating sketch surface");

        let mut surface = Self {
            background,
            stroke,
            cancel_policy: config.cancel_policy(),
            sizing,
            history: SketchHistory::new(),
            active: None,
            settled: RgbaImage::new(width, height),
            visible: RgbaImage::new(width, height),
        };
        surface.rebuild();
        Ok(surface)
    }

    /// Pixel dimensions of the surface.
    pub fn size(&self) -> (u32, u32) {
        self.visible.dimensions()
    }

    /// Committed segments, oldest first.
    pub fn history(&self) -> &SketchHistory {
        &self.history
    }

    /// Returns `true` while a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// The segment currently being drawn.
    pub fn active_segment(&self) -> Option<&LineSegment> {
        self.active.as_ref()
    }

    /// The rendered surface.
    pub fn pixels(&self) -> &RgbaImage {
        &self.visible
    }

    /// The pen applied to new segments.
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Changes the pen used for segments started from now on.
    pub fn set_stroke(&mut self, stroke: StrokeDefinition) {
        self.stroke = stroke;
    }

    /// Starts a new segment at `point`.
    ///
    /// A press while a gesture is already in progress finishes that gesture
    /// first. Non-finite points are ignored.
    pub fn pointer_down(&mut self, point: Point) {
        if !point.is_finite() {
            debug!("Ignoring non-finite pointer position");
            return;
        }
        if self.active.is_some() {
            self.pointer_up();
        }
        trace!(x = point.x(), y = point.y(); "Segment started");
        self.active = Some(LineSegment::new(point, self.stroke.clone()));
        self.present();
    }

    /// Moves the end of the in-progress segment. No-op while idle.
    pub fn pointer_move(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.set_end(point);
            self.present();
        }
    }

    /// Finishes the in-progress segment and records it. No-op while idle.
    pub fn pointer_up(&mut self) {
        if let Some(segment) = self.active.take() {
            trace!(length = segment.length(); "Segment finished");
            render::draw_segment(&mut self.settled, &segment);
            self.history.push(segment);
            self.present();
        }
    }

    /// Handles the pointer leaving the surface according to the
    /// [`CancelPolicy`]. No-op while idle.
    pub fn pointer_cancel(&mut self) {
        if self.active.is_none() {
            return;
        }
        match self.cancel_policy {
            CancelPolicy::Discard => {
                debug!("Discarding cancelled segment");
                self.active = None;
                self.present();
            }
            CancelPolicy::Finalize => self.pointer_up(),
        }
    }

    /// Removes every segment, including one in progress, and repaints the
    /// background. Clearing an empty surface changes nothing.
    pub fn clear(&mut self) {
        self.history.clear();
        self.active = None;
        self.rebuild();
    }

    /// Removes the most recent finished segment and returns it.
    ///
    /// Returns `None` and leaves the surface untouched when the history is
    /// empty.
    pub fn undo_last(&mut self) -> Option<LineSegment> {
        let removed = self.history.pop_last()?;
        debug!(remaining = self.history.len(); "Undid last segment");
        self.rebuild();
        Some(removed)
    }

    /// Flattens what is currently shown into a PNG snapshot, then clears the
    /// surface.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Image`] if PNG encoding fails. The surface is
    /// left untouched in that case.
    pub fn commit(&mut self) -> Result<SketchSnapshot, InspektError> {
        let image = RasterImage::encode_png(&self.visible)?;
        info!(
            segments = self.history.len(),
            width = image.width(),
            height = image.height();
            "Sketch committed"
        );
        self.clear();
        Ok(SketchSnapshot::new(image))
    }

    /// Resizes the surface for a new viewport and replays every segment.
    pub fn resize(&mut self, viewport: Size) {
        let (width, height) = self.sizing.surface_size(viewport);
        if (width, height) == self.size() {
            return;
        }
        debug!(width, height, segments = self.history.len(); "Resizing sketch surface");
        self.settled = RgbaImage::new(width, height);
        self.visible = RgbaImage::new(width, height);
        self.rebuild();
    }

    /// Repaints the settled layer from the history, then the visible layer.
    fn rebuild(&mut self) {
        render::fill(&mut self.settled, self.background);
        for segment in self.history.iter() {
            render::draw_segment(&mut self.settled, segment);
        }
        self.present();
    }

    fn present(&mut self) {
        self.visible.clone_from(&self.settled);
        if let Some(active) = &self.active {
            render::draw_segment(&mut self.visible, active);
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (0.0f32..160.0, 0.0f32..80.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn gestures_strategy() -> impl Strategy<Value = Vec<(Point, Point)>> {
        prop::collection::vec((point_strategy(), point_strategy()), 0..12)
    }

    fn viewport_strategy() -> impl Strategy<Value = Size> {
        (1.0f32..800.0, 1.0f32..800.0).prop_map(|(w, h)| Size::new(w, h))
    }

    fn surface_with(gestures: &[(Point, Point)]) -> SketchSurface {
        let mut surface =
            SketchSurface::new(&SketchConfig::default(), Size::new(180.0, 100.0)).unwrap();
        for (from, to) in gestures {
            surface.pointer_down(*from);
            surface.pointer_move(*to);
            surface.pointer_up();
        }
        surface
    }

    // ===================
    // Property Test Functions
    // ===================

    /// N gestures followed by N undos return the surface to its initial state.
    fn check_undo_unwinds_all_gestures(gestures: &[(Point, Point)]) -> Result<(), TestCaseError> {
        let initial = surface_with(&[]);
        let mut surface = surface_with(gestures);
        prop_assert_eq!(surface.history().len(), gestures.len());

        for (from, _) in gestures.iter().rev() {
            let removed = surface.undo_last();
            prop_assert_eq!(removed.map(|s| s.start()), Some(*from));
        }
        prop_assert!(surface.history().is_empty());
        prop_assert_eq!(surface.pixels(), initial.pixels());

        // One more undo is a no-op
        prop_assert!(surface.undo_last().is_none());
        prop_assert_eq!(surface.pixels(), initial.pixels());
        Ok(())
    }

    /// Resizing keeps every segment and matches a fresh replay at the new size.
    fn check_resize_preserves_segments(
        gestures: &[(Point, Point)],
        viewport: Size,
    ) -> Result<(), TestCaseError> {
        let mut surface = surface_with(gestures);
        let before = surface.history().clone();
        surface.resize(viewport);
        prop_assert_eq!(surface.history(), &before);

        let mut replayed = SketchSurface::new(&SketchConfig::default(), viewport).unwrap();
        for (from, to) in gestures {
            replayed.pointer_down(*from);
            replayed.pointer_move(*to);
            replayed.pointer_up();
        }
        prop_assert_eq!(surface.pixels(), replayed.pixels());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn undo_unwinds_all_gestures(gestures in gestures_strategy()) {
            check_undo_unwinds_all_gestures(&gestures)?;
        }

        #[test]
        fn resize_preserves_segments(gestures in gestures_strategy(), viewport in viewport_strategy()) {
            check_resize_preserves_segments(&gestures, viewport)?;
        }
    }
}
