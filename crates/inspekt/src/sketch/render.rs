//! Software rasterisation of sketch segments.
//!
//! Segments are drawn as anti-aliased thick lines. Coverage of every pixel
//! near a segment is derived from the distance between the pixel centre and
//! the stroked shape, then the stroke color is composited source-over.

use image::{Rgba, RgbaImage};

use inspekt_core::{
    color::Color,
    geometry::Point,
    segment::LineSegment,
    stroke::StrokeCap,
};

/// Fills the whole buffer with `color`.
pub fn fill(buffer: &mut RgbaImage, color: Color) {
    let pixel = Rgba(color.to_rgba8());
    for p in buffer.pixels_mut() {
        *p = pixel;
    }
}

/// Draws one segment onto the buffer.
///
/// Pixels outside the buffer are clipped. With a butt cap a zero-length
/// segment covers nothing.
pub fn draw_segment(buffer: &mut RgbaImage, segment: &LineSegment) {
    let stroke = segment.stroke();
    let half_width = stroke.width() / 2.0;
    if half_width <= 0.0 || !segment.start().is_finite() || !segment.end().is_finite() {
        return;
    }

    let bounds = segment.bounds().expand(1.0);
    let (width, height) = buffer.dimensions();
    let min_x = bounds.min_x().floor().max(0.0) as u32;
    let min_y = bounds.min_y().floor().max(0.0) as u32;
    let max_x = (bounds.max_x().ceil().max(0.0) as u32).min(width);
    let max_y = (bounds.max_y().ceil().max(0.0) as u32).min(height);

    let [r, g, b, a] = stroke.color().to_rgba8();
    let opacity = a as f32 / 255.0;
    let shape = StrokeShape::new(segment, half_width, stroke.cap());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = shape.coverage(centre) * opacity;
            if coverage > 0.0 {
                blend(buffer.get_pixel_mut(x, y), [r, g, b], coverage);
            }
        }
    }
}

/// The stroked area of a segment in its own axis-aligned frame.
struct StrokeShape {
    origin: Point,
    /// Unit direction from start to end. Arbitrary for zero-length segments.
    axis: Point,
    length: f32,
    half_width: f32,
    cap: StrokeCap,
}

impl StrokeShape {
    fn new(segment: &LineSegment, half_width: f32, cap: StrokeCap) -> Self {
        let delta = segment.end().sub_point(segment.start());
        let length = delta.hypot();
        let axis = if length > f32::EPSILON {
            delta.scale(1.0 / length)
        } else {
            Point::new(1.0, 0.0)
        };
        Self {
            origin: segment.start(),
            axis,
            length,
            half_width,
            cap,
        }
    }

    /// Fraction of the pixel centred at `p` covered by the stroke, in `[0, 1]`.
    fn coverage(&self, p: Point) -> f32 {
        let rel = p.sub_point(self.origin);
        let along = rel.x() * self.axis.x() + rel.y() * self.axis.y();
        let across = (rel.x() * -self.axis.y() + rel.y() * self.axis.x()).abs();

        match self.cap {
            StrokeCap::Round => {
                let t = along.clamp(0.0, self.length);
                let distance = Point::new(along - t, across).hypot();
                edge_coverage(self.half_width - distance)
            }
            StrokeCap::Butt if self.length <= f32::EPSILON => 0.0,
            StrokeCap::Butt => self.box_coverage(along, across, 0.0),
            StrokeCap::Square => self.box_coverage(along, across, self.half_width),
        }
    }

    fn box_coverage(&self, along: f32, across: f32, extension: f32) -> f32 {
        let inside_along = (along + extension).min(self.length + extension - along);
        let inside_across = self.half_width - across;
        edge_coverage(inside_along).min(edge_coverage(inside_across))
    }
}

/// Maps the signed distance of a pixel centre inside an edge to coverage.
fn edge_coverage(inside: f32) -> f32 {
    (inside + 0.5).clamp(0.0, 1.0)
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 3], coverage: f32) {
    let [dr, dg, db, da] = pixel.0;
    let mix = |src: u8, dst: u8| (src as f32 * coverage + dst as f32 * (1.0 - coverage)).round() as u8;
    let alpha = (coverage * 255.0 + da as f32 * (1.0 - coverage)).round() as u8;
    *pixel = Rgba([
        mix(color[0], dr),
        mix(color[1], dg),
        mix(color[2], db),
        alpha,
    ]);
}

#[cfg(test)]
mod tests {
    use inspekt_core::stroke::StrokeDefinition;

    use super::*;

    const BACKGROUND: [u8; 4] = [245, 245, 245, 255];

    fn canvas() -> RgbaImage {
        let mut buffer = RgbaImage::new(40, 20);
        fill(&mut buffer, Color::new("#f5f5f5").unwrap());
        buffer
    }

    fn stroke(width: f32, cap: StrokeCap) -> StrokeDefinition {
        let mut stroke = StrokeDefinition::new(Color::default(), width);
        stroke.set_cap(cap);
        stroke
    }

    #[test]
    fn test_fill() {
        let buffer = canvas();
        assert!(buffer.pixels().all(|p| p.0 == BACKGROUND));
    }

    #[test]
    fn test_horizontal_segment_covers_its_row() {
        let mut buffer = canvas();
        let segment = LineSegment::between(
            Point::new(5.0, 10.0),
            Point::new(35.0, 10.0),
            stroke(2.0, StrokeCap::Butt),
        );
        draw_segment(&mut buffer, &segment);

        // Pixel rows 9 and 10 straddle y = 10 and are fully inside the 2px stroke
        assert_eq!(buffer.get_pixel(20, 9).0, [0, 0, 0, 255]);
        assert_eq!(buffer.get_pixel(20, 10).0, [0, 0, 0, 255]);
        assert_eq!(buffer.get_pixel(20, 2).0, BACKGROUND);
        // Butt caps stop at the endpoints
        assert_eq!(buffer.get_pixel(2, 10).0, BACKGROUND);
        assert_eq!(buffer.get_pixel(38, 10).0, BACKGROUND);
    }

    #[test]
    fn test_zero_length_segment_caps() {
        let point = Point::new(20.5, 10.5);

        let mut buffer = canvas();
        draw_segment(&mut buffer, &LineSegment::new(point, stroke(4.0, StrokeCap::Butt)));
        assert!(buffer.pixels().all(|p| p.0 == BACKGROUND));

        let mut buffer = canvas();
        draw_segment(&mut buffer, &LineSegment::new(point, stroke(4.0, StrokeCap::Round)));
        assert_eq!(buffer.get_pixel(20, 10).0, [0, 0, 0, 255]);

        let mut buffer = canvas();
        draw_segment(&mut buffer, &LineSegment::new(point, stroke(4.0, StrokeCap::Square)));
        assert_eq!(buffer.get_pixel(20, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_segment_outside_buffer_is_clipped() {
        let mut buffer = canvas();
        let segment = LineSegment::between(
            Point::new(-50.0, -50.0),
            Point::new(-10.0, -20.0),
            stroke(2.0, StrokeCap::Round),
        );
        draw_segment(&mut buffer, &segment);
        assert!(buffer.pixels().all(|p| p.0 == BACKGROUND));
    }

    #[test]
    fn test_anti_aliased_edge_is_partial() {
        let mut buffer = canvas();
        // Stroke edge at y = 10.0 ± 1.5 leaves rows 8 and 11 half covered
        let segment = LineSegment::between(
            Point::new(0.0, 10.0),
            Point::new(40.0, 10.0),
            stroke(3.0, StrokeCap::Butt),
        );
        draw_segment(&mut buffer, &segment);
        let edge = buffer.get_pixel(20, 8).0[0];
        assert!(edge > 0 && edge < BACKGROUND[0], "edge value {edge}");
    }
}
