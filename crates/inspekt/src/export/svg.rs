//! SVG preview export.
//!
//! Pages are drawn as white framed sheets stacked vertically with a gap
//! between them. The document keeps the layout's millimetre coordinates in
//! its `viewBox` so element positions can be compared directly.

use log::info;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use super::{Error, Exporter};
use crate::layout::{
    DocumentLayout, Element, ImageElement, Page, TextElement,
    text::{FONT_FAMILY, PT_TO_MM},
};

/// Renders a [`DocumentLayout`] to a single SVG document.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    page_gap: f32,
    font_family: String,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgExporter {
    pub fn new() -> Self {
        Self {
            page_gap: 10.0,
            font_family: format!("{FONT_FAMILY}, Helvetica, Arial, sans-serif"),
        }
    }

    /// Sets the vertical gap between pages, in millimetres.
    pub fn with_page_gap(mut self, gap: f32) -> Self {
        self.page_gap = gap;
        self
    }

    fn render_page(&self, layout: &DocumentLayout, page: &Page, offset_y: f32) -> svg_element::Group {
        let size = layout.page_size();
        let sheet = svg_element::Rectangle::new()
            .set("x", 0.0)
            .set("y", 0.0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", "white")
            .set("stroke", "#cccccc")
            .set("stroke-width", 0.3);

        let mut group = svg_element::Group::new()
            .set("transform", format!("translate(0, {offset_y})"))
            .add(sheet);

        for element in page.elements() {
            group = match element {
                Element::Text(text) => group.add(self.render_text(text)),
                Element::Image(image) => match self.render_image(layout, image) {
                    Some(node) => group.add(node),
                    None => group,
                },
            };
        }
        group
    }

    fn render_text(&self, text: &TextElement) -> svg_element::Text {
        svg_element::Text::new("")
            .set("x", text.position().x())
            .set("y", text.position().y())
            .set("font-family", self.font_family.as_str())
            .set("font-size", text.font_size() * PT_TO_MM)
            .add(SvgText::new(text.text()))
    }

    fn render_image(&self, layout: &DocumentLayout, image: &ImageElement) -> Option<svg_element::Image> {
        let raster = layout.image(image.image())?;
        let bounds = image.bounds();
        Some(
            svg_element::Image::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("preserveAspectRatio", "none")
                .set("href", raster.to_data_url()),
        )
    }
}

impl Exporter for SvgExporter {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn export_document(&mut self, layout: &DocumentLayout) -> Result<Vec<u8>, Error> {
        let size = layout.page_size();
        let pages = layout.page_count() as f32;
        let total_height = pages * size.height() + (pages - 1.0).max(0.0) * self.page_gap;

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), total_height))
            .set("width", format!("{}mm", size.width()))
            .set("height", format!("{total_height}mm"));

        for (index, page) in layout.pages().iter().enumerate() {
            let offset_y = index as f32 * (size.height() + self.page_gap);
            doc = doc.add(self.render_page(layout, page, offset_y));
        }

        let rendered = doc.to_string();
        info!(pages = layout.page_count(), bytes = rendered.len(); "SVG document rendered");
        Ok(rendered.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use inspekt_core::raster::RasterImage;

    use super::*;
    use crate::{config::LayoutConfig, layout::Assembler, report::Report, sketch::SketchSnapshot};

    #[test]
    fn test_svg_stacks_pages() {
        let config = LayoutConfig::default();
        let mut report = Report::new();
        report.set_client_name("Jana");
        let png =
            RasterImage::encode_png(&RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))).unwrap();
        for _ in 0..3 {
            report
                .sketches_mut()
                .push(SketchSnapshot::from_png(png.clone()).unwrap());
        }
        let layout = Assembler::new(&config).assemble(&report, Vec::new());

        let bytes = SvgExporter::new().export_document(&layout).unwrap();
        let svg = String::from_utf8(bytes).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 210 604\""));
        assert!(svg.contains("translate(0, 307)"));
        assert_eq!(svg.matches("data:image/png;base64,").count(), 3);
        assert!(svg.contains("Jana"));
    }
}
