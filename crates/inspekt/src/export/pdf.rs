//! PDF export.

use log::{debug, info};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Px,
};

use inspekt_core::{geometry::Bounds, raster::RasterImage};

use super::{Error, Exporter};
use crate::layout::{
    DocumentLayout, Element, TextElement,
    text::{FONT_DATA, FONT_FAMILY},
};

const MM_PER_INCH: f32 = 25.4;

/// Writes a [`DocumentLayout`] as a PDF document.
///
/// Every layout page becomes one PDF page of the layout's page size. Text is
/// set in the bundled report font, embedded so that accented client names
/// and notes survive, and images are embedded as 8-bit RGB composited onto
/// white and stretched into their layout box.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    title: String,
}

impl PdfExporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Exporter for PdfExporter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn export_document(&mut self, layout: &DocumentLayout) -> Result<Vec<u8>, Error> {
        let page_width = Mm(layout.page_size().width());
        let page_height = Mm(layout.page_size().height());

        let (doc, first_page, first_layer) =
            PdfDocument::new(self.title.as_str(), page_width, page_height, "Layer 1");
        let font = doc
            .add_external_font(FONT_DATA)
            .map_err(|err| Error::Render(format!("cannot embed {FONT_FAMILY}: {err}")))?;

        for (index, page) in layout.pages().iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) =
                    doc.add_page(page_width, page_height, format!("Layer {}", index + 1));
                doc.get_page(page_index).get_layer(layer_index)
            };

            for element in page.elements() {
                match element {
                    Element::Text(text) => draw_text(&layer, &font, text, page_height.0),
                    Element::Image(placed) => {
                        let image = layout.image(placed.image()).ok_or_else(|| {
                            Error::Render(format!("missing image {:?}", placed.image()))
                        })?;
                        embed_image(&layer, image, placed.bounds(), page_height.0)?;
                    }
                }
            }
            debug!(page = index + 1; "PDF page written");
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|err| Error::Render(err.to_string()))?;
        info!(pages = layout.page_count(), bytes = bytes.len(); "PDF document rendered");
        Ok(bytes)
    }
}

/// PDF places text by its baseline from the bottom-left page corner.
fn draw_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &TextElement, page_height: f32) {
    let position = text.position();
    layer.use_text(
        text.text(),
        text.font_size(),
        Mm(position.x()),
        Mm(page_height - position.y()),
        font,
    );
}

fn embed_image(
    layer: &PdfLayerReference,
    image: &RasterImage,
    bounds: Bounds,
    page_height: f32,
) -> Result<(), Error> {
    let rgb = image.to_rgb8_on_white()?;
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Ok(());
    }

    let xobject = Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // The DPI fixes the width; the vertical scale stretches the height into the box
    let dpi = width as f32 / (bounds.width() / MM_PER_INCH);
    let natural_height = height as f32 / dpi * MM_PER_INCH;
    let scale_y = bounds.height() / natural_height;

    xobject.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(bounds.min_x())),
            translate_y: Some(Mm(page_height - bounds.max_y())),
            dpi: Some(dpi),
            scale_y: Some(scale_y),
            ..Default::default()
        },
    );
    Ok(())
}
