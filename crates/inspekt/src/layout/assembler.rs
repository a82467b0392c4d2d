use log::{debug, trace};

use inspekt_core::{
    geometry::{Point, Size},
    raster::RasterImage,
};

use super::{Cursor, DocumentLayout, ImageKind, text};
use crate::{config::LayoutConfig, report::Report};

/// Places the contents of a [`Report`] onto pages.
///
/// The header block (title, client, notes, brands and price) starts at fixed
/// positions on the first page; notes that wrap onto several lines push the
/// rest of the document down, onto further pages when they run past the
/// break line. Sketches and photos follow, one image per row, and a new page
/// is started whenever the cursor passes the break line with more images
/// still to place.
pub struct Assembler<'a> {
    config: &'a LayoutConfig,
    layout: DocumentLayout,
    cursor: Cursor,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        let page_size = Size::new(config.page_width(), config.page_height());
        Self {
            config,
            layout: DocumentLayout::new(page_size),
            cursor: Cursor::new(config.margin_top()),
        }
    }

    /// Lays out `report`, using `photos` (already normalised, in order) for
    /// the photo section.
    pub fn assemble(mut self, report: &Report, photos: Vec<RasterImage>) -> DocumentLayout {
        self.place_header(report);
        self.place_notes(report.notes());
        self.place_brands(report);
        self.place_price(report.max_price());
        self.cursor.advance(self.config.section_gap());

        let sketches: Vec<RasterImage> =
            report.sketches().iter().map(|s| s.image().clone()).collect();
        if !sketches.is_empty() {
            let heading = self.config.labels().sketches().to_string();
            self.place_section(&heading, sketches, ImageKind::Sketch);
        }

        if !photos.is_empty() {
            if self.cursor.y() > self.config.photos_break_y() {
                self.break_page();
            }
            let heading = self.config.labels().photos().to_string();
            self.place_section(&heading, photos, ImageKind::Photo);
        }

        debug!(pages = self.layout.page_count(); "Document laid out");
        self.layout
    }

    fn place_header(&mut self, report: &Report) {
        let config = self.config;
        let labels = config.labels();
        let x = config.margin_left();

        self.text(
            Point::new(x, config.title_y()),
            config.title_font_size(),
            labels.title(),
        );
        self.text(
            Point::new(x, config.client_y()),
            config.label_font_size(),
            labels.client(),
        );
        let client = self.value_or_placeholder(report.client_name());
        self.text(
            Point::new(config.client_value_x(), config.client_y()),
            config.body_font_size(),
            client,
        );
    }

    /// Places the notes label and lines, leaving the cursor on the brand heading.
    fn place_notes(&mut self, notes: &str) {
        let config = self.config;
        let x = config.margin_left();
        self.text(
            Point::new(x, config.notes_label_y()),
            config.label_font_size(),
            config.labels().notes(),
        );

        let notes = self.value_or_placeholder(notes);
        let lines = text::wrap(&notes, config.body_font_size(), config.content_width());
        let line_height = text::line_height(config.body_font_size(), config.line_height_factor());

        self.cursor.move_to(config.notes_y());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.cursor.advance(line_height);
            }
            self.break_if_past_line();
            self.text(
                Point::new(x, self.cursor.y()),
                config.body_font_size(),
                line.as_str(),
            );
        }

        trace!(lines = lines.len(), page = self.cursor.page(); "Notes placed");
        self.cursor.advance(config.brands_y() - config.notes_y());
    }

    /// Places the brand heading and rows, leaving the cursor on the price row.
    fn place_brands(&mut self, report: &Report) {
        let config = self.config;
        let step = config.row_step();
        self.break_if_past_line();
        self.text(
            Point::new(config.margin_left(), self.cursor.y()),
            config.label_font_size(),
            config.labels().brands(),
        );

        let lines = report.brands().lines(config.labels().placeholder());
        if lines.is_empty() {
            self.cursor.advance(step);
            self.break_if_past_line();
            self.text(
                Point::new(config.brand_item_x(), self.cursor.y()),
                config.body_font_size(),
                config.labels().placeholder(),
            );
        }
        for line in &lines {
            self.cursor.advance(step);
            self.break_if_past_line();
            self.text(
                Point::new(config.brand_item_x(), self.cursor.y()),
                config.body_font_size(),
                line.as_str(),
            );
        }

        // The placeholder row has no spacer below it
        let spacer = if lines.is_empty() { step } else { 2.0 * step };
        self.cursor.advance(spacer);
    }

    fn place_price(&mut self, price: &str) {
        let config = self.config;
        self.break_if_past_line();
        let y = self.cursor.y();
        self.text(
            Point::new(config.margin_left(), y),
            config.label_font_size(),
            config.labels().price(),
        );
        let value = if price.trim().is_empty() {
            config.labels().placeholder().to_string()
        } else {
            format!("{}{}", price.trim(), config.labels().currency_suffix())
        };
        self.text(
            Point::new(config.price_value_x(), y),
            config.body_font_size(),
            value,
        );
    }

    /// Places a heading followed by one image per row.
    fn place_section(&mut self, heading: &str, images: Vec<RasterImage>, kind: ImageKind) {
        let config = self.config;
        self.text(
            Point::new(config.margin_left(), self.cursor.y()),
            config.label_font_size(),
            heading,
        );
        self.cursor.advance(config.heading_gap());

        let size = Size::new(config.image_width(), config.image_height());
        let last = images.len().saturating_sub(1);
        for (i, image) in images.into_iter().enumerate() {
            let bounds = Point::new(config.margin_left(), self.cursor.y()).to_bounds(size);
            self.layout
                .push_image(self.cursor.page(), bounds, image, kind);
            trace!(page = self.cursor.page(), y = self.cursor.y(), kind:?; "Image placed");

            self.cursor.advance(config.image_step());
            if self.cursor.y() > config.page_break_y() && i < last {
                self.break_page();
            }
        }
    }

    fn break_page(&mut self) {
        self.cursor.next_page();
        self.layout.add_page();
    }

    /// Starts a new page when the cursor sits below the page break line.
    fn break_if_past_line(&mut self) {
        if self.cursor.y() > self.config.page_break_y() {
            self.break_page();
        }
    }

    fn value_or_placeholder(&self, value: &str) -> String {
        if value.trim().is_empty() {
            self.config.labels().placeholder().to_string()
        } else {
            value.to_string()
        }
    }

    fn text(&mut self, position: Point, font_size: f32, text: impl Into<String>) {
        self.layout
            .push_text(self.cursor.page(), position, font_size, text);
    }
}
