//! Configuration types for sketch capture and report assembly.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs to mention the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`SketchConfig`] - Sketch surface appearance, sizing and pointer policy.
//! - [`LayoutConfig`] - Page geometry and the positions of every report block.
//! - [`LabelsConfig`] - Headings and labels printed into the document.
//! - [`ExportConfig`] - Output format, photo failure policy and JPEG quality.
//! - [`NotesConfig`] - Storage key and location of the persisted note.
//!
//! # Example
//!
//! ```
//! # use inspekt::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().page_width(), 210.0);
//! assert!(config.sketch().background().is_ok());
//! ```

use std::{path::PathBuf, str::FromStr};

use serde::Deserialize;

use inspekt_core::{
    color::Color,
    stroke::{StrokeCap, StrokeDefinition},
};

use crate::{export::ExportFormat, photo::PhotoErrorPolicy, sketch::CancelPolicy};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    sketch: SketchConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    export: ExportConfig,

    #[serde(default)]
    notes: NotesConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        sketch: SketchConfig,
        layout: LayoutConfig,
        export: ExportConfig,
        notes: NotesConfig,
    ) -> Self {
        Self {
            sketch,
            layout,
            export,
            notes,
        }
    }

    /// Returns the sketch surface configuration.
    pub fn sketch(&self) -> &SketchConfig {
        &self.sketch
    }

    /// Returns the document layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    /// Returns the persisted note configuration.
    pub fn notes(&self) -> &NotesConfig {
        &self.notes
    }

    /// Returns a mutable reference to the export configuration.
    pub fn export_mut(&mut self) -> &mut ExportConfig {
        &mut self.export
    }
}

/// Sketch surface configuration.
///
/// The surface is sized relative to the viewport it is shown in:
/// `width = viewport width × width_ratio` and
/// `height = min(viewport height × height_ratio, max_height)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Neutral background the surface is filled with, as a color string.
    background: String,
    /// Pen color, as a color string.
    stroke_color: String,
    /// Pen width in surface pixels.
    stroke_width: f32,
    /// Line cap: `butt`, `round` or `square`.
    stroke_cap: String,
    width_ratio: f32,
    height_ratio: f32,
    max_height: f32,
    /// What happens to an in-progress stroke when the pointer leaves.
    cancel_policy: CancelPolicy,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            background: "#f5f5f5".to_string(),
            stroke_color: "black".to_string(),
            stroke_width: 2.0,
            stroke_cap: "butt".to_string(),
            width_ratio: 0.9,
            height_ratio: 0.8,
            max_height: 500.0,
            cancel_policy: CancelPolicy::default(),
        }
    }
}

impl SketchConfig {
    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background(&self) -> Result<Color, String> {
        Color::new(&self.background).map_err(|err| format!("Invalid sketch background: {err}"))
    }

    /// Returns the pen as a [`StrokeDefinition`].
    ///
    /// # Errors
    ///
    /// Returns an error for an unparsable color, an unknown cap or a width
    /// that is not a positive finite number.
    pub fn stroke(&self) -> Result<StrokeDefinition, String> {
        let color = Color::new(&self.stroke_color)
            .map_err(|err| format!("Invalid stroke color: {err}"))?;
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(format!(
                "Invalid stroke width `{}`: must be a positive number",
                self.stroke_width
            ));
        }
        let cap = StrokeCap::from_str(&self.stroke_cap)?;

        let mut stroke = StrokeDefinition::new(color, self.stroke_width);
        stroke.set_cap(cap);
        Ok(stroke)
    }

    pub fn width_ratio(&self) -> f32 {
        self.width_ratio
    }

    pub fn height_ratio(&self) -> f32 {
        self.height_ratio
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn cancel_policy(&self) -> CancelPolicy {
        self.cancel_policy
    }

    /// Overrides the cancel policy.
    pub fn set_cancel_policy(&mut self, policy: CancelPolicy) {
        self.cancel_policy = policy;
    }
}

/// Document layout configuration.
///
/// Every value is in millimetres except font sizes, which are in points.
/// Positions use a top-left page origin and text is placed by its baseline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    page_width: f32,
    page_height: f32,
    /// Left edge of headings, labels, notes and images.
    margin_left: f32,
    /// Vertical position the cursor resets to on a fresh page.
    margin_top: f32,
    /// Width available to wrapped notes.
    content_width: f32,

    title_font_size: f32,
    label_font_size: f32,
    body_font_size: f32,
    /// Line height as a multiple of the font size.
    line_height_factor: f32,

    title_y: f32,
    client_y: f32,
    client_value_x: f32,
    notes_label_y: f32,
    notes_y: f32,
    brands_y: f32,
    brand_item_x: f32,
    /// Vertical step between brand lines and around the price row.
    row_step: f32,
    price_value_x: f32,
    /// Gap between the price row and the first image section.
    section_gap: f32,
    /// Gap between a section heading and its first image.
    heading_gap: f32,

    image_width: f32,
    image_height: f32,
    /// Vertical advance after each image.
    image_step: f32,
    /// Once the cursor passes this line a new page starts before the next image.
    page_break_y: f32,
    /// The photo section starts on a new page when the cursor is past this line.
    photos_break_y: f32,

    #[serde(default)]
    labels: LabelsConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 10.0,
            margin_top: 20.0,
            content_width: 190.0,
            title_font_size: 16.0,
            label_font_size: 14.0,
            body_font_size: 12.0,
            line_height_factor: 1.15,
            title_y: 20.0,
            client_y: 35.0,
            client_value_x: 50.0,
            notes_label_y: 45.0,
            notes_y: 55.0,
            brands_y: 70.0,
            brand_item_x: 15.0,
            row_step: 10.0,
            price_value_x: 60.0,
            section_gap: 20.0,
            heading_gap: 10.0,
            image_width: 180.0,
            image_height: 100.0,
            image_step: 110.0,
            page_break_y: 270.0,
            photos_break_y: 200.0,
            labels: LabelsConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn margin_left(&self) -> f32 {
        self.margin_left
    }

    pub fn margin_top(&self) -> f32 {
        self.margin_top
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn title_font_size(&self) -> f32 {
        self.title_font_size
    }

    pub fn label_font_size(&self) -> f32 {
        self.label_font_size
    }

    pub fn body_font_size(&self) -> f32 {
        self.body_font_size
    }

    pub fn line_height_factor(&self) -> f32 {
        self.line_height_factor
    }

    pub fn title_y(&self) -> f32 {
        self.title_y
    }

    pub fn client_y(&self) -> f32 {
        self.client_y
    }

    pub fn client_value_x(&self) -> f32 {
        self.client_value_x
    }

    pub fn notes_label_y(&self) -> f32 {
        self.notes_label_y
    }

    pub fn notes_y(&self) -> f32 {
        self.notes_y
    }

    pub fn brands_y(&self) -> f32 {
        self.brands_y
    }

    pub fn brand_item_x(&self) -> f32 {
        self.brand_item_x
    }

    pub fn row_step(&self) -> f32 {
        self.row_step
    }

    pub fn price_value_x(&self) -> f32 {
        self.price_value_x
    }

    pub fn section_gap(&self) -> f32 {
        self.section_gap
    }

    pub fn heading_gap(&self) -> f32 {
        self.heading_gap
    }

    pub fn image_width(&self) -> f32 {
        self.image_width
    }

    pub fn image_height(&self) -> f32 {
        self.image_height
    }

    pub fn image_step(&self) -> f32 {
        self.image_step
    }

    pub fn page_break_y(&self) -> f32 {
        self.page_break_y
    }

    pub fn photos_break_y(&self) -> f32 {
        self.photos_break_y
    }

    /// Returns the headings and labels.
    pub fn labels(&self) -> &LabelsConfig {
        &self.labels
    }

    /// Overrides the page break line. Mostly useful to shrink page capacity.
    pub fn set_page_break_y(&mut self, y: f32) {
        self.page_break_y = y;
    }
}

/// Text printed into the document besides the report values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    title: String,
    client: String,
    notes: String,
    brands: String,
    price: String,
    sketches: String,
    photos: String,
    /// Appended to the price value.
    currency_suffix: String,
    /// Printed in place of an empty value.
    placeholder: String,
    /// Base file name used when the client name is blank.
    default_file_name: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            title: "Obhliadka klímy".to_string(),
            client: "Meno klienta:".to_string(),
            notes: "Poznámky:".to_string(),
            brands: "Vybrané značky:".to_string(),
            price: "Maximálna cena:".to_string(),
            sketches: "Pôdorys:".to_string(),
            photos: "Fotky:".to_string(),
            currency_suffix: " €".to_string(),
            placeholder: "-".to_string(),
            default_file_name: "obhliadka".to_string(),
        }
    }
}

impl LabelsConfig {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn brands(&self) -> &str {
        &self.brands
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn sketches(&self) -> &str {
        &self.sketches
    }

    pub fn photos(&self) -> &str {
        &self.photos
    }

    pub fn currency_suffix(&self) -> &str {
        &self.currency_suffix
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn default_file_name(&self) -> &str {
        &self.default_file_name
    }
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    format: ExportFormat,
    photo_errors: PhotoErrorPolicy,
    /// Quality (1-100) used when photos are re-encoded as JPEG.
    jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            photo_errors: PhotoErrorPolicy::default(),
            jpeg_quality: 90,
        }
    }
}

impl ExportConfig {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn photo_errors(&self) -> PhotoErrorPolicy {
        self.photo_errors
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    pub fn set_photo_errors(&mut self, policy: PhotoErrorPolicy) {
        self.photo_errors = policy;
    }
}

/// Persisted note configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Key the note is stored under.
    key: String,
    /// JSON file holding the note. Front-ends pick a default location when unset.
    path: Option<PathBuf>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            key: "notes".to_string(),
            path: None,
        }
    }
}

impl NotesConfig {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}
