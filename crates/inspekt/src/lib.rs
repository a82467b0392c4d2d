//! Inspekt - Sketch capture and paginated report assembly for on-site inspections.
//!
//! A report collects a client name, free-text notes, selected equipment
//! brands, a price ceiling, freehand floor-plan sketches and photos. The
//! [`ReportBuilder`] lays all of it out on fixed-size pages and exports the
//! result as a PDF (or an SVG preview).

pub mod config;
pub mod export;
pub mod layout;
pub mod notes;
pub mod photo;
pub mod report;
pub mod sketch;

mod error;

pub use inspekt_core::{color, geometry, raster, segment, stroke};

pub use error::InspektError;

use log::{debug, info};

use inspekt_core::geometry::Size;

use config::AppConfig;
use export::{ExportArtifact, Exporter};
use layout::{Assembler, DocumentLayout};
use report::Report;
use sketch::SketchSurface;

/// Builder for sketch surfaces, document layouts and exported reports.
///
/// # Examples
///
/// ```rust,no_run
/// use inspekt::{ReportBuilder, config::AppConfig, report::{Brand, Report}};
///
/// let builder = ReportBuilder::new(AppConfig::default());
///
/// let mut report = Report::new();
/// report.set_client_name("Jana");
/// report.set_notes("test");
/// report.set_max_price("500");
/// let row = report.brands().iter().next().unwrap().id();
/// report.brands_mut().set(row, Some(Brand::Samsung));
///
/// let artifact = builder.export(&report).expect("Failed to export");
/// assert_eq!(artifact.file_name(), "Jana.pdf");
/// assert_eq!(artifact.page_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ReportBuilder {
    config: AppConfig,
}

impl ReportBuilder {
    /// Create a new report builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates an empty sketch surface sized for `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Config`] for invalid sketch settings.
    pub fn sketch_surface(&self, viewport: Size) -> Result<SketchSurface, InspektError> {
        SketchSurface::new(self.config.sketch(), viewport)
    }

    /// Lays out a report.
    ///
    /// Photos are normalised one at a time, in order. Unreadable photos are
    /// handled according to the configured photo error policy; skipped ones
    /// are listed in [`DocumentLayout::skipped_photos`].
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Photo`] when a photo fails under the `abort`
    /// policy.
    pub fn layout(&self, report: &Report) -> Result<DocumentLayout, InspektError> {
        let export = self.config.export();
        info!(
            sketches = report.sketches().len(),
            photos = report.photos().len();
            "Laying out report"
        );

        let (photos, skipped) = photo::normalize_all(
            report.photos().sources(),
            export.photo_errors(),
            export.jpeg_quality(),
        )?;
        debug!(normalised = photos.len(), skipped = skipped.len(); "Photos normalised");

        let mut layout = Assembler::new(self.config.layout()).assemble(report, photos);
        layout.set_skipped_photos(skipped);
        Ok(layout)
    }

    /// Lays out and exports a report in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`InspektError::Photo`] under the `abort` photo policy and
    /// [`InspektError::Export`] when the backend fails.
    pub fn export(&self, report: &Report) -> Result<ExportArtifact, InspektError> {
        let title = self.config.layout().labels().title();
        let mut exporter = self.config.export().format().exporter(title);
        self.export_with(report, exporter.as_mut())
    }

    /// Lays out and exports a report with a specific exporter.
    pub fn export_with(
        &self,
        report: &Report,
        exporter: &mut dyn Exporter,
    ) -> Result<ExportArtifact, InspektError> {
        let layout = self.layout(report)?;
        let bytes = exporter.export_document(&layout)?;
        let file_name = self.file_name(report, exporter.extension());

        info!(file_name, pages = layout.page_count(), skipped = layout.skipped_photos().len(); "Report exported");
        Ok(ExportArtifact::new(
            file_name,
            bytes,
            layout.page_count(),
            layout.skipped_photos().to_vec(),
        ))
    }

    /// Download file name for a report: the sanitised client name, or the
    /// configured default when the name is blank.
    pub fn file_name(&self, report: &Report, extension: &str) -> String {
        let default = self.config.layout().labels().default_file_name();
        format!(
            "{}.{extension}",
            export::file_stem(report.client_name(), default)
        )
    }
}
