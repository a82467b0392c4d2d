//! Inspekt CLI library
//!
//! Turns a report manifest into an exported inspection report.

mod args;
mod config;
mod error_adapter;
mod manifest;

use std::path::PathBuf;

use log::{info, warn};

use inspekt::{InspektError, ReportBuilder, export::ExportFormat, notes::NoteStore};

pub use args::Args;
pub use config::load_config;
pub use error_adapter::{ErrorAdapter, to_reportable};
pub use manifest::Manifest;

/// Run the inspekt CLI application
///
/// # Errors
///
/// Returns `InspektError` for configuration, manifest, photo, note storage
/// or export failures.
pub fn run(args: &Args) -> Result<(), InspektError> {
    info!(input_path = args.input; "Processing report manifest");

    let mut app_config = load_config(args.config.as_ref())?;
    if let Some(format) = &args.format {
        let format: ExportFormat = format.parse().map_err(InspektError::Config)?;
        app_config.export_mut().set_format(format);
    }

    let mut manifest = Manifest::load(&args.input)?;

    if args.save_notes || args.stored_notes {
        let store = NoteStore::new(config::notes_path(&app_config)?, app_config.notes().key());
        if args.stored_notes && manifest.notes().trim().is_empty() {
            let note = store.load()?;
            info!(path = store.path().display().to_string(); "Using stored notes");
            manifest.set_notes(note);
        }
        if args.save_notes {
            store.save(manifest.notes())?;
            info!(path = store.path().display().to_string(); "Notes saved");
        }
    }

    let builder = ReportBuilder::new(app_config);
    let report = manifest.to_report(&builder)?;
    let artifact = builder.export(&report)?;

    for skipped in artifact.skipped() {
        warn!(photo = skipped.name(), reason = skipped.reason(); "Photo left out of the report");
    }

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(artifact.file_name()));
    artifact.write_to(&output)?;

    info!(
        output_file = output.display().to_string(),
        pages = artifact.page_count();
        "Report exported successfully"
    );

    Ok(())
}
