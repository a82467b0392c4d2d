//! Command-line argument definitions for the Inspekt CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the report manifest, output location
//! and format, configuration file selection, note persistence and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Inspekt report tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the report manifest (TOML)
    #[arg(help = "Path to the report manifest")]
    pub input: String,

    /// Path to the output file; defaults to the report's own file name
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (pdf, svg); overrides the configuration
    #[arg(short, long)]
    pub format: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Store the manifest notes as the persisted note
    #[arg(long)]
    pub save_notes: bool,

    /// Use the persisted note when the manifest has no notes
    #[arg(long)]
    pub stored_notes: bool,
}
