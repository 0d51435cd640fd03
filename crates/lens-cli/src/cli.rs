//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Working-time reconciliation for heterogeneous activity sources.
///
/// Merges normalized timing evidence (commit sessions, editor durations,
/// AI-assistant prompt timestamps) into a deduplicated session timeline
/// and an estimate of total hours.
#[derive(Debug, Parser)]
#[command(name = "lens", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge source documents into sessions and a total-hours estimate.
    Reconcile {
        /// Normalized source documents; reads stdin when empty or "-".
        files: Vec<PathBuf>,

        /// Emit the merged sessions as an input document under this source
        /// ID, ready to feed into a later reconcile call.
        #[arg(long, value_name = "ID")]
        as_source: Option<String>,

        /// Override the session gap threshold, in hours.
        #[arg(long, value_name = "HOURS")]
        gap_hours: Option<f64>,

        /// Override the per-session estimate buffer, in hours.
        #[arg(long, value_name = "HOURS")]
        buffer_hours: Option<f64>,

        /// Override the per-session estimate floor, in hours.
        #[arg(long, value_name = "HOURS")]
        floor_hours: Option<f64>,
    },

    /// Show a per-source breakdown of input documents without reconciling.
    Inspect {
        /// Normalized source documents; reads stdin when empty or "-".
        files: Vec<PathBuf>,
    },
}
