//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! contentful-cleanup binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Contentful asset cleanup command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "contentful-cleanup",
    about = "CLI to help manage Contentful Assets.",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Hide progress bars.
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get list of assets from Contentful space.
    #[command(visible_alias = "ga")]
    GetAssets {
        /// Output file you want to write data to (JSON format).
        #[arg(short, long)]
        output_file: PathBuf,
    },

    /// Get detailed information about assets.
    #[command(visible_alias = "gad")]
    GetAssetDetails {
        /// Output file you want to write data to (CSV format).
        #[arg(short, long)]
        output_file: PathBuf,

        /// Input file you want to read data from (JSON format).
        #[arg(short, long)]
        input_file: Option<PathBuf>,

        /// Maximum number of assets to analyze.
        #[arg(short, long)]
        max: Option<usize>,

        /// Add an Author column with the name of each asset's creator.
        #[arg(short, long, default_value = "false")]
        author: bool,
    },

    /// Find assets that no entry links to.
    #[command(visible_alias = "foa")]
    FindOrphanedAssets {
        /// Output file you want to write data to (CSV format).
        #[arg(short, long)]
        output_file: PathBuf,

        /// Input file you want to read data from (JSON format).
        #[arg(short, long)]
        input_file: Option<PathBuf>,

        /// Maximum number of assets to analyze.
        #[arg(short, long)]
        max: Option<usize>,
    },
}

impl Cli {
    /// Log level selected by `-v` flags; warnings only by default.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
