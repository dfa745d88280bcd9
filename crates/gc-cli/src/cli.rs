//! Command-line surface of `gvc`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gvc", version, about = "Gravimetric/seismic correction pipeline")]
pub struct Cli {
    /// Project configuration file.
    #[arg(short, long, global = true, default_value = "gravicorr.toml")]
    pub config: PathBuf,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration template.
    InitConfig {
        /// Directory receiving the template.
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Ingest the configured roots into the project database.
    Load,
    /// Recompute intersections, energies, corrections, and defect flags.
    Process,
    /// Write correction files for every chain and sensor pair.
    Export,
    /// Load, process, and export in one go.
    Run,
}
