//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// notecal - Imported calendar meetings at a glance
#[derive(Debug, Parser)]
#[command(name = "notecal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "NOTECAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the saved schedule
    #[arg(long, global = true, env = "NOTECAL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import an .ics file, replacing the saved schedule
    Import {
        /// Path to the .ics file
        file: PathBuf,
    },

    /// Show upcoming meetings
    Upcoming {
        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Maximum number of meetings to display
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the meeting in progress
    Active {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Keep the saved schedule pruned and report the active meeting
    Watch {
        /// Seconds between checks (defaults to `[watch] interval_secs`)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file and data directory paths
    Path,
}
