//! CLI argument definitions using clap
//!
//! Commands:
//! - persistent-record init --image <path> [--config <path>] [--force]
//! - persistent-record store --image <path> [--offset N] < payload
//! - persistent-record fetch --image <path> [--offset N] [--length L]
//! - persistent-record validate --image <path>

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Checksum-protected record stored in an image file
#[derive(Parser, Debug)]
#[command(name = "persistent-record")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every record operation as JSON
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Record configuration and the image holding it
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Path to record configuration file
    #[arg(long, default_value = "./record.json")]
    pub config: PathBuf,

    /// Path to the image file
    #[arg(long)]
    pub image: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a zero-filled image holding a valid all-zero record
    Init {
        #[command(flatten)]
        target: Target,

        /// Replace an existing image
        #[arg(long)]
        force: bool,
    },

    /// Store payload bytes read from stdin
    Store {
        #[command(flatten)]
        target: Target,

        /// Data offset for a partial store; omit to store the whole record
        #[arg(long)]
        offset: Option<usize>,
    },

    /// Print record bytes as hex
    Fetch {
        #[command(flatten)]
        target: Target,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Defaults to the rest of the record
        #[arg(long)]
        length: Option<usize>,
    },

    /// Check the stored checksum against the data
    Validate {
        #[command(flatten)]
        target: Target,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
