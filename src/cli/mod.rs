//! CLI module
//!
//! Operates on a record kept in an image file:
//! - init: create the image with a valid all-zero record
//! - store: write payload from stdin (whole record or partial)
//! - fetch: print record bytes as hex
//! - validate: compare stored and recomputed checksums

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Target};
pub use commands::{fetch, init, run, run_command, store, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
