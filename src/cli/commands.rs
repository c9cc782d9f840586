//! CLI command implementations
//!
//! Each command loads the record configuration, opens the image as a
//! [`FileDevice`] and runs one record operation. Results are written as a
//! single JSON line to the given output.

use std::fs;
use std::io::{Read, Write};

use serde_json::json;

use crate::block::FileDevice;
use crate::config::RecordConfig;
use crate::observability::{log_event, Event};
use crate::record::RecordError;

use super::args::{Cli, Command, Target};
use super::errors::{CliError, CliResult};
use super::io::{read_payload, to_hex, write_json};

/// Parses arguments and runs the command against stdin/stdout.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_command(&cli, &mut stdin.lock(), &mut stdout.lock())
}

pub fn run_command<R: Read, W: Write>(cli: &Cli, input: &mut R, output: &mut W) -> CliResult<()> {
    match &cli.command {
        Command::Init { target, force } => init(target, *force, cli.trace, output),
        Command::Store { target, offset } => store(target, *offset, cli.trace, input, output),
        Command::Fetch {
            target,
            offset,
            length,
        } => fetch(target, *offset, *length, cli.trace, output),
        Command::Validate { target } => validate(target, cli.trace, output),
    }
}

fn load_config(target: &Target, trace: bool) -> CliResult<RecordConfig> {
    let config = RecordConfig::load(&target.config)?;
    if trace {
        let size = config.data_size.to_string();
        let base = config.base_address.to_string();
        log_event(
            Event::ConfigLoaded,
            &[("base_address", base.as_str()), ("data_size", size.as_str())],
        );
    }
    Ok(config)
}

fn open_image(target: &Target) -> CliResult<FileDevice> {
    FileDevice::open(&target.image).map_err(|e| {
        CliError::io_error(format!(
            "Failed to open image {}: {}",
            target.image.display(),
            e
        ))
    })
}

/// Creates the image and stores an all-zero record with a valid checksum.
pub fn init<W: Write>(target: &Target, force: bool, trace: bool, output: &mut W) -> CliResult<()> {
    let config = load_config(target, trace)?;

    if target.image.exists() {
        if !force {
            return Err(CliError::already_initialized(&target.image));
        }
        fs::remove_file(&target.image)?;
    }

    let device = FileDevice::create(&target.image, config.image_len()).map_err(|e| {
        CliError::io_error(format!(
            "Failed to create image {}: {}",
            target.image.display(),
            e
        ))
    })?;

    let mut record = config.open(device);
    record.set_tracing(trace);
    record.store_full(&vec![0u8; config.data_size])?;

    if trace {
        let len = config.image_len().to_string();
        log_event(Event::ImageInitialized, &[("image_len", len.as_str())]);
    }
    write_json(
        output,
        &json!({
            "status": "initialized",
            "image_len": config.image_len(),
        }),
    )
}

/// Stores stdin at `offset`, or as the whole record when no offset is given.
pub fn store<R: Read, W: Write>(
    target: &Target,
    offset: Option<usize>,
    trace: bool,
    input: &mut R,
    output: &mut W,
) -> CliResult<()> {
    let config = load_config(target, trace)?;
    let payload = read_payload(input)?;

    let mut record = config.open(open_image(target)?);
    record.set_tracing(trace);
    match offset {
        Some(offset) => record.store_part(&payload, offset)?,
        None => record.store_full(&payload)?,
    }

    write_json(
        output,
        &json!({
            "status": "stored",
            "offset": offset.unwrap_or(0),
            "length": payload.len(),
            "partial": offset.is_some(),
        }),
    )
}

pub fn fetch<W: Write>(
    target: &Target,
    offset: usize,
    length: Option<usize>,
    trace: bool,
    output: &mut W,
) -> CliResult<()> {
    let config = load_config(target, trace)?;
    let length = length.unwrap_or_else(|| config.data_size.saturating_sub(offset));

    let mut record = config.open(open_image(target)?);
    record.set_tracing(trace);
    // Reject the window before sizing the buffer from it.
    record.layout().window(offset, length)?;
    let mut data = vec![0u8; length];
    record.fetch_part(&mut data, offset)?;

    write_json(
        output,
        &json!({
            "offset": offset,
            "length": length,
            "data": to_hex(&data),
        }),
    )
}

/// Prints `valid` or `invalid` with both checksums. Invalid data is also
/// returned as an error so the process exits non-zero.
pub fn validate<W: Write>(target: &Target, trace: bool, output: &mut W) -> CliResult<()> {
    let config = load_config(target, trace)?;

    let mut scratch = vec![0u8; config.scratch_size];
    let mut record = config.open(open_image(target)?);
    record.set_tracing(trace);
    if !scratch.is_empty() {
        record.attach_buffer(&mut scratch);
    }

    match record.validate() {
        Ok(()) => {
            // A valid record's stored checksum is the computed one.
            let stored = record.stored_checksum()?.to_string();
            write_json(
                output,
                &json!({
                    "status": "valid",
                    "stored": stored,
                    "computed": stored,
                }),
            )
        }
        Err(RecordError::InvalidData { stored, computed }) => {
            write_json(
                output,
                &json!({
                    "status": "invalid",
                    "stored": stored.to_string(),
                    "computed": computed.to_string(),
                }),
            )?;
            Err(RecordError::InvalidData { stored, computed }.into())
        }
        Err(e) => Err(e.into()),
    }
}
