//! CLI command tests against image files

use std::fs;
use std::path::Path;

use persistent_record::cli::{run_command, Cli, CliErrorCode};
use persistent_record::record::RecordErrorCode;
use clap::Parser;
use serde_json::Value;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn write_config(dir: &Path, json: &str) -> String {
    let path = dir.join("record.json");
    fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

fn run(args: &[&str], input: &[u8]) -> (Result<(), persistent_record::cli::CliError>, Value) {
    let mut argv = vec!["persistent-record"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let mut input = input;
    let mut output = Vec::new();
    let result = run_command(&cli, &mut input, &mut output);
    let value = if output.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&output).unwrap()
    };
    (result, value)
}

struct Fixture {
    _dir: TempDir,
    config: String,
    image: String,
}

fn fixture(config_json: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), config_json);
    let image = dir.path().join("record.img").to_string_lossy().into_owned();
    Fixture {
        _dir: dir,
        config,
        image,
    }
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_init_creates_valid_image() {
    let f = fixture(r#"{"data_size": 8, "base_address": 100}"#);
    let (result, out) = run(&["init", "--config", &f.config, "--image", &f.image], b"");
    result.unwrap();
    assert_eq!(out["status"], "initialized");
    assert_eq!(out["image_len"], 110);
    assert_eq!(fs::metadata(&f.image).unwrap().len(), 110);

    let (result, out) = run(&["validate", "--config", &f.config, "--image", &f.image], b"");
    result.unwrap();
    assert_eq!(out["status"], "valid");
    assert_eq!(out["stored"], "0x0000");
    assert_eq!(out["computed"], out["stored"]);
}

#[test]
fn test_init_refuses_existing_image_without_force() {
    let f = fixture(r#"{"data_size": 4}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();

    let (result, _) = run(&["init", "--config", &f.config, "--image", &f.image], b"");
    assert_eq!(result.unwrap_err().code(), CliErrorCode::AlreadyInitialized);

    let (result, _) = run(
        &["init", "--config", &f.config, "--image", &f.image, "--force"],
        b"",
    );
    result.unwrap();
}

#[test]
fn test_store_then_fetch() {
    let f = fixture(r#"{"data_size": 8, "base_address": 100}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();

    let (result, out) = run(
        &["store", "--config", &f.config, "--image", &f.image],
        &[1, 2, 3, 4, 5, 6, 7, 8],
    );
    result.unwrap();
    assert_eq!(out["status"], "stored");
    assert_eq!(out["partial"], false);

    let image = fs::read(&f.image).unwrap();
    assert_eq!(&image[100..102], &[0x24, 0x00]);
    assert_eq!(&image[102..110], &[1, 2, 3, 4, 5, 6, 7, 8]);

    let (result, out) = run(
        &["fetch", "--config", &f.config, "--image", &f.image, "--offset", "2", "--length", "3"],
        b"",
    );
    result.unwrap();
    assert_eq!(out["data"], "030405");

    let (result, out) = run(&["fetch", "--config", &f.config, "--image", &f.image], b"");
    result.unwrap();
    assert_eq!(out["data"], "0102030405060708");
}

#[test]
fn test_whole_store_requires_exact_size() {
    let f = fixture(r#"{"data_size": 8}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();

    let (result, _) = run(&["store", "--config", &f.config, "--image", &f.image], &[1, 2]);
    assert_eq!(
        result.unwrap_err().code(),
        CliErrorCode::Record(RecordErrorCode::SizeMismatch)
    );
}

#[test]
fn test_partial_store_makes_validate_fail() {
    let f = fixture(r#"{"data_size": 8, "checksum": "crc32", "scratch_size": 3}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();

    let (result, out) = run(
        &["store", "--config", &f.config, "--image", &f.image, "--offset", "6"],
        &[0xff, 0xff],
    );
    result.unwrap();
    assert_eq!(out["partial"], true);

    let (result, out) = run(&["validate", "--config", &f.config, "--image", &f.image], b"");
    assert_eq!(
        result.unwrap_err().code(),
        CliErrorCode::Record(RecordErrorCode::InvalidData)
    );
    assert_eq!(out["status"], "invalid");
    assert_ne!(out["stored"], out["computed"]);
}

#[test]
fn test_fetch_out_of_range() {
    let f = fixture(r#"{"data_size": 8}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();

    let (result, out) = run(
        &["fetch", "--config", &f.config, "--image", &f.image, "--offset", "4", "--length", "100"],
        b"",
    );
    assert_eq!(
        result.unwrap_err().code(),
        CliErrorCode::Record(RecordErrorCode::AddressOutOfRange)
    );
    assert_eq!(out, Value::Null);
}

#[test]
fn test_missing_image_is_io_error() {
    let f = fixture(r#"{"data_size": 8}"#);
    let (result, _) = run(&["validate", "--config", &f.config, "--image", &f.image], b"");
    assert_eq!(result.unwrap_err().code(), CliErrorCode::IoError);
}

#[test]
fn test_bad_config_is_config_error() {
    let f = fixture(r#"{"data_size": 0}"#);
    let (result, _) = run(&["init", "--config", &f.config, "--image", &f.image], b"");
    assert_eq!(result.unwrap_err().code(), CliErrorCode::ConfigError);
}

#[test]
fn test_truncated_image_is_io_error() {
    let f = fixture(r#"{"data_size": 8}"#);
    run(&["init", "--config", &f.config, "--image", &f.image], b"").0.unwrap();
    let image = fs::read(&f.image).unwrap();
    fs::write(&f.image, &image[..6]).unwrap();

    let (result, _) = run(&["validate", "--config", &f.config, "--image", &f.image], b"");
    assert_eq!(
        result.unwrap_err().code(),
        CliErrorCode::Record(RecordErrorCode::IoError)
    );
}
