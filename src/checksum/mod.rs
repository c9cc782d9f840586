//! Checksum engine for persistent records
//!
//! A record's checksum is a rolling algorithm over the data region,
//! seeded with an initial accumulator and stored little-endian in front
//! of the data. Two widths exist:
//!
//! - 16-bit: 2 bytes on media (default, additive sum)
//! - 32-bit: 4 bytes on media
//!
//! Any function with the matching signature may be installed; the
//! algorithms shipped here are the additive sums and CRC32.

mod algorithm;
mod engine;

pub use algorithm::{additive16, additive32, crc32, Rolling16, Rolling32};
pub use engine::{Checksum, ChecksumKind, ChecksumValue, EncodedChecksum, MAX_CHECKSUM_WIDTH};
