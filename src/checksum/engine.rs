//! Checksum variants and their accumulator values
//!
//! The on-media checksum is either 16 or 32 bits wide. The width travels
//! with the value ([`ChecksumValue`]) and with the configured algorithm
//! ([`Checksum`]), so encode/decode/compare never need a separate type tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::algorithm::{additive16, Rolling16, Rolling32};

/// Widest encoded checksum, in bytes.
pub const MAX_CHECKSUM_WIDTH: usize = 4;

/// Checksum width selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumKind {
    /// 16-bit accumulator, 2 bytes on media
    Sum16,
    /// 32-bit accumulator, 4 bytes on media
    Sum32,
}

impl ChecksumKind {
    /// Number of bytes the checksum occupies on media.
    pub const fn encoded_width(self) -> usize {
        match self {
            ChecksumKind::Sum16 => 2,
            ChecksumKind::Sum32 => 4,
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Sum16 => write!(f, "sum16"),
            ChecksumKind::Sum32 => write!(f, "sum32"),
        }
    }
}

/// A checksum accumulator value of either width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumValue {
    Sum16(u16),
    Sum32(u32),
}

impl ChecksumValue {
    pub fn kind(&self) -> ChecksumKind {
        match self {
            ChecksumValue::Sum16(_) => ChecksumKind::Sum16,
            ChecksumValue::Sum32(_) => ChecksumKind::Sum32,
        }
    }

    /// The accumulator widened to 32 bits.
    pub fn as_u32(&self) -> u32 {
        match *self {
            ChecksumValue::Sum16(v) => u32::from(v),
            ChecksumValue::Sum32(v) => v,
        }
    }

    /// Little-endian storage encoding, exactly `encoded_width` bytes.
    pub fn encode(&self) -> EncodedChecksum {
        let mut bytes = [0u8; MAX_CHECKSUM_WIDTH];
        let len = self.kind().encoded_width();
        bytes.copy_from_slice(&self.as_u32().to_le_bytes());
        EncodedChecksum { bytes, len }
    }

    /// Decodes little-endian storage bytes for `kind`.
    ///
    /// Only the first `kind.encoded_width()` bytes are used; missing bytes
    /// read as zero.
    pub fn decode(kind: ChecksumKind, bytes: &[u8]) -> Self {
        let mut raw = [0u8; MAX_CHECKSUM_WIDTH];
        let len = kind.encoded_width().min(bytes.len());
        raw[..len].copy_from_slice(&bytes[..len]);
        match kind {
            ChecksumKind::Sum16 => ChecksumValue::Sum16(u16::from_le_bytes([raw[0], raw[1]])),
            ChecksumKind::Sum32 => ChecksumValue::Sum32(u32::from_le_bytes(raw)),
        }
    }
}

impl fmt::Display for ChecksumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumValue::Sum16(v) => write!(f, "0x{:04x}", v),
            ChecksumValue::Sum32(v) => write!(f, "0x{:08x}", v),
        }
    }
}

/// Storage bytes of a [`ChecksumValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedChecksum {
    bytes: [u8; MAX_CHECKSUM_WIDTH],
    len: usize,
}

impl EncodedChecksum {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Configured checksum: width, rolling algorithm and initial accumulator.
#[derive(Clone, Copy)]
pub enum Checksum {
    Sum16 { algorithm: Rolling16, initial: u16 },
    Sum32 { algorithm: Rolling32, initial: u32 },
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checksum")
            .field("kind", &self.kind())
            .field("initial", &self.initial())
            .finish_non_exhaustive()
    }
}

impl Default for Checksum {
    /// Additive 16-bit checksum seeded with zero.
    fn default() -> Self {
        Checksum::Sum16 {
            algorithm: additive16,
            initial: 0,
        }
    }
}

impl Checksum {
    pub fn sum16(algorithm: Rolling16, initial: u16) -> Self {
        Checksum::Sum16 { algorithm, initial }
    }

    pub fn sum32(algorithm: Rolling32, initial: u32) -> Self {
        Checksum::Sum32 { algorithm, initial }
    }

    pub fn kind(&self) -> ChecksumKind {
        match self {
            Checksum::Sum16 { .. } => ChecksumKind::Sum16,
            Checksum::Sum32 { .. } => ChecksumKind::Sum32,
        }
    }

    pub fn encoded_width(&self) -> usize {
        self.kind().encoded_width()
    }

    /// The seed every computation starts from.
    pub fn initial(&self) -> ChecksumValue {
        match *self {
            Checksum::Sum16 { initial, .. } => ChecksumValue::Sum16(initial),
            Checksum::Sum32 { initial, .. } => ChecksumValue::Sum32(initial),
        }
    }

    /// Single pass over a whole buffer, starting from the initial value.
    pub fn compute(&self, data: &[u8]) -> ChecksumValue {
        self.accumulate(data, self.initial())
    }

    /// Extends a running accumulator with `data`.
    ///
    /// A running value of the other width is truncated or zero-extended to
    /// this checksum's width first.
    pub fn accumulate(&self, data: &[u8], running: ChecksumValue) -> ChecksumValue {
        match *self {
            Checksum::Sum16 { algorithm, .. } => {
                ChecksumValue::Sum16(algorithm(data, running.as_u32() as u16))
            }
            Checksum::Sum32 { algorithm, .. } => {
                ChecksumValue::Sum32(algorithm(data, running.as_u32()))
            }
        }
    }

    /// Decodes stored bytes at this checksum's width.
    pub fn decode(&self, bytes: &[u8]) -> ChecksumValue {
        ChecksumValue::decode(self.kind(), bytes)
    }
}
