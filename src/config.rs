//! Record configuration
//!
//! A record's geometry is not stored on media, so hosts keep it in a JSON
//! file:
//!
//! ```json
//! {
//!   "data_size": 64,
//!   "base_address": 128,
//!   "checksum": "crc32",
//!   "initial": 0,
//!   "scratch_size": 16
//! }
//! ```
//!
//! Only `data_size` is required. Defaults: base address 0, `additive16`,
//! initial accumulator 0, no scratch buffer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::BlockDevice;
use crate::checksum::{additive16, additive32, crc32, Checksum, ChecksumKind};
use crate::record::PersistentRecord;

/// Configuration failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_FAILED",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Named rolling algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// Byte sum in 16 bits
    #[default]
    Additive16,
    /// Byte sum in 32 bits
    Additive32,
    /// IEEE CRC32
    Crc32,
}

impl ChecksumAlgorithm {
    pub fn kind(&self) -> ChecksumKind {
        match self {
            ChecksumAlgorithm::Additive16 => ChecksumKind::Sum16,
            ChecksumAlgorithm::Additive32 | ChecksumAlgorithm::Crc32 => ChecksumKind::Sum32,
        }
    }

    /// Checksum seeded with `initial`, truncated to the algorithm's width.
    pub fn checksum(&self, initial: u32) -> Checksum {
        match self {
            ChecksumAlgorithm::Additive16 => Checksum::sum16(additive16, initial as u16),
            ChecksumAlgorithm::Additive32 => Checksum::sum32(additive32, initial),
            ChecksumAlgorithm::Crc32 => Checksum::sum32(crc32, initial),
        }
    }
}

/// Geometry and checksum of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordConfig {
    /// Data region size in bytes
    pub data_size: usize,

    /// Address of the first checksum byte
    #[serde(default)]
    pub base_address: u32,

    #[serde(default)]
    pub checksum: ChecksumAlgorithm,

    /// Initial accumulator
    #[serde(default)]
    pub initial: u32,

    /// Scratch buffer size for validation reads, 0 for none
    #[serde(default)]
    pub scratch_size: usize,
}

impl RecordConfig {
    pub fn new(data_size: usize) -> Self {
        Self {
            data_size,
            base_address: 0,
            checksum: ChecksumAlgorithm::default(),
            initial: 0,
            scratch_size: 0,
        }
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: RecordConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_size == 0 {
            return Err(ConfigError::Invalid("data_size must be > 0".into()));
        }

        if self.checksum.kind() == ChecksumKind::Sum16 && self.initial > u32::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "initial {} does not fit a 16-bit checksum",
                self.initial
            )));
        }

        let end = u64::from(self.base_address)
            + self.checksum.kind().encoded_width() as u64
            + self.data_size as u64;
        if end > 1u64 << 32 {
            return Err(ConfigError::Invalid(format!(
                "record [{}, {}) does not fit the 32-bit address space",
                self.base_address, end
            )));
        }

        // Chunks never exceed the data size, so a larger buffer is never used.
        if self.scratch_size > self.data_size {
            return Err(ConfigError::Invalid(format!(
                "scratch_size {} exceeds data_size {}",
                self.scratch_size, self.data_size
            )));
        }

        Ok(())
    }

    pub fn build_checksum(&self) -> Checksum {
        self.checksum.checksum(self.initial)
    }

    /// Bytes a medium needs to hold the whole record: `base + width + size`.
    pub fn image_len(&self) -> u64 {
        u64::from(self.base_address)
            + self.checksum.kind().encoded_width() as u64
            + self.data_size as u64
    }

    /// Installs base address and checksum on `record`.
    pub fn apply<D: BlockDevice>(&self, record: &mut PersistentRecord<'_, D>) {
        record.place(self.base_address);
        record.set_checksum(self.build_checksum());
    }

    /// Creates a configured record on `device`. The scratch buffer, if
    /// wanted, is attached by the caller who owns it.
    pub fn open<'buf, D: BlockDevice>(&self, device: D) -> PersistentRecord<'buf, D> {
        let mut record = PersistentRecord::new(self.data_size, device);
        self.apply(&mut record);
        record
    }
}
