//! Record error types
//!
//! Error codes:
//! - RECORD_IO_ERROR (ERROR severity)
//! - RECORD_ADDRESS_OUT_OF_RANGE (ERROR severity)
//! - RECORD_SIZE_MISMATCH (ERROR severity)
//! - RECORD_INVALID_DATA (FATAL severity)
//!
//! Every error is terminal for the operation that produced it. Nothing is
//! retried; whether an I/O failure is transient is the block driver's
//! business.

use std::fmt;

use thiserror::Error;

use crate::checksum::ChecksumValue;
use crate::observability::Severity;

/// Which transfer of an operation came back short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    ChecksumRead,
    ChecksumWrite,
    DataRead,
    DataWrite,
}

impl IoStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoStage::ChecksumRead => "checksum read",
            IoStage::ChecksumWrite => "checksum write",
            IoStage::DataRead => "data read",
            IoStage::DataWrite => "data write",
        }
    }
}

impl fmt::Display for IoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordErrorCode {
    IoError,
    AddressOutOfRange,
    SizeMismatch,
    InvalidData,
}

impl RecordErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            RecordErrorCode::IoError => "RECORD_IO_ERROR",
            RecordErrorCode::AddressOutOfRange => "RECORD_ADDRESS_OUT_OF_RANGE",
            RecordErrorCode::SizeMismatch => "RECORD_SIZE_MISMATCH",
            RecordErrorCode::InvalidData => "RECORD_INVALID_DATA",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RecordErrorCode::IoError => Severity::Error,
            RecordErrorCode::AddressOutOfRange => Severity::Error,
            RecordErrorCode::SizeMismatch => Severity::Error,
            RecordErrorCode::InvalidData => Severity::Fatal,
        }
    }
}

impl fmt::Display for RecordErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure of a record operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A block primitive transferred fewer bytes than requested.
    #[error("short {stage} at address {address}: {transferred} of {requested} bytes")]
    Io {
        stage: IoStage,
        address: u32,
        requested: usize,
        transferred: usize,
    },

    /// `offset + length` exceeds the data region. No I/O was attempted.
    #[error("window {offset}+{length} exceeds data size {size}")]
    AddressOutOfRange {
        offset: usize,
        length: usize,
        size: usize,
    },

    /// A whole-region buffer is not exactly `data_size` bytes. No I/O was attempted.
    #[error("buffer of {actual} bytes for a {expected}-byte record")]
    SizeMismatch { expected: usize, actual: usize },

    /// Both reads succeeded but the stored checksum does not describe the data.
    #[error("checksum mismatch: stored {stored}, computed {computed}")]
    InvalidData {
        stored: ChecksumValue,
        computed: ChecksumValue,
    },
}

impl RecordError {
    pub fn short_transfer(stage: IoStage, address: u32, requested: usize, transferred: usize) -> Self {
        RecordError::Io {
            stage,
            address,
            requested,
            transferred,
        }
    }

    pub fn code(&self) -> RecordErrorCode {
        match self {
            RecordError::Io { .. } => RecordErrorCode::IoError,
            RecordError::AddressOutOfRange { .. } => RecordErrorCode::AddressOutOfRange,
            RecordError::SizeMismatch { .. } => RecordErrorCode::SizeMismatch,
            RecordError::InvalidData { .. } => RecordErrorCode::InvalidData,
        }
    }

    pub fn severity(&self) -> Severity {
        self.code().severity()
    }

    /// Invalid data means the record cannot be trusted until rewritten.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn is_io(&self) -> bool {
        matches!(self, RecordError::Io { .. })
    }
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let io = RecordError::short_transfer(IoStage::DataRead, 10, 4, 1);
        let range = RecordError::AddressOutOfRange {
            offset: 4,
            length: 8,
            size: 8,
        };
        let invalid = RecordError::InvalidData {
            stored: ChecksumValue::Sum16(1),
            computed: ChecksumValue::Sum16(2),
        };
        assert_eq!(io.code().code(), "RECORD_IO_ERROR");
        assert_eq!(range.code().code(), "RECORD_ADDRESS_OUT_OF_RANGE");
        assert_eq!(invalid.code().code(), "RECORD_INVALID_DATA");
    }

    #[test]
    fn test_only_invalid_data_is_fatal() {
        assert!(!RecordError::short_transfer(IoStage::ChecksumWrite, 0, 2, 0).is_fatal());
        assert!(RecordError::InvalidData {
            stored: ChecksumValue::Sum32(1),
            computed: ChecksumValue::Sum32(2),
        }
        .is_fatal());
    }

    #[test]
    fn test_display_names_stage_and_counts() {
        let err = RecordError::short_transfer(IoStage::ChecksumRead, 100, 2, 1);
        let text = err.to_string();
        assert!(text.contains("checksum read"));
        assert!(text.contains("100"));
        assert!(text.contains("1 of 2"));
    }

    #[test]
    fn test_display_invalid_data_shows_both_values() {
        let err = RecordError::InvalidData {
            stored: ChecksumValue::Sum16(0x24),
            computed: ChecksumValue::Sum16(0x25),
        };
        let text = err.to_string();
        assert!(text.contains("0x0024"));
        assert!(text.contains("0x0025"));
    }
}
