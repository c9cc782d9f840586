//! On-media layout of a record
//!
//! ```text
//! base_address                     data_address
//! |<-- checksum (2 or 4 bytes) -->|<-- data (data_size bytes) -->|
//! ```
//!
//! The data address is always `base_address + encoded_width`. It is
//! re-derived immediately whenever the base address or the checksum
//! width changes. Addresses are 32-bit and wrap.

use super::errors::{RecordError, RecordResult};
use crate::checksum::ChecksumKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    base_address: u32,
    kind: ChecksumKind,
    data_address: u32,
    data_size: usize,
}

impl Layout {
    /// Layout at base address zero.
    pub fn new(data_size: usize, kind: ChecksumKind) -> Self {
        let mut layout = Self {
            base_address: 0,
            kind,
            data_address: 0,
            data_size,
        };
        layout.derive();
        layout
    }

    fn derive(&mut self) {
        self.data_address = self
            .base_address
            .wrapping_add(self.kind.encoded_width() as u32);
    }

    /// Moves the checksum to `base_address`.
    pub fn place(&mut self, base_address: u32) {
        self.base_address = base_address;
        self.derive();
    }

    /// Changes the checksum width in front of the data.
    pub fn set_kind(&mut self, kind: ChecksumKind) {
        self.kind = kind;
        self.derive();
    }

    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    pub fn kind(&self) -> ChecksumKind {
        self.kind
    }

    pub fn checksum_width(&self) -> usize {
        self.kind.encoded_width()
    }

    pub fn data_address(&self) -> u32 {
        self.data_address
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Checksum plus data, in bytes.
    pub fn record_len(&self) -> usize {
        self.checksum_width() + self.data_size
    }

    /// Media address of the `length`-byte window at data `offset`.
    ///
    /// Fails with `AddressOutOfRange` unless `offset + length <= data_size`.
    pub fn window(&self, offset: usize, length: usize) -> RecordResult<u32> {
        match offset.checked_add(length) {
            Some(end) if end <= self.data_size => {
                Ok(self.data_address.wrapping_add(offset as u32))
            }
            _ => Err(RecordError::AddressOutOfRange {
                offset,
                length,
                size: self.data_size,
            }),
        }
    }
}
