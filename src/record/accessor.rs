//! Checksum-protected record accessor
//!
//! A [`PersistentRecord`] owns the layout and checksum configuration of one
//! record and drives a block device to fetch, store and validate it.
//!
//! Store policy:
//! - Full-region store: checksum computed from the caller's bytes in one
//!   pass and written after the data.
//! - Partial store: the checksum currently on media is read back and
//!   written again unchanged. It is NOT recomputed, so after a partial
//!   store the stored checksum may no longer describe the data and
//!   `validate` can report invalid data. A following full-region store
//!   makes the record consistent again.
//!
//! Validation streams the data region through the attached scratch
//! buffer (one byte at a time without one) so peak memory stays bounded
//! for large records.
//!
//! Range and size preconditions are checked before any I/O. The first
//! short transfer ends the operation.

use super::errors::{IoStage, RecordError, RecordResult};
use super::layout::Layout;
use crate::block::{BlockDevice, BlockIo};
use crate::checksum::{Checksum, ChecksumKind, ChecksumValue, Rolling16, Rolling32};
use crate::observability::{log_event, Event, IoMetricsSnapshot};

/// One fixed-size record, prefixed by its checksum, on a block device.
///
/// `'buf` is the lifetime of the borrowed scratch buffer, if any.
pub struct PersistentRecord<'buf, D> {
    checksum: Checksum,
    layout: Layout,
    io: BlockIo<D>,
    scratch: Option<&'buf mut [u8]>,
    tracing: bool,
}

impl<'buf, D: BlockDevice> PersistentRecord<'buf, D> {
    /// Creates a record of `data_size` bytes at base address zero with the
    /// default additive 16-bit checksum seeded with zero.
    pub fn new(data_size: usize, device: D) -> Self {
        let checksum = Checksum::default();
        Self {
            checksum,
            layout: Layout::new(data_size, checksum.kind()),
            io: BlockIo::new(device),
            scratch: None,
            tracing: false,
        }
    }

    // Configuration

    /// Moves the record so its checksum starts at `base_address`.
    pub fn place(&mut self, base_address: u32) {
        self.layout.place(base_address);
    }

    /// Installs a checksum variant, algorithm and seed.
    pub fn set_checksum(&mut self, checksum: Checksum) {
        self.checksum = checksum;
        self.layout.set_kind(checksum.kind());
    }

    pub fn set_checksum_16(&mut self, algorithm: Rolling16, initial: u16) {
        self.set_checksum(Checksum::sum16(algorithm, initial));
    }

    pub fn set_checksum_32(&mut self, algorithm: Rolling32, initial: u32) {
        self.set_checksum(Checksum::sum32(algorithm, initial));
    }

    /// Lends a scratch buffer used to chunk validation reads.
    ///
    /// Replaces any buffer attached before. An empty buffer behaves like
    /// no buffer.
    pub fn attach_buffer(&mut self, buffer: &'buf mut [u8]) {
        self.scratch = Some(buffer);
    }

    /// Takes the scratch buffer back; validation falls back to one byte
    /// per read.
    pub fn detach_buffer(&mut self) -> Option<&'buf mut [u8]> {
        self.scratch.take()
    }

    /// Logs every operation outcome when on. Off by default.
    pub fn set_tracing(&mut self, on: bool) {
        self.tracing = on;
    }

    // Introspection

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn checksum_kind(&self) -> ChecksumKind {
        self.checksum.kind()
    }

    pub fn base_address(&self) -> u32 {
        self.layout.base_address()
    }

    pub fn data_address(&self) -> u32 {
        self.layout.data_address()
    }

    pub fn data_size(&self) -> usize {
        self.layout.data_size()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scratch_size(&self) -> Option<usize> {
        self.scratch.as_ref().map(|b| b.len())
    }

    pub fn metrics(&self) -> IoMetricsSnapshot {
        self.io.metrics()
    }

    pub fn device(&self) -> &D {
        self.io.device()
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.io.device_mut()
    }

    /// Releases the device. The scratch buffer borrow ends here too.
    pub fn into_device(self) -> D {
        self.io.into_device()
    }

    // Data access

    /// Reads `dst.len()` bytes starting at data `offset`.
    pub fn fetch_part(&mut self, dst: &mut [u8], offset: usize) -> RecordResult<()> {
        let length = dst.len();
        let result = self
            .layout
            .window(offset, length)
            .and_then(|address| self.io.read_exact(dst, address, IoStage::DataRead));
        self.observe(Event::Fetch, offset, length, result)
    }

    /// Reads the whole data region. `dst` must be exactly `data_size` bytes.
    pub fn fetch_full(&mut self, dst: &mut [u8]) -> RecordResult<()> {
        let checked = self.require_full(dst.len());
        if checked.is_err() {
            return self.observe(Event::Fetch, 0, dst.len(), checked);
        }
        self.fetch_part(dst, 0)
    }

    /// Reads the whole data region into a new buffer.
    pub fn fetch_vec(&mut self) -> RecordResult<Vec<u8>> {
        let mut data = vec![0u8; self.data_size()];
        self.fetch_full(&mut data)?;
        Ok(data)
    }

    /// Writes `src` at data `offset`, then the checksum.
    ///
    /// Only a store covering the whole region recomputes the checksum;
    /// any other window rewrites the stored checksum unchanged.
    pub fn store_part(&mut self, src: &[u8], offset: usize) -> RecordResult<()> {
        let length = src.len();
        let result = self.store_window(src, offset);
        self.observe(Event::Store, offset, length, result)
    }

    /// Writes the whole data region and its fresh checksum. `src` must be
    /// exactly `data_size` bytes.
    pub fn store_full(&mut self, src: &[u8]) -> RecordResult<()> {
        let checked = self.require_full(src.len());
        if checked.is_err() {
            return self.observe(Event::Store, 0, src.len(), checked);
        }
        self.store_part(src, 0)
    }

    fn store_window(&mut self, src: &[u8], offset: usize) -> RecordResult<()> {
        let address = self.layout.window(offset, src.len())?;
        self.io.write_exact(address, src, IoStage::DataWrite)?;

        let sum = if offset == 0 && src.len() == self.layout.data_size() {
            self.checksum.compute(src)
        } else {
            self.stored_checksum()?
        };
        self.write_checksum(sum)
    }

    // Checksum

    /// Recomputes the checksum by streaming the data region from media.
    pub fn compute_checksum(&mut self) -> RecordResult<ChecksumValue> {
        let checksum = self.checksum;
        let mut running = checksum.initial();
        self.io.stream(
            self.layout.data_address(),
            self.layout.data_size(),
            self.scratch.as_deref_mut(),
            IoStage::DataRead,
            |chunk| running = checksum.accumulate(chunk, running),
        )?;
        Ok(running)
    }

    /// Checks the stored checksum against the data on media.
    ///
    /// Returns `InvalidData` when both reads succeed but the values differ.
    pub fn validate(&mut self) -> RecordResult<()> {
        let length = self.layout.data_size();
        let result = self.compare_checksums();
        self.observe(Event::Validate, 0, length, result)
    }

    fn compare_checksums(&mut self) -> RecordResult<()> {
        let stored = self.stored_checksum()?;
        let computed = self.compute_checksum()?;
        if stored != computed {
            return Err(RecordError::InvalidData { stored, computed });
        }
        Ok(())
    }

    /// Reads and decodes the checksum currently on media.
    pub fn stored_checksum(&mut self) -> RecordResult<ChecksumValue> {
        let mut raw = [0u8; crate::checksum::MAX_CHECKSUM_WIDTH];
        let bytes = &mut raw[..self.layout.checksum_width()];
        self.io
            .read_exact(bytes, self.layout.base_address(), IoStage::ChecksumRead)?;
        Ok(self.checksum.decode(bytes))
    }

    fn write_checksum(&mut self, sum: ChecksumValue) -> RecordResult<()> {
        let encoded = sum.encode();
        self.io.write_exact(
            self.layout.base_address(),
            encoded.as_bytes(),
            IoStage::ChecksumWrite,
        )
    }

    fn require_full(&self, actual: usize) -> RecordResult<()> {
        let expected = self.layout.data_size();
        if actual != expected {
            return Err(RecordError::SizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn observe<T>(&self, event: Event, offset: usize, length: usize, result: RecordResult<T>) -> RecordResult<T> {
        if !self.tracing {
            return result;
        }

        let base = self.layout.base_address().to_string();
        let offset = offset.to_string();
        let length = length.to_string();
        match &result {
            Ok(_) => log_event(
                event,
                &[
                    ("base_address", base.as_str()),
                    ("offset", offset.as_str()),
                    ("length", length.as_str()),
                ],
            ),
            Err(err) => {
                let failure = match err {
                    RecordError::Io { .. } => Event::IoFailure,
                    RecordError::InvalidData { .. } => Event::Corruption,
                    RecordError::AddressOutOfRange { .. } | RecordError::SizeMismatch { .. } => {
                        Event::RangeRejected
                    }
                };
                let message = err.to_string();
                log_event(
                    failure,
                    &[
                        ("base_address", base.as_str()),
                        ("offset", offset.as_str()),
                        ("length", length.as_str()),
                        ("code", err.code().code()),
                        ("error", message.as_str()),
                        ("operation", event.as_str()),
                    ],
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemoryDevice;
    use crate::checksum::{additive32, crc32};

    fn record<'a>(data_size: usize) -> PersistentRecord<'a, MemoryDevice> {
        PersistentRecord::new(data_size, MemoryDevice::new(256))
    }

    #[test]
    fn test_defaults() {
        let rec = record(8);
        assert_eq!(rec.checksum_kind(), ChecksumKind::Sum16);
        assert_eq!(rec.checksum().initial(), ChecksumValue::Sum16(0));
        assert_eq!(rec.base_address(), 0);
        assert_eq!(rec.data_address(), 2);
        assert_eq!(rec.data_size(), 8);
        assert_eq!(rec.scratch_size(), None);
    }

    #[test]
    fn test_concrete_layout_on_media() {
        let mut rec = record(8);
        rec.place(100);
        rec.store_full(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let media = rec.device().as_bytes();
        assert_eq!(&media[100..102], &[0x24, 0x00]);
        assert_eq!(&media[102..110], &[1, 2, 3, 4, 5, 6, 7, 8]);
        rec.validate().unwrap();
    }

    #[test]
    fn test_set_checksum_moves_data() {
        let mut rec = record(4);
        rec.place(10);
        rec.set_checksum_32(crc32, 0);
        assert_eq!(rec.data_address(), 14);
        rec.set_checksum_16(crate::checksum::additive16, 0);
        assert_eq!(rec.data_address(), 12);
    }

    #[test]
    fn test_fetch_part_reads_window() {
        let mut rec = record(8);
        rec.store_full(&[10, 11, 12, 13, 14, 15, 16, 17]).unwrap();

        let mut buf = [0u8; 3];
        rec.fetch_part(&mut buf, 4).unwrap();
        assert_eq!(buf, [14, 15, 16]);
    }

    #[test]
    fn test_full_operations_require_exact_size() {
        let mut rec = record(8);
        assert_eq!(
            rec.store_full(&[1, 2, 3]).unwrap_err(),
            RecordError::SizeMismatch {
                expected: 8,
                actual: 3
            }
        );
        let mut big = [0u8; 9];
        assert!(matches!(
            rec.fetch_full(&mut big),
            Err(RecordError::SizeMismatch { .. })
        ));
        assert_eq!(rec.metrics().calls(), 0);
    }

    #[test]
    fn test_store_full_issues_two_writes() {
        let mut rec = record(8);
        rec.store_full(&[0; 8]).unwrap();
        let m = rec.metrics();
        assert_eq!(m.writes, 2);
        assert_eq!(m.reads, 0);
        assert_eq!(m.bytes_written, 10);
    }

    #[test]
    fn test_partial_store_rewrites_stored_checksum() {
        let mut rec = record(8);
        rec.store_full(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        rec.store_part(&[100, 100], 2).unwrap();

        assert_eq!(rec.stored_checksum().unwrap(), ChecksumValue::Sum16(36));
        assert_eq!(rec.fetch_vec().unwrap(), vec![1, 2, 100, 100, 5, 6, 7, 8]);
        assert!(matches!(
            rec.validate(),
            Err(RecordError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_partial_store_covering_region_recomputes() {
        let mut rec = record(4);
        rec.store_part(&[1, 1, 1, 1], 0).unwrap();
        assert_eq!(rec.stored_checksum().unwrap(), ChecksumValue::Sum16(4));
        rec.validate().unwrap();
    }

    #[test]
    fn test_validate_32bit_with_seed() {
        let mut rec = record(6);
        rec.set_checksum_32(additive32, 0x0100_0000);
        rec.store_full(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            rec.stored_checksum().unwrap(),
            ChecksumValue::Sum32(0x0100_0015)
        );
        assert_eq!(&rec.device().as_bytes()[..4], &[0x15, 0x00, 0x00, 0x01]);
        rec.validate().unwrap();
    }

    #[test]
    fn test_compute_checksum_independent_of_scratch() {
        let mut scratch = [0u8; 7];
        let payload: Vec<u8> = (0..50u8).collect();
        let mut rec = record(payload.len());
        rec.set_checksum_32(crc32, 0);
        rec.store_full(&payload).unwrap();
        let expected = rec.compute_checksum().unwrap();

        rec.attach_buffer(&mut scratch);
        assert_eq!(rec.compute_checksum().unwrap(), expected);
        assert_eq!(rec.detach_buffer().map(|b| b.len()), Some(7));
        assert_eq!(rec.compute_checksum().unwrap(), expected);
    }

    #[test]
    fn test_tracing_does_not_change_results() {
        let mut rec = record(4);
        rec.set_tracing(true);
        rec.store_full(&[1, 2, 3, 4]).unwrap();
        rec.validate().unwrap();
        let mut buf = [0u8; 8];
        assert!(matches!(
            rec.fetch_part(&mut buf, 0),
            Err(RecordError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn test_zero_length_partial_store_keeps_checksum() {
        let mut rec = record(4);
        rec.store_full(&[5, 5, 5, 5]).unwrap();
        rec.store_part(&[], 4).unwrap();
        rec.validate().unwrap();
    }
}
