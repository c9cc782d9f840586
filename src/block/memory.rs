//! In-memory block device

use super::device::BlockDevice;

/// Fixed-capacity medium held in memory.
///
/// Transfers that run past the end are cut short at the end, like a real
/// EEPROM would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDevice {
    bytes: Vec<u8>,
}

impl MemoryDevice {
    /// Creates a zero-filled medium of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Range of the medium a transfer of `len` bytes at `address` reaches.
    fn span(&self, address: u32, len: usize) -> std::ops::Range<usize> {
        let start = (address as usize).min(self.bytes.len());
        let end = start.saturating_add(len).min(self.bytes.len());
        start..end
    }
}

impl BlockDevice for MemoryDevice {
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize {
        let span = self.span(address, dst.len());
        let n = span.len();
        dst[..n].copy_from_slice(&self.bytes[span]);
        n
    }

    fn write(&mut self, address: u32, src: &[u8]) -> usize {
        let span = self.span(address, src.len());
        let n = span.len();
        self.bytes[span].copy_from_slice(&src[..n]);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_inside_capacity() {
        let mut device = MemoryDevice::new(16);
        assert_eq!(device.write(4, &[1, 2, 3]), 3);

        let mut buf = [0u8; 3];
        assert_eq!(device.read(&mut buf, 4), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(&device.as_bytes()[3..8], &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_transfers_cut_at_end() {
        let mut device = MemoryDevice::new(8);
        assert_eq!(device.write(6, &[9, 9, 9, 9]), 2);

        let mut buf = [0u8; 4];
        assert_eq!(device.read(&mut buf, 6), 2);
        assert_eq!(&buf[..2], &[9, 9]);
    }

    #[test]
    fn test_transfers_past_end_move_nothing() {
        let mut device = MemoryDevice::new(8);
        let mut buf = [0u8; 2];
        assert_eq!(device.read(&mut buf, 100), 0);
        assert_eq!(device.write(u32::MAX, &[1]), 0);
    }
}
