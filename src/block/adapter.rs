//! Block I/O adapter
//!
//! Wraps a [`BlockDevice`] so that every transfer is all-or-nothing from
//! the caller's point of view: a short count becomes a
//! [`RecordError::Io`] naming the stage, address and counts. The adapter
//! never retries.

use super::device::BlockDevice;
use crate::observability::{IoMetrics, IoMetricsSnapshot};
use crate::record::{IoStage, RecordError, RecordResult};

/// Exact-transfer wrapper around a block device.
pub struct BlockIo<D> {
    device: D,
    metrics: IoMetrics,
}

impl<D: BlockDevice> BlockIo<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            metrics: IoMetrics::new(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn metrics(&self) -> IoMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// One block read filling all of `dst`.
    pub fn read_exact(&mut self, dst: &mut [u8], address: u32, stage: IoStage) -> RecordResult<()> {
        let requested = dst.len();
        let transferred = self.device.read(dst, address);
        self.metrics.record_read(requested, transferred);
        if transferred != requested {
            return Err(RecordError::short_transfer(stage, address, requested, transferred));
        }
        Ok(())
    }

    /// One block write of all of `src`.
    pub fn write_exact(&mut self, address: u32, src: &[u8], stage: IoStage) -> RecordResult<()> {
        let requested = src.len();
        let transferred = self.device.write(address, src);
        self.metrics.record_write(requested, transferred);
        if transferred != requested {
            return Err(RecordError::short_transfer(stage, address, requested, transferred));
        }
        Ok(())
    }

    /// Reads `len` bytes starting at `address` in chunks no larger than
    /// `scratch`, handing each chunk to `sink` in order.
    ///
    /// Without a scratch buffer (or with an empty one) chunks are one byte
    /// long. The first short read aborts the stream; `sink` has then seen
    /// only complete chunks before the failing one.
    pub fn stream<F>(
        &mut self,
        address: u32,
        len: usize,
        scratch: Option<&mut [u8]>,
        stage: IoStage,
        mut sink: F,
    ) -> RecordResult<()>
    where
        F: FnMut(&[u8]),
    {
        let mut fallback = [0u8; 1];
        let buffer: &mut [u8] = match scratch {
            Some(buf) if !buf.is_empty() => buf,
            _ => &mut fallback,
        };

        let mut address = address;
        let mut rest = len;
        while rest > 0 {
            let n = rest.min(buffer.len());
            let chunk = &mut buffer[..n];
            self.read_exact(chunk, address, stage)?;
            sink(chunk);

            rest -= n;
            address = address.wrapping_add(n as u32);
        }
        Ok(())
    }
}
