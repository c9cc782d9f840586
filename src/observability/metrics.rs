//! Block I/O counters
//!
//! Counters only, monotonic, reset only by creating a new registry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counts block transfers issued through a record's I/O adapter.
#[derive(Debug, Default)]
pub struct IoMetrics {
    reads: AtomicU64,
    writes: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
    short_transfers: AtomicU64,
}

impl IoMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one read call: `requested` bytes asked for, `transferred` delivered.
    pub fn record_read(&self, requested: usize, transferred: usize) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read
            .fetch_add(transferred as u64, Ordering::Relaxed);
        if transferred != requested {
            self.short_transfers.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_write(&self, requested: usize, transferred: usize) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written
            .fetch_add(transferred as u64, Ordering::Relaxed);
        if transferred != requested {
            self.short_transfers.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> IoMetricsSnapshot {
        IoMetricsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            short_transfers: self.short_transfers.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`IoMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoMetricsSnapshot {
    pub reads: u64,
    pub writes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub short_transfers: u64,
}

impl IoMetricsSnapshot {
    /// Total block calls, reads and writes.
    pub fn calls(&self) -> u64 {
        self.reads + self.writes
    }
}
