//! Persistent record subsystem
//!
//! One fixed-size data region on a block device, prefixed by a
//! little-endian checksum:
//!
//! ```text
//! +---------------------+----------------------------+
//! | Checksum (2|4, LE)  | Data (data_size bytes)     |
//! +---------------------+----------------------------+
//! ^ base_address        ^ base_address + width
//! ```
//!
//! No header, magic or length is stored. Width, size and base address come
//! from the host and must stay the same across restarts for validation to
//! mean anything.
//!
//! # Guarantees
//!
//! - Range violations are rejected before any I/O
//! - A short transfer fails the operation immediately, never retried
//! - Full stores leave data and checksum consistent
//! - Partial stores keep the old checksum (see [`PersistentRecord::store_part`])
//!
//! A record is single-owner and not synchronized.

mod accessor;
mod errors;
mod layout;

pub use accessor::PersistentRecord;
pub use errors::{IoStage, RecordError, RecordErrorCode, RecordResult};
pub use layout::Layout;
