//! persistent-record - a checksum-protected fixed-size record on
//! block-addressable storage (EEPROM, flash, a file)
//!
//! ```text
//! +---------------------+----------------------------+
//! | Checksum (2|4, LE)  | Data (data_size bytes)     |
//! +---------------------+----------------------------+
//! ```
//!
//! ```
//! use persistent_record::block::MemoryDevice;
//! use persistent_record::record::PersistentRecord;
//!
//! let mut record = PersistentRecord::new(8, MemoryDevice::new(64));
//! record.place(40);
//! record.store_full(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
//! record.validate().unwrap();
//! ```

pub mod block;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod observability;
pub mod record;

pub use block::{BlockDevice, FileDevice, FnDevice, MemoryDevice};
pub use checksum::{Checksum, ChecksumKind, ChecksumValue};
pub use config::{ChecksumAlgorithm, ConfigError, RecordConfig};
pub use record::{PersistentRecord, RecordError, RecordResult};
