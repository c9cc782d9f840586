//! Block I/O for persistent records
//!
//! The record never touches storage directly. It goes through a
//! [`BlockDevice`] (host driver: memory, file, EEPROM, closures) wrapped
//! in a [`BlockIo`] that turns short transfers into errors and counts
//! every call.

mod adapter;
mod device;
mod file;
mod memory;

pub use adapter::BlockIo;
pub use device::{BlockDevice, FnDevice};
pub use file::FileDevice;
pub use memory::MemoryDevice;
