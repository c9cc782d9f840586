//! File-backed block device

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::device::BlockDevice;

/// A file used as a fixed-capacity medium.
///
/// Capacity is the file length at open time; the file is never grown by
/// a block write. Every write is followed by `sync_data`, and a failed
/// sync reports zero bytes written.
#[derive(Debug)]
pub struct FileDevice {
    path: PathBuf,
    file: File,
    capacity: u64,
}

impl FileDevice {
    /// Opens an existing image for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        let capacity = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            capacity,
        })
    }

    /// Creates a zero-filled image of `capacity` bytes.
    ///
    /// Fails if the file already exists.
    pub fn create(path: impl AsRef<Path>, capacity: u64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.set_len(capacity)?;
        file.sync_all()?;
        Ok(Self {
            path,
            file,
            capacity,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bytes of a `len`-byte transfer at `address` that stay inside capacity.
    fn clamp(&self, address: u32, len: usize) -> usize {
        let room = self.capacity.saturating_sub(u64::from(address));
        room.min(len as u64) as usize
    }
}

impl BlockDevice for FileDevice {
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize {
        let len = self.clamp(address, dst.len());
        if self.file.seek(SeekFrom::Start(u64::from(address))).is_err() {
            return 0;
        }

        let mut done = 0;
        while done < len {
            match self.file.read(&mut dst[done..len]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        done
    }

    fn write(&mut self, address: u32, src: &[u8]) -> usize {
        let len = self.clamp(address, src.len());
        if self.file.seek(SeekFrom::Start(u64::from(address))).is_err() {
            return 0;
        }

        let mut done = 0;
        while done < len {
            match self.file.write(&src[done..len]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }

        if self.file.sync_data().is_err() {
            return 0;
        }
        done
    }
}
