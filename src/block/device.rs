//! Block device primitives
//!
//! A block device moves bytes to and from a byte-addressed medium and
//! reports how many bytes it actually transferred. It never reports
//! errors any other way: a count below the requested length is the only
//! failure signal.

/// Byte-addressed storage medium.
pub trait BlockDevice {
    /// Reads up to `dst.len()` bytes starting at `address`.
    ///
    /// Returns the number of bytes actually placed in `dst`.
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize;

    /// Writes `src` starting at `address`.
    ///
    /// Returns the number of bytes actually written.
    fn write(&mut self, address: u32, src: &[u8]) -> usize;
}

impl<D: BlockDevice + ?Sized> BlockDevice for &mut D {
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize {
        (**self).read(dst, address)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> usize {
        (**self).write(address, src)
    }
}

impl<D: BlockDevice + ?Sized> BlockDevice for Box<D> {
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize {
        (**self).read(dst, address)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> usize {
        (**self).write(address, src)
    }
}

/// Block device built from a pair of read/write closures.
///
/// This is the direct form of a host-supplied driver: `read(dst, address)`
/// and `write(address, src)`, each returning the count transferred.
pub struct FnDevice<R, W> {
    read: R,
    write: W,
}

impl<R, W> FnDevice<R, W>
where
    R: FnMut(&mut [u8], u32) -> usize,
    W: FnMut(u32, &[u8]) -> usize,
{
    pub fn new(read: R, write: W) -> Self {
        Self { read, write }
    }
}

impl<R, W> BlockDevice for FnDevice<R, W>
where
    R: FnMut(&mut [u8], u32) -> usize,
    W: FnMut(u32, &[u8]) -> usize,
{
    fn read(&mut self, dst: &mut [u8], address: u32) -> usize {
        (self.read)(dst, address)
    }

    fn write(&mut self, address: u32, src: &[u8]) -> usize {
        (self.write)(address, src)
    }
}
