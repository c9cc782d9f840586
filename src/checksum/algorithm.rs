//! Rolling checksum algorithms
//!
//! A rolling algorithm extends an accumulator with more bytes. Feeding a
//! region in one call or in any number of consecutive chunks must give the
//! same result, which is what lets validation stream the data region
//! through a small scratch buffer.

use crc32fast::Hasher;

/// Rolling algorithm over a 16-bit accumulator.
pub type Rolling16 = fn(&[u8], u16) -> u16;

/// Rolling algorithm over a 32-bit accumulator.
pub type Rolling32 = fn(&[u8], u32) -> u32;

/// Default algorithm: every byte added into a
/// wrapping 16-bit sum.
pub fn additive16(data: &[u8], init: u16) -> u16 {
    data.iter()
        .fold(init, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Same additive rule as [`additive16`], carried in a 32-bit accumulator.
pub fn additive32(data: &[u8], init: u32) -> u32 {
    data.iter()
        .fold(init, |acc, &b| acc.wrapping_add(u32::from(b)))
}

/// IEEE CRC32, resumed from `init`.
///
/// `init` is the CRC of everything fed so far (zero for an empty prefix),
/// so `crc32(b, crc32(a, 0)) == crc32(a ++ b, 0)`.
pub fn crc32(data: &[u8], init: u32) -> u32 {
    let mut hasher = Hasher::new_with_initial(init);
    hasher.update(data);
    hasher.finalize()
}
