//! CRC32 helpers
//!
//! Every checksum in the format is an independent CRC-32 (IEEE polynomial)
//! seeded with [`CRC_SEED`], the same value zlib's `crc32(data, seed)` takes.

/// Seed passed for every page, entry and data checksum
pub const CRC_SEED: u32 = 0xFFFF_FFFF;

/// Computes a CRC32 over `data` starting from `seed`.
#[inline]
pub fn crc32(data: &[u8], seed: u32) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(seed);
    hasher.update(data);
    hasher.finalize()
}

/// Checksum of an entry header: bytes [0:4) followed by [8:32), skipping the
/// CRC field itself.
pub fn entry_crc(entry: &[u8; 32]) -> u32 {
    let mut hasher = crc32fast::Hasher::new_with_initial(CRC_SEED);
    hasher.update(&entry[0..4]);
    hasher.update(&entry[8..32]);
    hasher.finalize()
}

/// Checksum of a page header: bytes [4:28)
pub fn page_header_crc(header: &[u8]) -> u32 {
    crc32(&header[4..28], CRC_SEED)
}
