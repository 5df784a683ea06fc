//! CRC-32 helpers for bucket records
//!
//! Records are protected by CRC-32 with the IEEE 802.3 polynomial. The
//! checksum covers every byte of the record except the leading 4-byte
//! checksum field.

/// Compute the CRC-32 of a byte slice
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// An incremental hasher for records read in several pieces
#[derive(Clone, Default)]
pub struct RecordHasher {
    hasher: crc32fast::Hasher,
    bytes_processed: u64,
}

impl RecordHasher {
    /// Create a new incremental hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes_processed += data.len() as u64;
    }

    /// Get the number of bytes hashed so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Finalize and return the checksum
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}
