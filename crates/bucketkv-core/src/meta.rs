//! Fixed-size bucket record header
//!
//! Layout (little-endian):
//! - crc: 4 bytes (CRC-32 of everything after this field)
//! - op: 2 bytes (insert, update or delete)
//! - size: 4 bytes (payload length)

use crate::types::BucketOperation;
use crate::{CoreError, Result};
use bytes::Buf;
use serde::{Deserialize, Serialize};

/// Size of the checksum field in bytes
pub const CRC_SIZE: usize = std::mem::size_of::<u32>();

/// Size of the operation code field in bytes
pub const OP_SIZE: usize = std::mem::size_of::<u16>();

/// Size of the payload length field in bytes
pub const SIZE_FIELD_SIZE: usize = std::mem::size_of::<u32>();

/// Size of the header in bytes
pub const META_SIZE: usize = CRC_SIZE + OP_SIZE + SIZE_FIELD_SIZE;

const _: () = assert!(META_SIZE == 10);

/// Offset of the first byte covered by the record checksum
pub(crate) const CRC_COVERAGE_START: usize = CRC_SIZE;

/// Header of an on-disk bucket record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMeta {
    /// Checksum over the header tail and payload
    pub crc: u32,
    /// Most recent lifecycle operation
    pub op: BucketOperation,
    /// Payload length in bytes
    pub size: u32,
}

impl BucketMeta {
    /// Create a header for the given operation.
    ///
    /// `crc` and `size` are filled in by `Bucket::encode`.
    pub fn new(op: BucketOperation) -> Self {
        Self { crc: 0, op, size: 0 }
    }

    /// Decode a header from the first `META_SIZE` bytes.
    ///
    /// The checksum is read but not verified, and any operation code is
    /// accepted so the caller can always compare checksums first.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < META_SIZE {
            return Err(CoreError::truncated("bucket header", META_SIZE, bytes.len()));
        }

        let mut buf = &bytes[..META_SIZE];
        let crc = buf.get_u32_le();
        let op = BucketOperation::from(buf.get_u16_le());
        let size = buf.get_u32_le();

        Ok(Self { crc, op, size })
    }

    /// Get the operation, rejecting codes outside insert/update/delete
    pub fn operation(&self) -> Result<BucketOperation> {
        self.op.ensure_known()
    }

    /// Total on-disk footprint of the record this header describes
    pub fn entry_size(&self) -> usize {
        META_SIZE + self.size as usize
    }
}
