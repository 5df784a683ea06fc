//! Bucket record codec
//!
//! A record is the fixed header followed by the payload:
//!
//! ```text
//! ┌───────┬──────┬────────┬──────────┬────────┬──────────────┐
//! │ crc   │ op   │ size   │ id       │ ds     │ name         │
//! │ u32   │ u16  │ u32    │ u64      │ u16    │ size-10 bytes│
//! └───────┴──────┴────────┴──────────┴────────┴──────────────┘
//!  └──────── header ──────┘└────────────── payload ───────────┘
//! ```
//!
//! All integers are little-endian. The crc covers everything after itself.

use crate::{
    checksum::{checksum, RecordHasher},
    config::CodecConfig,
    meta::{BucketMeta, CRC_COVERAGE_START, CRC_SIZE, META_SIZE, OP_SIZE},
    types::{BucketId, BucketOperation, DataStructure, DS_SIZE, ID_SIZE},
    CoreError, Result,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Size of the fixed part of the payload (id + data-structure tag)
pub const PAYLOAD_FIXED_SIZE: usize = ID_SIZE + DS_SIZE;

/// A bucket as stored on disk
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Record header
    pub meta: BucketMeta,
    /// Identity assigned at creation time
    pub id: BucketId,
    /// Data structure owning this bucket's keys
    pub ds: DataStructure,
    /// Human-readable name
    pub name: String,
}

impl Bucket {
    /// Create an insert record for a new bucket
    pub fn new(id: BucketId, ds: DataStructure, name: impl Into<String>) -> Self {
        Self {
            meta: BucketMeta::new(BucketOperation::Insert),
            id,
            ds,
            name: name.into(),
        }
    }

    /// Set the operation recorded in the header
    pub fn with_operation(mut self, op: BucketOperation) -> Self {
        self.meta.op = op;
        self
    }

    /// Turn this record into an update marker
    pub fn as_update(self) -> Self {
        self.with_operation(BucketOperation::Update)
    }

    /// Turn this record into a delete marker
    pub fn as_delete(self) -> Self {
        self.with_operation(BucketOperation::Delete)
    }

    /// Get the operation recorded in the header
    pub fn operation(&self) -> BucketOperation {
        self.meta.op
    }

    /// Check if this record marks the bucket as deleted
    pub fn is_deleted(&self) -> bool {
        self.meta.op == BucketOperation::Delete
    }

    /// Payload length: id, data-structure tag and name
    pub fn payload_size(&self) -> usize {
        PAYLOAD_FIXED_SIZE + self.name.len()
    }

    /// Total on-disk footprint: header plus payload
    pub fn entry_size(&self) -> usize {
        META_SIZE + self.payload_size()
    }

    /// Encode the record.
    ///
    /// On success `meta.size` and `meta.crc` hold exactly the values
    /// written into the returned buffer, so callers can inspect them
    /// without decoding again.
    pub fn encode(&mut self) -> Result<Bytes> {
        let payload_size = self.payload_size();
        let size =
            u32::try_from(payload_size).map_err(|_| CoreError::PayloadTooLarge(payload_size))?;

        let mut buf = BytesMut::with_capacity(META_SIZE + payload_size);
        buf.put_u32_le(0); // crc, patched below
        buf.put_u16_le(self.meta.op.as_u16());
        buf.put_u32_le(size);
        buf.put_u64_le(self.id);
        buf.put_u16_le(self.ds.as_u16());
        buf.put_slice(self.name.as_bytes());

        let crc = checksum(&buf[CRC_COVERAGE_START..]);
        buf[..CRC_SIZE].copy_from_slice(&crc.to_le_bytes());

        self.meta.size = size;
        self.meta.crc = crc;

        debug!(
            id = self.id,
            ds = %self.ds,
            op = %self.meta.op,
            size,
            crc,
            "Encoded bucket record"
        );
        Ok(buf.freeze())
    }

    /// Decode the payload into `id`, `ds` and `name`.
    ///
    /// `payload` must be exactly the `meta.size` bytes following the
    /// header; the header itself is left untouched.
    pub fn decode(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() < PAYLOAD_FIXED_SIZE {
            return Err(CoreError::truncated(
                "bucket payload",
                PAYLOAD_FIXED_SIZE,
                payload.len(),
            ));
        }

        let mut buf = payload;
        let id = buf.get_u64_le();
        let ds = DataStructure(buf.get_u16_le());
        let name = std::str::from_utf8(buf)
            .map_err(|e| CoreError::InvalidBucketName(e.to_string()))?;

        self.id = id;
        self.ds = ds;
        self.name = name.to_owned();
        Ok(())
    }

    /// Compute the record checksum from a header and payload held in
    /// separate buffers.
    ///
    /// Gives the same value `encode` embeds for the concatenated bytes.
    pub fn get_crc(header: &[u8], data: &[u8]) -> Result<u32> {
        if header.len() < META_SIZE {
            return Err(CoreError::truncated("bucket header", META_SIZE, header.len()));
        }

        let mut hasher = RecordHasher::new();
        hasher.update(&header[CRC_COVERAGE_START..]);
        hasher.update(data);
        Ok(hasher.finalize())
    }

    /// Check `meta.crc` against the bytes this record was read from
    pub fn verify(&self, header: &[u8], data: &[u8]) -> Result<()> {
        let computed = Self::get_crc(header, data)?;
        if computed != self.meta.crc {
            warn!(
                id = self.id,
                stored = self.meta.crc,
                computed,
                "Bucket record checksum mismatch"
            );
            return Err(CoreError::BucketCrcInvalid {
                stored: self.meta.crc,
                computed,
            });
        }
        Ok(())
    }

    /// Decode and verify one record from the start of `bytes`.
    ///
    /// The checksum is compared before the operation code is validated,
    /// so damage to any covered byte, the op code included, surfaces as
    /// `BucketCrcInvalid`. Bytes past the record are ignored.
    pub fn decode_entry(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        if bytes.len() < META_SIZE {
            return Err(CoreError::truncated("bucket header", META_SIZE, bytes.len()));
        }

        let mut raw = &bytes[..META_SIZE];
        let stored = raw.get_u32_le();
        raw.advance(OP_SIZE);
        let size = raw.get_u32_le() as usize;

        let name_len = size.saturating_sub(PAYLOAD_FIXED_SIZE);
        if name_len > config.max_name_len {
            return Err(CoreError::NameTooLong {
                len: name_len,
                max: config.max_name_len,
            });
        }

        let entry_size = META_SIZE + size;
        if bytes.len() < entry_size {
            return Err(CoreError::truncated("bucket record", entry_size, bytes.len()));
        }

        let (header, data) = bytes[..entry_size].split_at(META_SIZE);
        if config.verify_checksums {
            let computed = Self::get_crc(header, data)?;
            if computed != stored {
                warn!(stored, computed, size, "Bucket record checksum mismatch");
                return Err(CoreError::BucketCrcInvalid { stored, computed });
            }
        }

        let mut bucket = Self {
            meta: BucketMeta::decode(header)?,
            ..Self::default()
        };
        bucket.meta.operation()?;
        bucket.decode(data)?;

        debug!(
            id = bucket.id,
            name = %bucket.name,
            op = %bucket.meta.op,
            "Decoded bucket record"
        );
        Ok(bucket)
    }
}
