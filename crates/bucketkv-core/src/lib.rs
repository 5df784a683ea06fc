//! # bucketkv Core
//!
//! On-disk record format for buckets in the bucketkv storage engine.
//!
//! A bucket groups the key space of one data-structure engine (list,
//! set, sorted set, string). Every create, update and drop of a bucket is
//! persisted as a self-checking record. This crate provides:
//! - **Header codec**: the fixed 10-byte `BucketMeta`
//! - **Record codec**: encoding and two-phase decoding of `Bucket`
//! - **Integrity checks**: CRC-32 over everything but the checksum field
//! - **Scanning**: verified iteration over a region of records
//!
//! ## Record layout
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ crc (4) │ op (2) │ size (4)             │  BucketMeta
//! ├─────────────────────────────────────────┤
//! │ id (8) │ ds (2) │ name (size - 10)      │  payload
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bucketkv_core::{Bucket, BucketMeta, DataStructure, META_SIZE};
//!
//! let mut bucket = Bucket::new(42, DataStructure::LIST, "orders");
//! let bytes = bucket.encode()?;
//!
//! let meta = BucketMeta::decode(&bytes)?;
//! let (header, payload) = bytes[..meta.entry_size()].split_at(META_SIZE);
//! let mut decoded = Bucket { meta, ..Bucket::default() };
//! decoded.decode(payload)?;
//! decoded.verify(header, payload)?;
//! assert_eq!(decoded.name, "orders");
//! # Ok::<(), bucketkv_core::CoreError>(())
//! ```

pub mod bucket;
pub mod checksum;
pub mod config;
pub mod error;
pub mod meta;
pub mod scanner;
pub mod types;

pub use bucket::{Bucket, PAYLOAD_FIXED_SIZE};
pub use checksum::{checksum, RecordHasher};
pub use config::{CodecConfig, MAX_NAME_LEN};
pub use error::{CoreError, Result};
pub use meta::{BucketMeta, META_SIZE};
pub use scanner::{RecordScanner, ScannedRecord};
pub use types::{BucketId, BucketOperation, DataStructure};
