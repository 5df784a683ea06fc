//! Error types for the bucketkv-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while encoding or decoding bucket records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Stored checksum does not match the bytes it covers
    #[error("bucket crc invalid: stored {stored:#010x}, computed {computed:#010x}")]
    BucketCrcInvalid { stored: u32, computed: u32 },

    /// Input slice is shorter than the record layout requires
    #[error("truncated {context}: need {needed} bytes, got {available}")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    /// Operation code outside the known insert/update/delete range
    #[error("unknown bucket operation: {0}")]
    UnknownOperation(u16),

    /// Bucket name bytes are not valid UTF-8
    #[error("invalid bucket name: {0}")]
    InvalidBucketName(String),

    /// Declared name is longer than the configured limit
    #[error("bucket name too long: {len} bytes exceeds maximum {max} bytes")]
    NameTooLong { len: usize, max: usize },

    /// Payload does not fit the 32-bit size field
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
}

impl CoreError {
    pub(crate) fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        CoreError::Truncated {
            context,
            needed,
            available,
        }
    }

    /// Whether the error points at damaged bytes rather than a caller bug.
    ///
    /// Truncation counts as corruption: a short record at the end of a
    /// region is what a torn write leaves behind.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            CoreError::BucketCrcInvalid { .. }
                | CoreError::Truncated { .. }
                | CoreError::UnknownOperation(_)
                | CoreError::InvalidBucketName(_)
                | CoreError::NameTooLong { .. }
        )
    }
}
