//! Codec configuration

/// Default upper bound on a bucket name (64 KiB)
pub const MAX_NAME_LEN: usize = 64 * 1024;

/// Options applied when decoding records read back from storage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    /// Compare stored checksums against the bytes read
    pub verify_checksums: bool,
    /// Largest name a record may declare
    pub max_name_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            max_name_len: MAX_NAME_LEN,
        }
    }
}

impl CodecConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip checksum verification.
    ///
    /// Only useful for dumping damaged regions; recovery must keep
    /// verification on.
    pub fn without_verification(mut self) -> Self {
        self.verify_checksums = false;
        self
    }

    /// Set the name length limit
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }
}
