//! Sequential reader for a region of back-to-back bucket records
//!
//! The storage engine hands over the bytes of a bucket log it has
//! already read; the scanner splits them into verified records. It
//! stops at the first record it cannot trust, since the length of a
//! damaged record (and therefore the position of the next one) is
//! unknown. `position()` tells the engine where the valid prefix ends.

use crate::{bucket::Bucket, config::CodecConfig, CoreError, Result};
use tracing::{instrument, warn};

/// A record recovered from a region, with its offset in that region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedRecord {
    /// Offset of the record's first header byte
    pub offset: usize,
    /// The decoded bucket
    pub bucket: Bucket,
}

/// Iterator over the records stored in a byte region
#[derive(Debug)]
pub struct RecordScanner<'a> {
    region: &'a [u8],
    position: usize,
    config: CodecConfig,
    done: bool,
}

impl<'a> RecordScanner<'a> {
    /// Create a scanner over `region`
    #[instrument(skip(region), fields(region_len = region.len()))]
    pub fn new(region: &'a [u8], config: CodecConfig) -> Self {
        Self {
            region,
            position: 0,
            config,
            done: false,
        }
    }

    /// Bytes consumed by the records yielded so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.region.len() - self.position
    }

    /// Collect every record, failing on the first bad one
    pub fn collect_all(self) -> Result<Vec<ScannedRecord>> {
        self.collect()
    }
}

impl Iterator for RecordScanner<'_> {
    type Item = Result<ScannedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.position == self.region.len() {
            return None;
        }

        let offset = self.position;
        match Bucket::decode_entry(&self.region[offset..], &self.config) {
            Ok(bucket) => {
                self.position += bucket.meta.entry_size();
                Some(Ok(ScannedRecord { offset, bucket }))
            }
            Err(err) => {
                self.done = true;
                if matches!(err, CoreError::Truncated { .. }) {
                    warn!(offset, remaining = self.remaining(), "Torn bucket record at end of region");
                } else {
                    warn!(offset, error = %err, "Unreadable bucket record, stopping scan");
                }
                Some(Err(err))
            }
        }
    }
}
