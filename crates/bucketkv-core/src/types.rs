//! Value types carried inside a bucket record

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity assigned to a bucket when it is created.
///
/// Re-creating a bucket under the same name yields a new id, which is
/// how a delete followed by a create is told apart on replay.
pub type BucketId = u64;

/// Size of a serialized bucket id in bytes
pub const ID_SIZE: usize = std::mem::size_of::<BucketId>();

/// Size of a serialized data-structure tag in bytes
pub const DS_SIZE: usize = std::mem::size_of::<u16>();

/// Tag naming the data-structure engine that owns a bucket's keys.
///
/// The codec treats the tag as an opaque 16-bit value; unknown tags
/// round-trip unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataStructure(pub u16);

impl DataStructure {
    pub const LIST: Self = Self(1);
    pub const SET: Self = Self(2);
    pub const SORTED_SET: Self = Self(3);
    pub const STRING: Self = Self(4);

    /// Get the raw tag
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Get a label for well-known tags
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::LIST => Some("list"),
            Self::SET => Some("set"),
            Self::SORTED_SET => Some("sorted_set"),
            Self::STRING => Some("string"),
            _ => None,
        }
    }
}

impl From<u16> for DataStructure {
    fn from(tag: u16) -> Self {
        Self(tag)
    }
}

impl From<DataStructure> for u16 {
    fn from(ds: DataStructure) -> Self {
        ds.0
    }
}

impl fmt::Display for DataStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown({})", self.0),
        }
    }
}

/// Last lifecycle operation recorded for a bucket.
///
/// Codes outside insert/update/delete decode to `Unknown` so a header
/// can always be read and its checksum compared; whether an unknown code
/// is acceptable is decided afterwards with `ensure_known`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BucketOperation {
    /// Bucket was created
    #[default]
    Insert,
    /// Bucket attributes were rewritten
    Update,
    /// Bucket was dropped
    Delete,
    /// Code not known to this version of the format
    Unknown(u16),
}

impl BucketOperation {
    /// Get the on-disk operation code
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Insert => 1,
            Self::Update => 2,
            Self::Delete => 3,
            Self::Unknown(code) => code,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Check if the code is one of insert, update or delete
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Reject codes this version of the format does not understand
    pub fn ensure_known(self) -> Result<Self> {
        match self {
            Self::Unknown(code) => Err(CoreError::UnknownOperation(code)),
            known => Ok(known),
        }
    }
}

impl From<u16> for BucketOperation {
    fn from(code: u16) -> Self {
        match code {
            1 => Self::Insert,
            2 => Self::Update,
            3 => Self::Delete,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for BucketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown({})", code),
            known => f.write_str(known.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, BucketOperation::Insert)]
    #[case(2, BucketOperation::Update)]
    #[case(3, BucketOperation::Delete)]
    fn test_operation_codes(#[case] code: u16, #[case] op: BucketOperation) {
        assert_eq!(BucketOperation::from(code), op);
        assert_eq!(op.as_u16(), code);
        assert_eq!(op.ensure_known(), Ok(op));
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(u16::MAX)]
    fn test_unknown_operation_code(#[case] code: u16) {
        let op = BucketOperation::from(code);
        assert_eq!(op, BucketOperation::Unknown(code));
        assert_eq!(op.as_u16(), code);
        assert!(!op.is_known());
        assert_eq!(op.ensure_known(), Err(CoreError::UnknownOperation(code)));
        assert_eq!(op.to_string(), format!("unknown({})", code));
    }

    #[test]
    fn test_data_structure_labels() {
        assert_eq!(DataStructure::LIST.to_string(), "list");
        assert_eq!(DataStructure::SORTED_SET.name(), Some("sorted_set"));
        assert_eq!(DataStructure(77).to_string(), "unknown(77)");
        assert_eq!(u16::from(DataStructure::from(9)), 9);
    }

    #[test]
    fn test_serde_representation() {
        assert_eq!(serde_json::to_string(&DataStructure::SET).unwrap(), "2");
        assert_eq!(
            serde_json::to_string(&BucketOperation::Delete).unwrap(),
            "\"delete\""
        );
        let op: BucketOperation = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(op, BucketOperation::Update);
        assert_eq!(
            serde_json::to_string(&BucketOperation::Unknown(7)).unwrap(),
            "{\"unknown\":7}"
        );
    }

    #[test]
    fn test_field_widths() {
        assert_eq!(ID_SIZE, 8);
        assert_eq!(DS_SIZE, 2);
    }
}
