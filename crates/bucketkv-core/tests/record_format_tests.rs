//! Integration tests for the bucket record format
//!
//! These tests drive the public API the way the storage engine does:
//! encode, persist, read header, read payload, verify.

use bucketkv_core::{
    checksum, Bucket, BucketMeta, BucketOperation, CodecConfig, CoreError, DataStructure,
    RecordScanner, META_SIZE,
};
use proptest::prelude::*;

/// Read a record back in two passes, as from a file: header first, then
/// exactly `meta.size` payload bytes.
fn read_two_pass(bytes: &[u8]) -> Result<Bucket, CoreError> {
    let header = &bytes[..META_SIZE];
    let meta = BucketMeta::decode(header)?;
    let payload = &bytes[META_SIZE..meta.entry_size()];

    let mut bucket = Bucket {
        meta,
        ..Bucket::default()
    };
    bucket.decode(payload)?;
    bucket.verify(header, payload)?;
    Ok(bucket)
}

fn operation() -> impl Strategy<Value = BucketOperation> {
    prop_oneof![
        Just(BucketOperation::Insert),
        Just(BucketOperation::Update),
        Just(BucketOperation::Delete),
    ]
}

prop_compose! {
    fn bucket()(
        id in any::<u64>(),
        ds in any::<u16>(),
        name in "\\PC{0,48}",
        op in operation(),
    ) -> Bucket {
        Bucket::new(id, DataStructure(ds), name).with_operation(op)
    }
}

proptest! {
    #[test]
    fn prop_two_pass_roundtrip(mut original in bucket()) {
        let encoded = original.encode().unwrap();
        prop_assert_eq!(encoded.len(), original.entry_size());

        let decoded = read_two_pass(&encoded).unwrap();
        prop_assert_eq!(decoded.id, original.id);
        prop_assert_eq!(decoded.ds, original.ds);
        prop_assert_eq!(&decoded.name, &original.name);
        prop_assert_eq!(decoded.meta, original.meta);
    }

    #[test]
    fn prop_sizes_consistent(original in bucket()) {
        prop_assert_eq!(original.payload_size(), 10 + original.name.len());
        prop_assert_eq!(original.entry_size(), META_SIZE + original.payload_size());
    }

    #[test]
    fn prop_split_crc_matches_embedded(mut original in bucket(), split in 0usize..64) {
        let encoded = original.encode().unwrap();
        let (header, payload) = encoded.split_at(META_SIZE);
        prop_assert_eq!(Bucket::get_crc(header, payload).unwrap(), original.meta.crc);
        prop_assert_eq!(checksum(&encoded[4..]), original.meta.crc);

        // Any split of the covered bytes gives the same checksum.
        let split = split.min(payload.len());
        let mut joined = header.to_vec();
        joined.extend_from_slice(&payload[..split]);
        prop_assert_eq!(Bucket::get_crc(&joined, &payload[split..]).unwrap(), original.meta.crc);
    }

    #[test]
    fn prop_any_bit_flip_detected(mut original in bucket(), index in any::<prop::sample::Index>(), bit in 0u8..8) {
        let encoded = original.encode().unwrap();
        let mut damaged = encoded.to_vec();
        let position = 4 + index.index(damaged.len() - 4);
        damaged[position] ^= 1 << bit;

        let result = Bucket::decode_entry(&damaged, &CodecConfig::default());
        prop_assert!(result.is_err(), "flip at byte {} bit {} went unnoticed", position, bit);

        // The checksum over the damaged bytes always moves away from the
        // stored value, whatever the size field now says.
        prop_assert_ne!(checksum(&damaged[4..]), original.meta.crc);
    }

    #[test]
    fn prop_header_bit_flip_caught_by_verify(mut original in bucket(), byte in 4usize..META_SIZE, bit in 0u8..8) {
        let encoded = original.encode().unwrap();
        let (header, payload) = encoded.split_at(META_SIZE);
        let mut damaged = header.to_vec();
        damaged[byte] ^= 1 << bit;

        // Header decoding never fails on a damaged op code or size, so the
        // stored checksum is always available for comparison.
        let meta = BucketMeta::decode(&damaged).unwrap();
        prop_assert_eq!(meta.crc, original.meta.crc);

        let mut decoded = Bucket { meta, ..Bucket::default() };
        decoded.decode(payload).unwrap();
        let result = decoded.verify(&damaged, payload);
        prop_assert!(
            matches!(result, Err(CoreError::BucketCrcInvalid { .. })),
            "flip at byte {} bit {} gave {:?}", byte, bit, result
        );
    }
}

#[test]
fn test_orders_scenario() {
    let mut bucket = Bucket::new(42, DataStructure::LIST, "orders");
    let encoded = bucket.encode().unwrap();
    assert_eq!(encoded.len(), 10 + 8 + 2 + 6);

    let meta = BucketMeta::decode(&encoded).unwrap();
    assert_eq!(meta.op, BucketOperation::Insert);
    assert_eq!(meta.op.as_u16(), 1);
    assert_eq!(meta.size, 16);

    let decoded = read_two_pass(&encoded).unwrap();
    assert_eq!(decoded.id, 42);
    assert_eq!(decoded.ds, DataStructure::LIST);
    assert_eq!(decoded.name, "orders");
}

#[test]
fn test_delete_then_recreate_replay() {
    let mut log = Vec::new();
    for mut record in [
        Bucket::new(7, DataStructure::LIST, "orders"),
        Bucket::new(7, DataStructure::LIST, "orders").as_delete(),
        Bucket::new(8, DataStructure::LIST, "orders"),
    ] {
        log.extend_from_slice(&record.encode().unwrap());
    }

    let records = RecordScanner::new(&log, CodecConfig::default())
        .collect_all()
        .unwrap();
    let replay: Vec<(u64, BucketOperation)> = records
        .iter()
        .map(|r| (r.bucket.id, r.bucket.operation()))
        .collect();

    assert_eq!(
        replay,
        vec![
            (7, BucketOperation::Insert),
            (7, BucketOperation::Delete),
            (8, BucketOperation::Insert),
        ]
    );
}

#[test]
fn test_decoded_record_as_json() {
    let mut bucket = Bucket::new(3, DataStructure::STRING, "sessions").as_update();
    let encoded = bucket.encode().unwrap();
    let decoded = Bucket::decode_entry(&encoded, &CodecConfig::default()).unwrap();

    let json = serde_json::to_value(&decoded).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["ds"], 4);
    assert_eq!(json["name"], "sessions");
    assert_eq!(json["meta"]["op"], "update");
    assert_eq!(json["meta"]["size"], 18);

    let back: Bucket = serde_json::from_value(json).unwrap();
    assert_eq!(back, decoded);
}
