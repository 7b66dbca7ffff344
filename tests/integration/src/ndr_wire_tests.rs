//! NDR Wire Tests - Transfer Syntax Layout
//!
//! These tests pin the byte layout of encoded values:
//! - Natural alignment of primitives
//! - Unique pointer referents and deferred pointees
//! - Conformant and varying arrays, including padding to the declared size
//! - Strings and encapsulated unions
//! - Rejection of malformed input before allocation

mod common;

use common::*;
use csvp::DiskId;
use midl_ndr::{
    decode_from_bytes, encode_to_bytes, ndr_struct, Bytes, ConformantArray,
    ConformantVaryingArray, NdrContext, NdrError, NdrPtr, NdrWString, UniquePtr, FIRST_REFERENT,
};

ndr_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Record align(4) {
        flag: u8,
        first: UniquePtr<u32>,
        second: UniquePtr<NdrWString>,
        tail: u16,
    }
}

fn encode<T: midl_ndr::NdrEncode>(value: &T) -> Bytes {
    encode_to_bytes(value, NdrContext::new()).unwrap()
}

#[test]
fn test_u32_layout() {
    init_logging();

    let bytes = encode(&512u32);
    assert_eq!(bytes.as_ref(), &[0x00, 0x02, 0x00, 0x00]);
    let value: u32 = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert_eq!(value, 512);

    let big = encode_to_bytes(&512u32, NdrContext::big_endian()).unwrap();
    assert_eq!(big.as_ref(), &[0x00, 0x00, 0x02, 0x00]);
}

#[test]
fn test_null_unique_pointer() {
    init_logging();

    let bytes = encode(&UniquePtr::<u32>::null());
    assert_eq!(bytes.as_ref(), &[0, 0, 0, 0]);

    let present = encode(&UniquePtr::new(7u32));
    assert_eq!(&present[..4], &FIRST_REFERENT.to_le_bytes());
    assert_eq!(&present[4..], &7u32.to_le_bytes());

    let decoded: UniquePtr<u32> = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert!(decoded.is_null());
}

#[test]
fn test_conformant_array_padded_to_declared_size() {
    init_logging();

    let array = ConformantArray::with_max(512, vec![1u8, 2]);
    let bytes = encode(&array);
    assert_eq!(bytes.len(), 4 + 512);
    assert_eq!(&bytes[..4], &512u32.to_le_bytes());
    assert_eq!(&bytes[4..6], &[1, 2]);
    assert!(bytes[6..].iter().all(|b| *b == 0));

    let decoded: ConformantArray<u8> = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert_eq!(decoded.len(), 512);
}

#[test]
fn test_conformant_varying_bounds() {
    init_logging();

    let array = ConformantVaryingArray::with_bounds(512, 3, vec![9u8, 8, 7]);
    let bytes = encode(&array);
    assert_eq!(&bytes[..12], &[0, 2, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0]);
    assert_eq!(&bytes[12..], &[9, 8, 7]);

    let decoded: ConformantVaryingArray<u8> = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert_eq!(decoded.elements, vec![9, 8, 7]);
    assert_eq!(decoded.max_count, 512);
}

#[test]
fn test_pointees_follow_inline_fields() {
    init_logging();

    let record = Record {
        flag: 1,
        first: UniquePtr::new(0xAABBCCDD),
        second: UniquePtr::new(NdrWString::from("ab")),
        tail: 0x0102,
    };
    let bytes = encode(&record);

    // flag, pad, two referents, tail, pad
    assert_eq!(bytes[0], 1);
    assert_eq!(&bytes[4..8], &FIRST_REFERENT.to_le_bytes());
    assert_eq!(&bytes[12..14], &[0x02, 0x01]);
    // first pointee, then the string header and its three units
    assert_eq!(&bytes[16..20], &0xAABBCCDDu32.to_le_bytes());
    assert_eq!(&bytes[20..32], &[3, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0]);
    assert_eq!(&bytes[32..], &[b'a', 0, b'b', 0, 0, 0]);

    let decoded: Record = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_deferred_order_with_mixed_nullness() {
    init_logging();

    let patterns = [
        (UniquePtr::null(), UniquePtr::new(NdrWString::from("x"))),
        (UniquePtr::new(9), UniquePtr::null()),
    ];
    for (first, second) in patterns {
        let record = Record {
            first,
            second,
            ..Record::default()
        };
        let bytes = encode(&record);
        let decoded: Record = decode_from_bytes(bytes, NdrContext::new()).unwrap();
        assert_eq!(decoded, record);
    }

    // null first pointer: the only payload on the wire is the string
    let record = Record {
        second: UniquePtr::new(NdrWString::from("x")),
        ..Record::default()
    };
    let bytes = encode(&record);
    assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
    assert_eq!(&bytes[16..], &[2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, b'x', 0, 0, 0]);
}

#[test]
fn test_ndr64_sizes_are_eight_bytes() {
    init_logging();

    let ctx = NdrContext::ndr64();
    let bytes = encode_to_bytes(&ConformantArray::new(vec![5u16]), ctx).unwrap();
    assert_eq!(&bytes[..8], &1u64.to_le_bytes());
    assert_eq!(&bytes[8..], &[5, 0]);

    let pointer = encode_to_bytes(&UniquePtr::<u8>::null(), ctx).unwrap();
    assert_eq!(pointer.as_ref(), &[0; 8]);
}

#[test]
fn test_union_arm_selected_by_tag() {
    init_logging();

    let bytes = encode(&DiskId::DeviceNumber(3));
    assert_eq!(&bytes[..4], &[0xa0, 0x0f, 0xa0, 0x0f]);
    assert_eq!(&bytes[4..], &3u32.to_le_bytes());

    let decoded: DiskId = decode_from_bytes(bytes, NdrContext::new()).unwrap();
    assert_eq!(decoded, DiskId::DeviceNumber(3));
}

#[test]
fn test_overflowing_count_rejected() {
    init_logging();

    let bytes = Bytes::from_static(&[0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4]);
    let err = decode_from_bytes::<ConformantArray<u32>>(bytes, NdrContext::new()).unwrap_err();
    assert!(matches!(err, NdrError::BufferOverflow { declared: 0xffff_ffff, .. }));
}

#[test]
fn test_truncated_input_rejected() {
    init_logging();

    let err = decode_from_bytes::<u64>(Bytes::from_static(&[1, 2, 3]), NdrContext::new()).unwrap_err();
    assert!(matches!(err, NdrError::ShortBuffer { needed: 8, have: 3 }));
}
