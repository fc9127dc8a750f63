// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::PackagerError;
use crate::hasher::{DigestAlgorithm, Hasher};
use crate::security::der::{
    der_children, der_integer_u64, der_len, der_octet_string, der_oid, der_read_tlv, der_sequence, der_wrap,
    TAG_BIT_STRING, TAG_INTEGER, TAG_SEQUENCE, TAG_UTF8_STRING,
};
use crate::security::timestamper::{decode_response, encode_request};

fn status(code: u8) -> Vec<u8> {
    der_sequence(&[der_wrap(TAG_INTEGER, &[code])])
}

#[test]
fn der_lengths() {
    assert_eq!(vec![0x7F], der_len(0x7F));
    assert_eq!(vec![0x81, 0xC8], der_len(200));
    assert_eq!(vec![0x82, 0x12, 0x34], der_len(0x1234));
}

#[test]
fn der_integers() {
    assert_eq!(vec![0x02, 0x01, 0x00], der_integer_u64(0));
    assert_eq!(vec![0x02, 0x01, 0x01], der_integer_u64(1));
    assert_eq!(vec![0x02, 0x02, 0x00, 0x80], der_integer_u64(0x80));
    assert_eq!(vec![0x02, 0x02, 0x01, 0x00], der_integer_u64(0x100));
}

#[test]
fn der_oids() {
    assert_eq!(vec![0x06, 0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A], der_oid(DigestAlgorithm::Sha1.oid()));
    assert_eq!(
        vec![0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01],
        der_oid(DigestAlgorithm::Sha256.oid())
    );
}

#[test]
fn der_reads_nested_elements() {
    let encoded = der_sequence(&[der_integer_u64(5), der_octet_string(&[0xAA; 200])]);
    let root = der_read_tlv(&encoded).expect("failed to read root");

    assert_eq!(TAG_SEQUENCE, root.tag);
    assert_eq!(encoded.len(), root.raw.len());

    let children = der_children(root.value).expect("failed to read children");
    assert_eq!(2, children.len());
    assert_eq!(&[0x05][..], children[0].value);
    assert_eq!(200, children[1].value.len());
}

#[test]
fn der_rejects_overrun() {
    let result = der_read_tlv(&[0x30, 0x05, 0x00]);
    assert!(matches!(result, Err(PackagerError::TimestampDecode(_))));
}

#[test]
fn timestamp_request_sha1() {
    let digest = [0x11u8; 20];
    let request = encode_request(&digest, DigestAlgorithm::Sha1);

    let mut expected = vec![
        0x30, 0x29, 0x02, 0x01, 0x01, 0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2B, 0x0E, 0x03, 0x02, 0x1A, 0x05, 0x00,
        0x04, 0x14,
    ];
    expected.extend_from_slice(&digest);
    expected.extend_from_slice(&[0x01, 0x01, 0xFF]);

    assert_eq!(expected, request);
}

#[test]
fn timestamp_request_sha256() {
    let digest = Hasher::digest_once(DigestAlgorithm::Sha256, b"foo");
    let request = encode_request(&digest, DigestAlgorithm::Sha256);

    let root = der_read_tlv(&request).expect("failed to read request");
    let children = der_children(root.value).expect("failed to read request fields");
    let imprint = der_children(children[1].value).expect("failed to read message imprint");

    assert_eq!(3, children.len());
    assert_eq!(&digest[..], imprint[1].value);
}

#[test]
fn timestamp_response_granted() {
    let token = der_sequence(&[der_integer_u64(42)]);
    let response = der_sequence(&[status(0), token.clone()]);

    assert_eq!(token, decode_response(&response).expect("failed to decode response"));
}

#[test]
fn timestamp_response_granted_with_mods() {
    let token = der_sequence(&[der_integer_u64(42)]);
    let response = der_sequence(&[status(1), token.clone()]);

    assert_eq!(token, decode_response(&response).expect("failed to decode response"));
}

#[test]
fn timestamp_response_rejection() {
    let response = der_sequence(&[status(2), der_sequence(&[der_integer_u64(42)])]);
    assert!(matches!(decode_response(&response), Err(PackagerError::UnexpectedPkiStatus(2))));
}

#[test]
fn timestamp_response_missing_tst_info() {
    let response = der_sequence(&[status(0)]);
    assert!(matches!(decode_response(&response), Err(PackagerError::MissingTstInfo)));
}

#[test]
fn timestamp_response_missing_status() {
    let response = der_sequence(&[der_sequence(&[])]);
    assert!(matches!(decode_response(&response), Err(PackagerError::MissingPkiStatus)));
}

#[test]
fn timestamp_response_long_status() {
    let response = der_sequence(&[der_sequence(&[der_wrap(TAG_INTEGER, &[0, 0])])]);
    assert!(matches!(decode_response(&response), Err(PackagerError::UnexpectedPkiStatusLength(2))));
}

#[test]
fn timestamp_response_not_sequence() {
    let response = der_octet_string(b"nope");
    assert!(matches!(decode_response(&response), Err(PackagerError::TimestampDecode(_))));
}

#[test]
fn timestamp_response_trailing_bytes() {
    let mut response = der_sequence(&[status(0), der_sequence(&[der_integer_u64(42)])]);
    response.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    assert!(matches!(decode_response(&response), Err(PackagerError::TimestampDecode(_))));
}

#[test]
fn timestamp_response_status_members() {
    let token = der_sequence(&[der_integer_u64(42)]);
    let status_info = der_sequence(&[
        der_wrap(TAG_INTEGER, &[1]),
        der_wrap(TAG_UTF8_STRING, b"granted"),
        der_wrap(TAG_BIT_STRING, &[0x00]),
    ]);
    let response = der_sequence(&[status_info, token.clone()]);

    assert_eq!(token, decode_response(&response).expect("failed to decode response"));
}

#[test]
fn timestamp_response_mistyped_status_members() {
    let token = der_sequence(&[der_integer_u64(42)]);

    let free_text = der_sequence(&[der_wrap(TAG_INTEGER, &[0]), der_octet_string(b"granted")]);
    let response = der_sequence(&[free_text, token.clone()]);
    assert!(matches!(decode_response(&response), Err(PackagerError::TimestampDecode(_))));

    let out_of_order = der_sequence(&[
        der_wrap(TAG_INTEGER, &[0]),
        der_wrap(TAG_BIT_STRING, &[0x00]),
        der_wrap(TAG_UTF8_STRING, b"granted"),
    ]);
    let response = der_sequence(&[out_of_order, token]);
    assert!(matches!(decode_response(&response), Err(PackagerError::TimestampDecode(_))));
}

#[test]
fn timestamp_response_free_text_without_status() {
    let status_info = der_sequence(&[der_wrap(TAG_UTF8_STRING, b"rejected")]);
    let response = der_sequence(&[status_info, der_sequence(&[der_integer_u64(42)])]);

    assert!(matches!(decode_response(&response), Err(PackagerError::MissingPkiStatus)));
}

#[test]
fn hasher_resets_after_digest() {
    let mut hasher = Hasher::new(DigestAlgorithm::Sha1);
    assert_eq!(20, hasher.bytes());

    hasher.update(b"foo");
    let first = hasher.digest();
    hasher.update(b"foo");
    let second = hasher.digest();

    assert_eq!(first, second);
    assert_eq!(Hasher::digest_once(DigestAlgorithm::Sha1, b"foo"), first);
}
