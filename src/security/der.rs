// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A minimal DER encoder and reader, covering only the types a timestamp request and response need.

use crate::error::{PackagerError, Result};

pub(crate) const TAG_BOOLEAN: u8 = 0x01;
pub(crate) const TAG_INTEGER: u8 = 0x02;
pub(crate) const TAG_BIT_STRING: u8 = 0x03;
pub(crate) const TAG_OCTET_STRING: u8 = 0x04;
pub(crate) const TAG_NULL: u8 = 0x05;
pub(crate) const TAG_OID: u8 = 0x06;
pub(crate) const TAG_UTF8_STRING: u8 = 0x0C;
pub(crate) const TAG_SEQUENCE: u8 = 0x30;

/// A single decoded type-length-value element, borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
    /// The whole element, header included.
    pub raw: &'a [u8],
}

pub(crate) fn der_len(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|byte| **byte == 0).count();

    let mut out = vec![0x80 | (bytes.len() - skip) as u8];
    out.extend_from_slice(&bytes[skip..]);
    out
}

pub(crate) fn der_wrap(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_len(value.len()));
    out.extend_from_slice(value);
    out
}

pub(crate) fn der_sequence(parts: &[Vec<u8>]) -> Vec<u8> {
    der_wrap(TAG_SEQUENCE, &parts.concat())
}

pub(crate) fn der_null() -> Vec<u8> {
    vec![TAG_NULL, 0x00]
}

pub(crate) fn der_boolean(v: bool) -> Vec<u8> {
    vec![TAG_BOOLEAN, 0x01, if v { 0xff } else { 0x00 }]
}

pub(crate) fn der_integer_u64(v: u64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let skip = bytes.iter().take_while(|byte| **byte == 0).count().min(bytes.len() - 1);

    let mut value = bytes[skip..].to_vec();
    if value[0] & 0x80 != 0 {
        value.insert(0, 0);
    }
    der_wrap(TAG_INTEGER, &value)
}

pub(crate) fn der_octet_string(bytes: &[u8]) -> Vec<u8> {
    der_wrap(TAG_OCTET_STRING, bytes)
}

pub(crate) fn der_oid(oid: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    if let [first, second, rest @ ..] = oid {
        out.push((first * 40 + second) as u8);
        for &arc in rest {
            let mut encoded = vec![(arc & 0x7f) as u8];
            let mut n = arc >> 7;
            while n > 0 {
                encoded.push(0x80 | (n & 0x7f) as u8);
                n >>= 7;
            }
            encoded.reverse();
            out.extend(encoded);
        }
    }
    der_wrap(TAG_OID, &out)
}

/// Reads the element starting at the beginning of the input.
pub(crate) fn der_read_tlv(input: &[u8]) -> Result<Tlv<'_>> {
    let [tag, first_len, rest @ ..] = input else {
        return Err(PackagerError::TimestampDecode("truncated element header"));
    };

    let (len, header) = if first_len & 0x80 == 0 {
        (*first_len as usize, 2)
    } else {
        let n = (first_len & 0x7f) as usize;
        if n == 0 || n > 4 || rest.len() < n {
            return Err(PackagerError::TimestampDecode("unsupported element length"));
        }
        let len = rest[..n].iter().fold(0usize, |len, byte| (len << 8) | *byte as usize);
        (len, 2 + n)
    };

    let end = header.checked_add(len).filter(|end| *end <= input.len());
    let Some(end) = end else {
        return Err(PackagerError::TimestampDecode("element overruns its container"));
    };

    Ok(Tlv { tag: *tag, value: &input[header..end], raw: &input[..end] })
}

/// Reads every element contained within a constructed value.
pub(crate) fn der_children(mut value: &[u8]) -> Result<Vec<Tlv<'_>>> {
    let mut children = Vec::new();
    while !value.is_empty() {
        let child = der_read_tlv(value)?;
        value = &value[child.raw.len()..];
        children.push(child);
    }
    Ok(children)
}
