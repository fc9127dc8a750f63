// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use chrono::{TimeZone, Utc};

use crate::error::PackagerError;
use crate::spec::extra_field::{ExtraFieldAsBytes, HeaderId};
use crate::{ExtraField, ExtraFieldLocation};

#[test]
fn extended_timestamp_asymmetry() {
    let mtime = Utc.timestamp_opt(0x01020304, 0).unwrap();
    let atime = Utc.timestamp_opt(0x05060708, 0).unwrap();
    let ctime = Utc.timestamp_opt(0x090A0B0C, 0).unwrap();

    let local = ExtraField::extended_timestamp(ExtraFieldLocation::Local, Some(&mtime), Some(&atime), Some(&ctime));
    let central =
        ExtraField::extended_timestamp(ExtraFieldLocation::Central, Some(&mtime), Some(&atime), Some(&ctime));

    assert_eq!(HeaderId::EXTENDED_TIMESTAMP, local.header_id());
    assert_eq!(
        Some(&[0x07, 0x04, 0x03, 0x02, 0x01, 0x08, 0x07, 0x06, 0x05, 0x0C, 0x0B, 0x0A, 0x09][..]),
        local.data()
    );
    assert_eq!(Some(&[0x07, 0x04, 0x03, 0x02, 0x01][..]), central.data());
}

#[test]
fn extended_timestamp_without_mtime() {
    let atime = Utc.timestamp_opt(1, 0).unwrap();
    let central = ExtraField::extended_timestamp(ExtraFieldLocation::Central, None, Some(&atime), None);

    assert_eq!(Some(&[0x02][..]), central.data());
}

#[test]
fn extended_timestamp_clamps_negative_times() {
    let before_epoch = Utc.timestamp_opt(-100, 0).unwrap();
    let local = ExtraField::extended_timestamp(ExtraFieldLocation::Local, Some(&before_epoch), None, None);

    assert_eq!(Some(&[0x01, 0, 0, 0, 0][..]), local.data());
}

#[test]
fn info_zip_unix2_asymmetry() {
    let local = ExtraField::info_zip_unix2(ExtraFieldLocation::Local, 203, 0);
    let central = ExtraField::info_zip_unix2(ExtraFieldLocation::Central, 203, 0);

    assert_eq!(vec![0x55, 0x78, 0x04, 0x00, 0xCB, 0x00, 0x00, 0x00], local.as_bytes());
    assert_eq!(vec![0x55, 0x78, 0x00, 0x00], central.as_bytes());
}

#[test]
fn extra_fields_concatenate_in_order() {
    let fields = [
        ExtraField::new(0x0001u16, None).unwrap(),
        ExtraField::new(0xABCDu16, Some(vec![1, 2, 3])).unwrap(),
    ];
    let slice: &[ExtraField] = &fields;

    assert_eq!(11, slice.count_bytes());
    assert_eq!(vec![0x01, 0x00, 0x00, 0x00, 0xCD, 0xAB, 0x03, 0x00, 1, 2, 3], slice.as_bytes());
}

#[test]
fn extra_field_too_large() {
    let result = ExtraField::new(0x1234u16, Some(vec![0; u16::MAX as usize + 1]));
    assert!(matches!(result, Err(PackagerError::ExtraFieldTooLarge)));
}
