// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub(crate) mod offset;

use chrono::{TimeZone, Utc};
use futures_lite::io::Cursor;

use crate::error::PackagerError;
use crate::write::{patch_local_entry, Zipper};
use crate::{CompressMode, Compression, ExtraField, ZipDateTime, ZipperEntryBuilder};

#[rustfmt::skip]
const GOLDEN: &[u8] = &[
    // a
    0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x76, 0x0A,
    0xE3, 0xF6, 0x0C, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61,
    // b
    0x50, 0x4B, 0x03, 0x04, 0x12, 0x34, 0xBC, 0x9A, 0x08, 0x00, 0x5C, 0x64, 0x99, 0x4F, 0xF9, 0xEF,
    0xBE, 0x71, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x09, 0x00, 0x11, 0x00,
    0x62, 0x2F, 0x62, 0x2F, 0x62, 0x2E, 0x74, 0x78, 0x74,
    0x55, 0x54, 0x05, 0x00, 0x01, 0x70, 0x57, 0x03, 0x5E,
    0x55, 0x78, 0x04, 0x00, 0xD2, 0x04, 0x2E, 0x16,
    0x4B, 0x02, 0x00,
    // c
    0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xE7, 0x2E,
    0xB0, 0xFF, 0x0C, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x09, 0x00, 0x1A, 0x00,
    0x63, 0x2F, 0x63, 0x2F, 0x63, 0x2E, 0x74, 0x78, 0x74,
    0x55, 0x54, 0x01, 0x00, 0x00,
    0x55, 0x78, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0x05, 0x00, 0x6C, 0x6F, 0x63, 0x61, 0x6C,
    0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63, 0x63,
    // central a
    0x50, 0x4B, 0x01, 0x02, 0x14, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x76, 0x0A, 0xE3, 0xF6, 0x0C, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // central b
    0x50, 0x4B, 0x01, 0x02, 0x56, 0x78, 0x12, 0x34, 0xBC, 0x9A, 0x08, 0x00, 0x5C, 0x64, 0x99, 0x4F,
    0xF9, 0xEF, 0xBE, 0x71, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x09, 0x00, 0x0D, 0x00,
    0x09, 0x00, 0x00, 0x00, 0xCD, 0xAB, 0x98, 0xBA, 0xCD, 0xFE, 0x2A, 0x00, 0x00, 0x00,
    0x62, 0x2F, 0x62, 0x2F, 0x62, 0x2E, 0x74, 0x78, 0x74,
    0x55, 0x54, 0x05, 0x00, 0x01, 0x70, 0x57, 0x03, 0x5E,
    0x55, 0x78, 0x00, 0x00,
    0x63, 0x6F, 0x6D, 0x6D, 0x65, 0x6E, 0x74, 0x20, 0x62,
    // central c
    0x50, 0x4B, 0x01, 0x02, 0x14, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xE7, 0x2E, 0xB0, 0xFF, 0x0C, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x09, 0x00, 0x18, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x65, 0x00, 0x00, 0x00,
    0x63, 0x2F, 0x63, 0x2F, 0x63, 0x2E, 0x74, 0x78, 0x74,
    0x55, 0x54, 0x01, 0x00, 0x00,
    0x55, 0x78, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0x07, 0x00, 0x63, 0x65, 0x6E, 0x74, 0x72, 0x61, 0x6C,
    // end of central directory
    0x50, 0x4B, 0x05, 0x06, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0x03, 0x00, 0xCA, 0x00, 0x00, 0x00,
    0xB2, 0x00, 0x00, 0x00, 0x0F, 0x00,
    0x61, 0x72, 0x63, 0x68, 0x69, 0x76, 0x65, 0x20, 0x63, 0x6F, 0x6D, 0x6D, 0x65, 0x6E, 0x74,
];

#[tokio::test]
async fn golden_stream() {
    let mut zipper = Zipper::new(Vec::<u8>::new());
    zipper.comment("archive comment");

    let mut entry = ZipperEntryBuilder::new("").build();
    let data = entry.init_data(Some(&[b'a'; 12][..]), CompressMode::Store).await.expect("failed to init data");
    zipper.add_entry(entry, data.as_deref()).await.expect("failed to write entry");

    let mtime = Utc.timestamp_opt(1577277296, 0).unwrap();
    let mut entry = ZipperEntryBuilder::new("b/b/b.txt")
        .comment("comment b")
        .last_modification_date(ZipDateTime::from_raw(0x4F99, 0x645C))
        .extract_version(0x12)
        .extract_host_os(0x34)
        .create_version(0x56)
        .create_host_os(0x78)
        .flags(0x9abc)
        .internal_attributes(0xabcd)
        .external_attributes(0xfecdba98)
        .extended_timestamp(Some(&mtime), None, None)
        .info_zip_unix2(1234, 5678)
        .build();
    let data = entry.init_data(Some(&b"b"[..]), CompressMode::Deflate).await.expect("failed to init data");
    zipper.add_entry(entry, data.as_deref()).await.expect("failed to write entry");

    let mut entry = ZipperEntryBuilder::new("c/c/c.txt")
        .extended_timestamp(None, None, None)
        .info_zip_unix2(0, 0)
        .extra_field_local(ExtraField::new(0u16, None).unwrap())
        .extra_field_central(ExtraField::new(0u16, None).unwrap())
        .extra_field_local(ExtraField::new(0xffffu16, Some(b"local".to_vec())).unwrap())
        .extra_field_central(ExtraField::new(0xffffu16, Some(b"central".to_vec())).unwrap())
        .build();
    let data = entry.init_data(Some(&[b'c'; 12][..]), CompressMode::Store).await.expect("failed to init data");
    zipper.add_entry(entry, data.as_deref()).await.expect("failed to write entry");

    let offsets: Vec<u32> = zipper.entries().iter().map(|entry| entry.header_offset_local()).collect();
    assert_eq!(vec![0, 42, 101], offsets);

    let written = zipper.close().await.expect("failed to close writer");
    assert_eq!(GOLDEN.len(), written.len());
    assert_eq!(GOLDEN, &written[..]);
}

#[tokio::test]
async fn empty_archive() {
    let zipper = Zipper::new(Vec::<u8>::new());
    let written = zipper.close().await.expect("failed to close writer");

    assert_eq!(vec![0x50, 0x4B, 0x05, 0x06, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], written);
}

#[tokio::test]
async fn init_data_auto_deflates_compressible_data() {
    let data = "Lorem ipsum dolor sit amet. ".repeat(64);
    let mut entry = ZipperEntryBuilder::new("lorem.txt").build();
    let stored = entry.init_data(Some(data.as_bytes()), CompressMode::Auto).await.expect("failed to init data");
    let stored = stored.expect("expected data");

    assert_eq!(Compression::Deflate, entry.compression());
    assert!(stored.len() < data.len());
    assert_eq!(stored.len() as u32, entry.compressed_size());
    assert_eq!(data.len() as u32, entry.uncompressed_size());
    assert_eq!(crc32fast::hash(data.as_bytes()), entry.crc32());
}

#[tokio::test]
async fn init_data_auto_stores_incompressible_data() {
    let mut entry = ZipperEntryBuilder::new("b.txt").build();
    let stored = entry.init_data(Some(&b"b"[..]), CompressMode::Auto).await.expect("failed to init data");

    assert_eq!(Some(&b"b"[..]), stored.as_deref());
    assert_eq!(Compression::Stored, entry.compression());
    assert_eq!(1, entry.compressed_size());
    assert_eq!(0x71BEEFF9, entry.crc32());
}

#[tokio::test]
async fn init_data_store_keeps_input() {
    let data = [0u8; 256];
    let mut entry = ZipperEntryBuilder::new("zeros").build();
    let stored = entry.init_data(Some(&data[..]), CompressMode::Store).await.expect("failed to init data");

    assert_eq!(Some(&data[..]), stored.as_deref());
    assert_eq!(Compression::Stored, entry.compression());
    assert_eq!(256, entry.compressed_size());
    assert_eq!(256, entry.uncompressed_size());
}

#[tokio::test]
async fn init_data_none_zeroes_fields() {
    let mut entry = ZipperEntryBuilder::new("foo").build();
    entry.init_data(Some(&b"foo"[..]), CompressMode::Deflate).await.expect("failed to init data");

    let stored = entry.init_data(None, CompressMode::Deflate).await.expect("failed to init data");

    assert!(stored.is_none());
    assert_eq!(Compression::Stored, entry.compression());
    assert_eq!(0, entry.crc32());
    assert_eq!(0, entry.compressed_size());
    assert_eq!(0, entry.uncompressed_size());
}

#[tokio::test]
async fn add_entry_rejects_length_mismatch() {
    let mut zipper = Zipper::new(Vec::<u8>::new());
    let mut entry = ZipperEntryBuilder::new("foo").build();
    entry.init_data(Some(&b"foo"[..]), CompressMode::Store).await.expect("failed to init data");

    let result = zipper.add_entry(entry, Some(&b"fo"[..])).await;

    assert!(matches!(result, Err(PackagerError::DataLengthMismatch { expected: 3, actual: 2 })));
    assert_eq!(0, zipper.offset());
    assert!(zipper.entries().is_empty());
}

#[tokio::test]
async fn add_entry_requires_data() {
    let mut zipper = Zipper::new(Vec::<u8>::new());
    let mut entry = ZipperEntryBuilder::new("foo").build();
    entry.init_data(Some(&b"foo"[..]), CompressMode::Store).await.expect("failed to init data");

    let result = zipper.add_entry(entry, None).await;

    assert!(matches!(result, Err(PackagerError::DataRequired)));
    assert_eq!(0, zipper.offset());
}

#[tokio::test]
async fn add_entry_without_data() {
    let mut zipper = Zipper::new(Vec::<u8>::new());
    let entry = ZipperEntryBuilder::new("empty").build();

    let committed = zipper.add_entry(entry, None).await.expect("failed to write entry");
    assert_eq!(0, committed.header_offset_local());
    assert_eq!(35, zipper.offset());
}

#[tokio::test]
async fn add_entry_rejects_long_comment() {
    let mut zipper = Zipper::new(Vec::<u8>::new());
    let entry = ZipperEntryBuilder::new("foo").comment(vec![b'x'; u16::MAX as usize + 1]).build();

    let result = zipper.add_entry(entry, None).await;

    assert!(matches!(result, Err(PackagerError::CommentTooLarge)));
    assert_eq!(0, zipper.offset());
}

#[tokio::test]
async fn offsets_match_positions() {
    let mut zipper = Zipper::new(Vec::<u8>::new());

    for (index, path) in ["one", "two/two", "three/three/three"].iter().enumerate() {
        let data = path.repeat(index + 1);
        let mut entry = ZipperEntryBuilder::new(*path).info_zip_unix2(1, 2).build();
        let stored = entry.init_data(Some(data.as_bytes()), CompressMode::Auto).await.expect("failed to init data");
        zipper.add_entry(entry, stored.as_deref()).await.expect("failed to write entry");
    }

    let entries = zipper.entries().to_vec();
    let written = zipper.close().await.expect("failed to close writer");

    for entry in &entries {
        let offset = entry.header_offset_local() as usize;
        let header = entry.local_header_bytes().unwrap();
        assert_eq!(&header[..], &written[offset..offset + header.len()]);
    }

    let eocd = &written[written.len() - 22..];
    let cd_size = u32::from_le_bytes([eocd[12], eocd[13], eocd[14], eocd[15]]) as usize;
    let cd_offset = u32::from_le_bytes([eocd[16], eocd[17], eocd[18], eocd[19]]) as usize;

    assert_eq!(written.len() - 22, cd_offset + cd_size);
    assert_eq!(&[0x50, 0x4B, 0x01, 0x02], &written[cd_offset..cd_offset + 4]);
}

#[tokio::test]
async fn patch_rewrites_entry_in_place() {
    let mut zipper = Zipper::new(Cursor::new(Vec::<u8>::new()));

    let mut entry = ZipperEntryBuilder::new("first").build();
    let stored = entry.init_data(Some(&b"first"[..]), CompressMode::Store).await.expect("failed to init data");
    zipper.add_entry(entry, stored.as_deref()).await.expect("failed to write entry");

    let mut entry = ZipperEntryBuilder::new("hash").build();
    let stored = entry.init_data(Some(&[0u8; 4][..]), CompressMode::Store).await.expect("failed to init data");
    let mut reserved = zipper.add_entry(entry, stored.as_deref()).await.expect("failed to write entry").clone();

    let mut sink = zipper.close().await.expect("failed to close writer");
    let before = sink.get_ref().clone();

    let digest = [1u8, 2, 3, 4];
    reserved.init_data(Some(&digest[..]), CompressMode::Store).await.expect("failed to init data");
    patch_local_entry(&mut sink, &reserved, &digest).await.expect("failed to patch entry");

    let after = sink.get_ref();
    let offset = reserved.header_offset_local() as usize;
    let header = reserved.local_header_bytes().unwrap();

    assert_eq!(before.len() as u64, sink.position());
    assert_eq!(before.len(), after.len());
    assert_eq!(&before[..offset], &after[..offset]);
    assert_eq!(&header[..], &after[offset..offset + header.len()]);
    assert_eq!(&digest[..], &after[offset + header.len()..offset + header.len() + 4]);
    assert_eq!(&before[offset + header.len() + 4..], &after[offset + header.len() + 4..]);
}

#[tokio::test]
async fn patch_rejects_length_mismatch() {
    let mut entry = ZipperEntryBuilder::new("hash").build();
    entry.init_data(Some(&[0u8; 4][..]), CompressMode::Store).await.expect("failed to init data");

    let mut sink = Cursor::new(Vec::<u8>::new());
    let result = patch_local_entry(&mut sink, &entry, &[0u8; 5]).await;

    assert!(matches!(result, Err(PackagerError::PatchLengthMismatch { expected: 4, actual: 5 })));
    assert!(sink.get_ref().is_empty());
}
