// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub const SIGNATURE_LENGTH: usize = 4;

// Local file header constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#437
pub const LFH_SIGNATURE: u32 = 0x4034b50;
pub const LFH_LENGTH: usize = 26;

// Central directory header constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4312
pub const CDH_SIGNATURE: u32 = 0x2014b50;
pub const CDH_LENGTH: usize = 42;

// End of central directory record constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316
pub const EOCDR_SIGNATURE: u32 = 0x6054b50;
pub const EOCDR_LENGTH: usize = 18;

/// Version 2.0, the minimum needed for deflate.
pub const DEFAULT_VERSION: u8 = 0x14;
/// MS-DOS and OS/2 (FAT / VFAT / FAT32 file systems).
pub const DEFAULT_HOST_OS: u8 = 0;

// Extra field header ids
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#462
pub const EXTENDED_TIMESTAMP_ID: u16 = 0x5455;
pub const INFO_ZIP_UNIX2_ID: u16 = 0x7855;
