// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub mod builder;

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::date::ZipDateTime;
use crate::entry::builder::ZipperEntryBuilder;
use crate::error::{PackagerError, Result};
use crate::spec::compression::{CompressMode, Compression};
use crate::spec::consts::{
    CDH_LENGTH, CDH_SIGNATURE, DEFAULT_HOST_OS, DEFAULT_VERSION, LFH_LENGTH, LFH_SIGNATURE, SIGNATURE_LENGTH,
};
use crate::spec::extra_field::{ExtraField, ExtraFieldAsBytes, ExtraFieldLocation};
use crate::spec::header::{version_field, CentralDirectoryRecord, LocalFileHeader};
use crate::write::compress::{compute_crc, deflate};

/// A single ZIP file record, holding everything needed to encode both its local file header and its central
/// directory record.
///
/// # Lifecycle
/// An entry is built (see [`ZipperEntryBuilder`]), has its data initialised via [`ZipperEntry::init_data`], and is
/// then moved into [`Zipper::add_entry`](crate::write::Zipper::add_entry). The writer fills in the local header
/// offset, after which the record is only read back, or re-encoded to patch its data in place.
///
/// Paths and comments are raw byte strings, no encoding flag is implied by them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipperEntry {
    pub(crate) extract_version: u8,
    pub(crate) extract_host_os: u8,
    pub(crate) create_version: u8,
    pub(crate) create_host_os: u8,
    pub(crate) flags: u16,
    pub(crate) compression: Compression,
    pub(crate) last_modification_date: ZipDateTime,
    pub(crate) crc: u32,
    pub(crate) size_compressed: u32,
    pub(crate) size_uncompressed: u32,
    pub(crate) disk_number_start: u16,
    pub(crate) internal_attributes: u16,
    pub(crate) external_attributes: u32,
    pub(crate) header_offset_local: u32,
    pub(crate) path: Vec<u8>,
    pub(crate) comment: Vec<u8>,
    pub(crate) extra_fields_local: Vec<ExtraField>,
    pub(crate) extra_fields_central: Vec<ExtraField>,
}

impl From<ZipperEntryBuilder> for ZipperEntry {
    fn from(builder: ZipperEntryBuilder) -> Self {
        builder.0
    }
}

impl Default for ZipperEntry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ZipperEntry {
    pub(crate) fn new(path: Vec<u8>) -> Self {
        ZipperEntry {
            extract_version: DEFAULT_VERSION,
            extract_host_os: DEFAULT_HOST_OS,
            create_version: DEFAULT_VERSION,
            create_host_os: DEFAULT_HOST_OS,
            flags: 0,
            compression: Compression::Stored,
            last_modification_date: ZipDateTime::default(),
            crc: 0,
            size_compressed: 0,
            size_uncompressed: 0,
            disk_number_start: 0,
            internal_attributes: 0,
            external_attributes: 0,
            header_offset_local: 0,
            path,
            comment: Vec::new(),
            extra_fields_local: Vec::new(),
            extra_fields_central: Vec::new(),
        }
    }

    /// Returns the entry's raw path.
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Returns the entry's raw comment.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }

    /// Returns the entry's version needed to extract.
    pub fn extract_version(&self) -> u8 {
        self.extract_version
    }

    /// Returns the host OS byte paired with the version needed to extract.
    pub fn extract_host_os(&self) -> u8 {
        self.extract_host_os
    }

    /// Returns the entry's version made by.
    pub fn create_version(&self) -> u8 {
        self.create_version
    }

    /// Returns the host OS byte paired with the version made by.
    pub fn create_host_os(&self) -> u8 {
        self.create_host_os
    }

    /// Returns the entry's general purpose flags.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns the entry's compression method.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the entry's last modification date.
    pub fn last_modification_date(&self) -> &ZipDateTime {
        &self.last_modification_date
    }

    /// Returns the CRC32 of the entry's uncompressed data.
    pub fn crc32(&self) -> u32 {
        self.crc
    }

    /// Returns the entry's compressed size.
    pub fn compressed_size(&self) -> u32 {
        self.size_compressed
    }

    /// Returns the entry's uncompressed size.
    pub fn uncompressed_size(&self) -> u32 {
        self.size_uncompressed
    }

    /// Returns the disk number on which the entry starts.
    pub fn disk_number_start(&self) -> u16 {
        self.disk_number_start
    }

    /// Returns the entry's internal file attributes.
    pub fn internal_attributes(&self) -> u16 {
        self.internal_attributes
    }

    /// Returns the entry's external file attributes.
    pub fn external_attributes(&self) -> u32 {
        self.external_attributes
    }

    /// Returns the byte offset of the entry's local file header.
    ///
    /// This is zero until the entry has been committed by a [`Zipper`](crate::write::Zipper).
    pub fn header_offset_local(&self) -> u32 {
        self.header_offset_local
    }

    /// Returns the extra fields encoded in the local file header.
    pub fn extra_fields_local(&self) -> &[ExtraField] {
        &self.extra_fields_local
    }

    /// Returns the extra fields encoded in the central directory record.
    pub fn extra_fields_central(&self) -> &[ExtraField] {
        &self.extra_fields_central
    }

    /// Sets the last modification date from a calendar date & time.
    pub fn set_date(&mut self, date: &NaiveDateTime) {
        self.last_modification_date = ZipDateTime::from_naive(date);
    }

    /// Sets the last modification date from a UNIX timestamp in UTC seconds.
    pub fn set_date_unix(&mut self, seconds: i64) {
        self.last_modification_date = ZipDateTime::from_unix(seconds);
    }

    /// Appends an Extended Timestamp field to both the local and central extra field lists.
    pub fn add_extra_fields_extended_timestamp(
        &mut self,
        mtime: Option<&DateTime<Utc>>,
        atime: Option<&DateTime<Utc>>,
        ctime: Option<&DateTime<Utc>>,
    ) {
        self.extra_fields_local.push(ExtraField::extended_timestamp(ExtraFieldLocation::Local, mtime, atime, ctime));
        self.extra_fields_central.push(ExtraField::extended_timestamp(
            ExtraFieldLocation::Central,
            mtime,
            atime,
            ctime,
        ));
    }

    /// Appends an Info-ZIP UNIX type 2 field to both the local and central extra field lists.
    pub fn add_extra_fields_info_zip_unix2(&mut self, uid: u16, gid: u16) {
        self.extra_fields_local.push(ExtraField::info_zip_unix2(ExtraFieldLocation::Local, uid, gid));
        self.extra_fields_central.push(ExtraField::info_zip_unix2(ExtraFieldLocation::Central, uid, gid));
    }

    /// Initialises the entry's compression method, CRC and sizes from its uncompressed data, returning the bytes
    /// which must be handed to [`Zipper::add_entry`](crate::write::Zipper::add_entry).
    ///
    /// The CRC is always computed over the uncompressed input. In [`CompressMode::Auto`], the deflated output is only
    /// kept if it is strictly smaller than the input. Passing [`None`] zeroes every field and returns [`None`].
    pub async fn init_data<'a>(&mut self, data: Option<&'a [u8]>, mode: CompressMode) -> Result<Option<Cow<'a, [u8]>>> {
        let Some(data) = data else {
            self.compression = Compression::Stored;
            self.crc = 0;
            self.size_compressed = 0;
            self.size_uncompressed = 0;
            return Ok(None);
        };

        let size_uncompressed = u32::try_from(data.len()).map_err(|_| PackagerError::EntryTooLarge)?;
        let crc = compute_crc(data);

        let (compression, stored): (Compression, Cow<'a, [u8]>) = match mode {
            CompressMode::Store => (Compression::Stored, Cow::Borrowed(data)),
            CompressMode::Deflate => (Compression::Deflate, Cow::Owned(deflate(data).await?)),
            CompressMode::Auto => {
                let compressed = deflate(data).await?;
                if compressed.len() < data.len() {
                    (Compression::Deflate, Cow::Owned(compressed))
                } else {
                    (Compression::Stored, Cow::Borrowed(data))
                }
            }
        };

        self.compression = compression;
        self.crc = crc;
        self.size_uncompressed = size_uncompressed;
        self.size_compressed = u32::try_from(stored.len()).map_err(|_| PackagerError::EntryTooLarge)?;

        Ok(Some(stored))
    }

    pub(crate) fn local_header(&self) -> Result<LocalFileHeader> {
        Ok(LocalFileHeader {
            version: version_field(self.extract_version, self.extract_host_os),
            flags: self.flags,
            compression: self.compression.into(),
            mod_time: self.last_modification_date.time,
            mod_date: self.last_modification_date.date,
            crc: self.crc,
            compressed_size: self.size_compressed,
            uncompressed_size: self.size_uncompressed,
            file_name_length: self.path.len().try_into().map_err(|_| PackagerError::FileNameTooLarge)?,
            extra_field_length: self
                .extra_fields_local
                .as_slice()
                .count_bytes()
                .try_into()
                .map_err(|_| PackagerError::ExtraFieldTooLarge)?,
        })
    }

    pub(crate) fn central_header(&self) -> Result<CentralDirectoryRecord> {
        Ok(CentralDirectoryRecord {
            v_made_by: version_field(self.create_version, self.create_host_os),
            v_needed: version_field(self.extract_version, self.extract_host_os),
            flags: self.flags,
            compression: self.compression.into(),
            mod_time: self.last_modification_date.time,
            mod_date: self.last_modification_date.date,
            crc: self.crc,
            compressed_size: self.size_compressed,
            uncompressed_size: self.size_uncompressed,
            file_name_length: self.path.len().try_into().map_err(|_| PackagerError::FileNameTooLarge)?,
            extra_field_length: self
                .extra_fields_central
                .as_slice()
                .count_bytes()
                .try_into()
                .map_err(|_| PackagerError::ExtraFieldTooLarge)?,
            file_comment_length: self.comment.len().try_into().map_err(|_| PackagerError::CommentTooLarge)?,
            disk_start: self.disk_number_start,
            inter_attr: self.internal_attributes,
            exter_attr: self.external_attributes,
            lh_offset: self.header_offset_local,
        })
    }

    /// Encodes the local file header, including its signature, path and local extra fields.
    pub fn local_header_bytes(&self) -> Result<Vec<u8>> {
        let header = self.local_header()?;
        let extra_fields = self.extra_fields_local.as_slice();

        let mut bytes = Vec::with_capacity(SIGNATURE_LENGTH + LFH_LENGTH + self.path.len() + extra_fields.count_bytes());
        bytes.extend_from_slice(&LFH_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&header.as_slice());
        bytes.extend_from_slice(&self.path);
        bytes.extend_from_slice(&extra_fields.as_bytes());

        Ok(bytes)
    }

    /// Encodes the central directory record, including its signature, path, central extra fields and comment.
    pub fn central_header_bytes(&self) -> Result<Vec<u8>> {
        let header = self.central_header()?;
        let extra_fields = self.extra_fields_central.as_slice();

        let mut bytes = Vec::with_capacity(
            SIGNATURE_LENGTH + CDH_LENGTH + self.path.len() + extra_fields.count_bytes() + self.comment.len(),
        );
        bytes.extend_from_slice(&CDH_SIGNATURE.to_le_bytes());
        bytes.extend_from_slice(&header.as_slice());
        bytes.extend_from_slice(&self.path);
        bytes.extend_from_slice(&extra_fields.as_bytes());
        bytes.extend_from_slice(&self.comment);

        Ok(bytes)
    }
}
