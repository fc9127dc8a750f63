// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use chrono::{DateTime, Utc};

use crate::date::ZipDateTime;
use crate::entry::ZipperEntry;
use crate::spec::extra_field::ExtraField;

/// A builder for [`ZipperEntry`].
pub struct ZipperEntryBuilder(pub(crate) ZipperEntry);

impl From<ZipperEntry> for ZipperEntryBuilder {
    fn from(entry: ZipperEntry) -> Self {
        Self(entry)
    }
}

impl ZipperEntryBuilder {
    /// Constructs a new builder which defines the raw underlying data of a ZIP entry.
    ///
    /// Versions default to 2.0 with an MS-DOS host, every other field defaults to zero or empty.
    pub fn new(path: impl Into<Vec<u8>>) -> Self {
        Self(ZipperEntry::new(path.into()))
    }

    /// Sets the entry's raw path.
    pub fn path(mut self, path: impl Into<Vec<u8>>) -> Self {
        self.0.path = path.into();
        self
    }

    /// Sets the entry's raw comment.
    pub fn comment(mut self, comment: impl Into<Vec<u8>>) -> Self {
        self.0.comment = comment.into();
        self
    }

    /// Sets the version needed to extract.
    pub fn extract_version(mut self, version: u8) -> Self {
        self.0.extract_version = version;
        self
    }

    /// Sets the host OS byte paired with the version needed to extract.
    pub fn extract_host_os(mut self, host_os: u8) -> Self {
        self.0.extract_host_os = host_os;
        self
    }

    /// Sets the version made by.
    pub fn create_version(mut self, version: u8) -> Self {
        self.0.create_version = version;
        self
    }

    /// Sets the host OS byte paired with the version made by.
    pub fn create_host_os(mut self, host_os: u8) -> Self {
        self.0.create_host_os = host_os;
        self
    }

    /// Sets the entry's general purpose flags.
    pub fn flags(mut self, flags: u16) -> Self {
        self.0.flags = flags;
        self
    }

    /// Sets the entry's last modification date.
    pub fn last_modification_date(mut self, date: ZipDateTime) -> Self {
        self.0.last_modification_date = date;
        self
    }

    /// Sets the disk number on which the entry starts.
    pub fn disk_number_start(mut self, disk: u16) -> Self {
        self.0.disk_number_start = disk;
        self
    }

    /// Sets the entry's internal file attributes.
    pub fn internal_attributes(mut self, attributes: u16) -> Self {
        self.0.internal_attributes = attributes;
        self
    }

    /// Sets the entry's external file attributes.
    pub fn external_attributes(mut self, attributes: u32) -> Self {
        self.0.external_attributes = attributes;
        self
    }

    /// Appends a raw extra field to the local file header only.
    pub fn extra_field_local(mut self, field: ExtraField) -> Self {
        self.0.extra_fields_local.push(field);
        self
    }

    /// Appends a raw extra field to the central directory record only.
    pub fn extra_field_central(mut self, field: ExtraField) -> Self {
        self.0.extra_fields_central.push(field);
        self
    }

    /// Appends an Extended Timestamp field to both headers.
    pub fn extended_timestamp(
        mut self,
        mtime: Option<&DateTime<Utc>>,
        atime: Option<&DateTime<Utc>>,
        ctime: Option<&DateTime<Utc>>,
    ) -> Self {
        self.0.add_extra_fields_extended_timestamp(mtime, atime, ctime);
        self
    }

    /// Appends an Info-ZIP UNIX type 2 field to both headers.
    pub fn info_zip_unix2(mut self, uid: u16, gid: u16) -> Self {
        self.0.add_extra_fields_info_zip_unix2(uid, gid);
        self
    }

    /// Consumes this builder and returns a final [`ZipperEntry`].
    ///
    /// This is equivalent to:
    /// ```
    /// # use airpack::{ZipperEntry, ZipperEntryBuilder};
    /// #
    /// # let builder = ZipperEntryBuilder::new("foo.bar");
    /// let entry: ZipperEntry = builder.into();
    /// ```
    pub fn build(self) -> ZipperEntry {
        self.into()
    }
}
