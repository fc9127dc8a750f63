// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Extra field records attached to local file headers and central directory records.
//!
//! The local and central copies of a field are encoded independently, and some well-known fields deliberately differ
//! between the two. [`ExtraField::extended_timestamp`] and [`ExtraField::info_zip_unix2`] build the matching copy for
//! either location.

use chrono::{DateTime, Utc};

use crate::error::{PackagerError, Result};
use crate::spec::consts::{EXTENDED_TIMESTAMP_ID, INFO_ZIP_UNIX2_ID};

/// 2 byte header ids
/// Ref https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#452
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeaderId(pub u16);

impl HeaderId {
    pub const EXTENDED_TIMESTAMP: HeaderId = HeaderId(EXTENDED_TIMESTAMP_ID);
    pub const INFO_ZIP_UNIX2: HeaderId = HeaderId(INFO_ZIP_UNIX2_ID);
}

impl From<u16> for HeaderId {
    fn from(value: u16) -> Self {
        HeaderId(value)
    }
}

impl From<HeaderId> for u16 {
    fn from(value: HeaderId) -> Self {
        value.0
    }
}

/// Which header an extra field is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFieldLocation {
    Local,
    Central,
}

/// A single extra field record: a header id followed by an optional payload.
///
/// A field without a payload is encoded with a zero data size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub(crate) header_id: HeaderId,
    pub(crate) data: Option<Vec<u8>>,
}

impl ExtraField {
    /// Constructs a raw extra field, failing if the payload length doesn't fit in the u16 data size.
    pub fn new(header_id: impl Into<HeaderId>, data: Option<Vec<u8>>) -> Result<Self> {
        if data.as_ref().map(|data| data.len() > u16::MAX as usize).unwrap_or(false) {
            return Err(PackagerError::ExtraFieldTooLarge);
        }

        Ok(Self { header_id: header_id.into(), data })
    }

    /// Builds an Extended Timestamp field (`0x5455`).
    ///
    /// The flag byte reflects every time supplied. The local copy carries each present time in mtime, atime, ctime
    /// order, whilst the central copy only ever carries the mtime value.
    pub fn extended_timestamp(
        location: ExtraFieldLocation,
        mtime: Option<&DateTime<Utc>>,
        atime: Option<&DateTime<Utc>>,
        ctime: Option<&DateTime<Utc>>,
    ) -> Self {
        let mut flags = 0u8;
        let mut data = vec![0u8];

        for (index, time) in [mtime, atime, ctime].into_iter().enumerate() {
            let Some(time) = time else {
                continue;
            };

            flags |= 1 << index;
            if location == ExtraFieldLocation::Local || index == 0 {
                data.extend_from_slice(&unix_seconds(time).to_le_bytes());
            }
        }

        data[0] = flags;
        Self { header_id: HeaderId::EXTENDED_TIMESTAMP, data: Some(data) }
    }

    /// Builds an Info-ZIP UNIX type 2 field (`0x7855`).
    ///
    /// Only the local copy carries the uid and gid, the central copy is an empty record.
    pub fn info_zip_unix2(location: ExtraFieldLocation, uid: u16, gid: u16) -> Self {
        let data = match location {
            ExtraFieldLocation::Local => {
                let mut data = Vec::with_capacity(4);
                data.extend_from_slice(&uid.to_le_bytes());
                data.extend_from_slice(&gid.to_le_bytes());
                Some(data)
            }
            ExtraFieldLocation::Central => None,
        };

        Self { header_id: HeaderId::INFO_ZIP_UNIX2, data }
    }

    /// Returns the field's header id.
    pub fn header_id(&self) -> HeaderId {
        self.header_id
    }

    /// Returns the field's payload, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

// Timestamps are stored as unsigned 32-bit seconds, so anything outside that range is pinned to its bounds.
fn unix_seconds(time: &DateTime<Utc>) -> u32 {
    time.timestamp().clamp(0, u32::MAX as i64) as u32
}

pub(crate) trait ExtraFieldAsBytes {
    fn as_bytes(&self) -> Vec<u8>;

    fn count_bytes(&self) -> usize;
}

impl ExtraFieldAsBytes for &[ExtraField] {
    fn as_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.count_bytes());
        for field in self.iter() {
            buffer.append(&mut field.as_bytes());
        }
        buffer
    }

    fn count_bytes(&self) -> usize {
        self.iter().map(|field| field.count_bytes()).sum()
    }
}

impl ExtraFieldAsBytes for ExtraField {
    fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.count_bytes());
        let header_id: u16 = self.header_id.into();
        let data = self.data.as_deref().unwrap_or_default();

        bytes.extend_from_slice(&header_id.to_le_bytes());
        bytes.extend_from_slice(&(data.len() as u16).to_le_bytes());
        bytes.extend_from_slice(data);

        bytes
    }

    fn count_bytes(&self) -> usize {
        4 + self.data.as_ref().map(Vec::len).unwrap_or_default()
    }
}
