// Copyright (c) 2021-2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports writing ZIP files.
//!
//! # Example
//! ```no_run
//! # use airpack::{CompressMode, ZipperEntryBuilder, write::Zipper};
//! # use airpack::error::PackagerError;
//! #
//! # async fn run() -> Result<(), PackagerError> {
//! let mut zipper = Zipper::new(Vec::<u8>::new());
//!
//! let mut entry = ZipperEntryBuilder::new("foo.txt").build();
//! let data = entry.init_data(Some(&b"This is an example file."[..]), CompressMode::Auto).await?;
//!
//! zipper.add_entry(entry, data.as_deref()).await?;
//! zipper.close().await?;
//! #   Ok(())
//! # }
//! ```

pub(crate) mod compress;
pub(crate) mod io;
pub mod patch;

pub use patch::patch_local_entry;

#[cfg(feature = "tokio")]
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use futures_lite::io::{AsyncWrite, AsyncWriteExt};

use crate::entry::ZipperEntry;
use crate::error::{PackagerError, Result};
use crate::spec::consts::EOCDR_SIGNATURE;
use crate::spec::header::EndOfCentralDirectoryHeader;

use io::offset::AsyncOffsetWriter;

/// A streaming ZIP file writer which acts over AsyncWrite implementers.
///
/// Entries are committed strictly in write order and can't be removed once added. The central directory describes
/// them in the same order when [`Zipper::close()`] is called.
///
/// # Note
/// - [`Zipper::close()`] must be called before a writer goes out of scope.
/// - Concurrent use isn't supported, each [`Zipper::add_entry()`] must complete before the next starts.
pub struct Zipper<W> {
    pub(crate) writer: AsyncOffsetWriter<W>,
    pub(crate) entries: Vec<ZipperEntry>,
    comment: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> Zipper<W> {
    /// Construct a new ZIP file writer from a writer.
    pub fn new(writer: W) -> Self {
        Self { writer: AsyncOffsetWriter::new(writer), entries: Vec::new(), comment: Vec::new() }
    }

    /// Set the ZIP file comment.
    pub fn comment(&mut self, comment: impl Into<Vec<u8>>) {
        self.comment = comment.into();
    }

    /// Returns the entries committed so far, in write order.
    pub fn entries(&self) -> &[ZipperEntry] {
        &self.entries
    }

    /// Returns the number of bytes written to the inner writer so far.
    pub fn offset(&self) -> u64 {
        self.writer.offset()
    }

    /// Returns a mutable reference to the inner writer.
    ///
    /// Care should be taken when using this inner writer as doing so may invalidate internal state of this writer.
    pub fn inner_mut(&mut self) -> &mut W {
        self.writer.inner_mut()
    }

    /// Commits an entry, writing its local file header followed by its data.
    ///
    /// The data must be what [`ZipperEntry::init_data()`] returned: its length must equal the entry's compressed
    /// size, and it may only be absent when that size is zero. The entry's local header offset is set to the current
    /// stream offset before anything is written.
    ///
    /// Returns the committed record so that callers can keep a copy for a later [`patch_local_entry()`].
    #[tracing::instrument(skip_all, fields(path = %String::from_utf8_lossy(entry.path())))]
    pub async fn add_entry(&mut self, mut entry: ZipperEntry, data: Option<&[u8]>) -> Result<&ZipperEntry> {
        match data {
            Some(data) if data.len() != entry.size_compressed as usize => {
                return Err(PackagerError::DataLengthMismatch { expected: entry.size_compressed, actual: data.len() });
            }
            None if entry.size_compressed != 0 => return Err(PackagerError::DataRequired),
            _ => {}
        }

        entry.header_offset_local = self.writer.offset().try_into().map_err(|_| PackagerError::OffsetTooLarge)?;
        let header = entry.local_header_bytes()?;
        // Fail before anything is written if the central record can't be encoded either.
        entry.central_header()?;

        let index = self.entries.len();
        self.entries.push(entry);

        self.writer.write_all(&header).await?;
        if let Some(data) = data {
            self.writer.write_all(data).await?;
        }

        let entry = &self.entries[index];
        tracing::debug!(offset = entry.header_offset_local, size = entry.size_compressed, "committed entry");

        Ok(entry)
    }

    /// Consumes this ZIP writer and completes all closing tasks.
    ///
    /// This includes:
    /// - Writing all central directory records in commit order.
    /// - Writing the end of central directory record.
    /// - Writing the file comment.
    /// - Flushing the inner writer.
    ///
    /// As the writer is consumed, no entries can be added afterwards. Failure to call this function before going out
    /// of scope would result in a corrupted ZIP file.
    #[tracing::instrument(skip_all)]
    pub async fn close(mut self) -> Result<W> {
        let cd_offset = self.writer.offset();

        for entry in &self.entries {
            self.writer.write_all(&entry.central_header_bytes()?).await?;
        }

        let central_directory_size = self.writer.offset() - cd_offset;
        let num_of_entries: u16 = self.entries.len().try_into().map_err(|_| PackagerError::TooManyEntries)?;

        let header = EndOfCentralDirectoryHeader {
            disk_num: 0,
            start_cent_dir_disk: 0,
            num_of_entries_disk: num_of_entries,
            num_of_entries,
            size_cent_dir: central_directory_size.try_into().map_err(|_| PackagerError::OffsetTooLarge)?,
            cent_dir_offset: cd_offset.try_into().map_err(|_| PackagerError::OffsetTooLarge)?,
            file_comm_length: self.comment.len().try_into().map_err(|_| PackagerError::ArchiveCommentTooLarge)?,
        };

        self.writer.write_all(&EOCDR_SIGNATURE.to_le_bytes()).await?;
        self.writer.write_all(&header.as_slice()).await?;
        self.writer.write_all(&self.comment).await?;
        self.writer.flush().await?;

        tracing::debug!(cd_offset, central_directory_size, "wrote central directory");

        Ok(self.writer.into_inner())
    }
}

#[cfg(feature = "tokio")]
impl<W> Zipper<Compat<W>>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    /// Construct a new ZIP file writer from a [`tokio`] writer.
    pub fn with_tokio(writer: W) -> Self {
        Self::new(writer.compat_write())
    }
}
