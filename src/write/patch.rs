// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::io::SeekFrom;

use futures_lite::io::{AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::entry::ZipperEntry;
use crate::error::{PackagerError, Result};

/// Rewrites an already committed entry's local file header and data at its recorded offset.
///
/// The entry should have been re-initialised with the final data using [`CompressMode::Store`], and that data must be
/// exactly as long as the bytes originally reserved, so nothing following the entry moves. The central directory is
/// left untouched. The sink's position is restored once the patch has been written.
///
/// [`CompressMode::Store`]: crate::CompressMode::Store
#[tracing::instrument(skip_all, fields(offset = entry.header_offset_local()))]
pub async fn patch_local_entry<S>(sink: &mut S, entry: &ZipperEntry, data: &[u8]) -> Result<()>
where
    S: AsyncWrite + AsyncSeek + Unpin,
{
    if data.len() != entry.compressed_size() as usize {
        return Err(PackagerError::PatchLengthMismatch { expected: entry.compressed_size(), actual: data.len() });
    }

    let header = entry.local_header_bytes()?;
    let position = sink.seek(SeekFrom::Current(0)).await?;

    sink.seek(SeekFrom::Start(entry.header_offset_local().into())).await?;
    sink.write_all(&header).await?;
    sink.write_all(data).await?;
    sink.flush().await?;
    sink.seek(SeekFrom::Start(position)).await?;

    tracing::debug!(length = header.len() + data.len(), "patched local entry");
    Ok(())
}
