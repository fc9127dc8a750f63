// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use async_compression::futures::write;
use crc32fast::Hasher;
use futures_lite::io::{AsyncWriteExt, Cursor};

use crate::error::Result;

/// Raw-deflates the given data as a single independent stream.
pub(crate) async fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut writer = write::DeflateEncoder::new(Cursor::new(Vec::with_capacity(data.len() / 2)));
    writer.write_all(data).await?;
    writer.close().await?;

    Ok(writer.into_inner().into_inner())
}

pub(crate) fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
