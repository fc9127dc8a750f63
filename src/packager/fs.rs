// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Filesystem resource helpers for [`AirPackager`].

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use futures_lite::io::{AsyncSeek, AsyncWrite};
use walkdir::WalkDir;

use crate::error::{PackagerError, Result};
use crate::packager::{AirPackager, ResourceOptions};

impl<W: AsyncWrite + AsyncSeek + Unpin> AirPackager<W> {
    /// Opens the package with an application descriptor read from disk.
    pub async fn open_file(&mut self, descriptor: impl AsRef<Path>) -> Result<()> {
        let application_data = tokio::fs::read(descriptor).await?;
        self.open(&application_data).await
    }

    /// Adds a regular file as a resource.
    ///
    /// The destination defaults to the source path. Unless overridden, the executable flag is taken from the owner
    /// execute bit and the modification time from the file's metadata.
    pub async fn add_resource_file(
        &mut self,
        source: impl AsRef<Path>,
        destination: Option<&str>,
        options: ResourceOptions,
    ) -> Result<()> {
        let source = source.as_ref();
        let metadata = tokio::fs::symlink_metadata(source).await?;

        if metadata.file_type().is_symlink() {
            return Err(PackagerError::SymlinkNotSupported(source.to_path_buf()));
        }
        if !metadata.is_file() {
            return Err(PackagerError::UnsupportedFileType(source.to_path_buf()));
        }

        let executable = options.executable.unwrap_or_else(|| owner_executable(&metadata));
        let mtime = match options.mtime {
            Some(mtime) => mtime,
            None => DateTime::<Utc>::from(metadata.modified()?),
        };

        let destination = match destination {
            Some(destination) => destination.to_string(),
            None => path_to_resource(source),
        };

        let data = tokio::fs::read(source).await?;
        self.add_resource(&destination, &data, ResourceOptions { executable: Some(executable), mtime: Some(mtime) })
            .await
    }

    /// Adds every file beneath a directory, in file name order.
    ///
    /// Entries whose names match an exclusion pattern are skipped, and excluded directories aren't descended into.
    pub async fn add_resource_directory(
        &mut self,
        source: impl AsRef<Path>,
        destination: Option<&str>,
        options: ResourceOptions,
    ) -> Result<()> {
        let source = source.as_ref();
        let destination = match destination {
            Some(destination) => destination.to_string(),
            None => path_to_resource(source),
        };

        let mut files: Vec<PathBuf> = Vec::new();
        let walker = WalkDir::new(source).min_depth(1).sort_by_file_name().into_iter().filter_entry(|entry| {
            !self.is_excluded_file(&entry.file_name().to_string_lossy())
        });

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir() {
                continue;
            }

            files.push(entry.into_path());
        }

        for file in files {
            let relative = file.strip_prefix(source).unwrap_or(&file);
            let target = format!("{}/{}", destination, path_to_resource(relative));
            self.add_resource_file(&file, Some(&target), options.clone()).await?;
        }

        Ok(())
    }
}

fn path_to_resource(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn owner_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn owner_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}
