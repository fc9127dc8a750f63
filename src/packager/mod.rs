// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! An AIR package writer driving the ZIP writer, package hash and signature.
//!
//! A package is laid out as:
//! - `mimetype`, stored uncompressed.
//! - `META-INF/AIR/application.xml`, the application descriptor.
//! - `META-INF/AIR/hash`, a placeholder patched with the SHA-256 of every hashed resource once the archive is closed.
//! - `META-INF/AIR/debug`, only for debug packages.
//! - Every added resource, in order.
//! - `META-INF/signatures.xml`, only for signed kinds.
//!
//! ### Example
//! ```no_run
//! # use airpack::packager::{AirPackager, PackageKind, PackagerOptions, ResourceOptions};
//! # use airpack::error::PackagerError;
//! # use futures_lite::io::Cursor;
//! #
//! # async fn run(descriptor: &[u8], swf: &[u8]) -> Result<(), PackagerError> {
//! let mut packager = AirPackager::new(PackageKind::Intermediate, Cursor::new(Vec::<u8>::new()), PackagerOptions::default());
//!
//! packager.open(descriptor).await?;
//! packager.add_resource("HelloWorld.swf", swf, ResourceOptions::default()).await?;
//!
//! let package = packager.close().await?.into_inner();
//! #   Ok(())
//! # }
//! ```

#[cfg(feature = "tokio-fs")]
pub(crate) mod fs;

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use futures_lite::io::{AsyncSeek, AsyncWrite};
use regex::Regex;

use crate::entry::ZipperEntry;
use crate::error::{PackagerError, Result};
use crate::hasher::{DigestAlgorithm, Hasher};
use crate::security::keystore::Keystore;
use crate::security::timestamper::{HttpTransport, TimestampTransport};
use crate::signature::Signature;
use crate::spec::compression::CompressMode;
use crate::write::{patch_local_entry, Zipper};
use crate::ZipperEntryBuilder;

pub const MIMETYPE_PATH: &str = "mimetype";
pub const APPLICATION_PATH: &str = "META-INF/AIR/application.xml";
pub const HASH_PATH: &str = "META-INF/AIR/hash";
pub const DEBUG_PATH: &str = "META-INF/AIR/debug";
pub const SIGNATURES_PATH: &str = "META-INF/signatures.xml";

const UNIX_UID: u16 = 203;
const UNIX_GID: u16 = 0;
const CREATE_VERSION: u8 = 0x17;
const CREATE_HOST_OS: u8 = 3;
const INTERNAL_ATTRIBUTES: u16 = 1;
const EXTERNAL_ATTRIBUTES_EXECUTABLE: u32 = 0x81ED0000;
const EXTERNAL_ATTRIBUTES_REGULAR: u32 = 0x81A40000;

/// The kind of AIR package being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// A signed installer package (`.air`).
    Installer,
    /// An unsigned intermediate package (`.airi`).
    Intermediate,
    /// A signed native application installer package.
    Native,
}

impl PackageKind {
    /// Returns the content of the `mimetype` resource.
    pub fn mimetype(&self) -> &'static str {
        match self {
            PackageKind::Installer => "application/vnd.adobe.air-application-installer-package+zip",
            PackageKind::Intermediate => "application/vnd.adobe.air-application-intermediate-package+zip",
            PackageKind::Native => "application/vnd.adobe.air-native-application-installer-package+zip",
        }
    }

    /// Returns whether packages of this kind carry a signature.
    pub fn signed(&self) -> bool {
        matches!(self, PackageKind::Installer | PackageKind::Native)
    }
}

/// Returns the default resource exclusions: dot files and Windows thumbnail caches.
pub fn default_excludes() -> Vec<Regex> {
    [r"^\.", r"^ehthumbs\.db$", r"^Thumbs\.db$"].iter().filter_map(|pattern| Regex::new(pattern).ok()).collect()
}

/// Configuration of an [`AirPackager`].
#[derive(Clone)]
pub struct PackagerOptions {
    /// Adds the `META-INF/AIR/debug` marker resource.
    pub debug: bool,
    /// The signing material, required by signed kinds.
    pub keystore: Option<Arc<dyn Keystore>>,
    /// The timestamp authority, if the signature should be timestamped.
    pub timestamp_url: Option<String>,
    /// File names skipped when adding directories.
    pub excludes: Vec<Regex>,
}

impl Default for PackagerOptions {
    fn default() -> Self {
        Self { debug: false, keystore: None, timestamp_url: None, excludes: default_excludes() }
    }
}

impl std::fmt::Debug for PackagerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackagerOptions")
            .field("debug", &self.debug)
            .field("keystore", &self.keystore.is_some())
            .field("timestamp_url", &self.timestamp_url)
            .field("excludes", &self.excludes)
            .finish()
    }
}

/// Per resource metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Marks the resource as executable.
    pub executable: Option<bool>,
    /// The modification time, defaulting to now.
    pub mtime: Option<DateTime<Utc>>,
}

/// A writer of AIR packages over a seekable sink.
///
/// Resources must be added one at a time. An add which was abandoned before completing leaves the packager busy and
/// every later add fails with [`PackagerError::ResourceBusy`].
pub struct AirPackager<W> {
    kind: PackageKind,
    options: PackagerOptions,
    sink: Option<W>,
    zipper: Option<Zipper<W>>,
    hasher: Hasher,
    signature: Option<Signature>,
    hash_entry: Option<ZipperEntry>,
    adding: bool,
}

impl<W: AsyncWrite + AsyncSeek + Unpin> AirPackager<W> {
    /// Constructs a new packager writing to the given sink once opened.
    pub fn new(kind: PackageKind, sink: W, options: PackagerOptions) -> Self {
        Self {
            kind,
            options,
            sink: Some(sink),
            zipper: None,
            hasher: Hasher::new(DigestAlgorithm::Sha256),
            signature: None,
            hash_entry: None,
            adding: false,
        }
    }

    /// Returns the kind of package being written.
    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    /// Returns the packager's configuration.
    pub fn options(&self) -> &PackagerOptions {
        &self.options
    }

    /// Returns whether the package has been opened.
    pub fn is_open(&self) -> bool {
        self.zipper.is_some()
    }

    /// Returns whether a file name matches one of the exclusion patterns.
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.options.excludes.iter().any(|exclude| exclude.is_match(name))
    }

    /// Opens the package and writes the leading meta resources.
    pub async fn open(&mut self, application_data: &[u8]) -> Result<()> {
        if self.zipper.is_some() {
            return Err(PackagerError::AlreadyOpen);
        }

        let signature = if self.kind.signed() {
            let keystore = self.options.keystore.as_ref().ok_or(PackagerError::MissingKeystore)?;
            let mut signature = Signature::new();
            signature.timestamp_url = self.options.timestamp_url.clone();
            signature.certificate = Some(keystore.certificate()?);
            signature.private_key = Some(keystore.private_key()?);
            Some(signature)
        } else {
            None
        };

        let sink = self.sink.take().ok_or(PackagerError::AlreadyOpen)?;
        self.zipper = Some(Zipper::new(sink));
        self.hasher.reset();
        self.signature = signature;
        self.hash_entry = None;
        self.adding = false;

        tracing::debug!(kind = ?self.kind, "opened package");

        let mimetype = self.kind.mimetype().as_bytes();
        self.add_resource_inner(MIMETYPE_PATH, mimetype, &ResourceOptions::default(), true, true).await?;
        self.add_resource_inner(APPLICATION_PATH, application_data, &ResourceOptions::default(), true, true).await?;

        let placeholder = vec![0u8; self.hasher.bytes()];
        self.add_resource_inner(HASH_PATH, &placeholder, &ResourceOptions::default(), false, false).await?;

        if self.options.debug {
            self.add_resource_inner(DEBUG_PATH, &[], &ResourceOptions::default(), true, true).await?;
        }

        Ok(())
    }

    /// Adds a resource at the given package path.
    pub async fn add_resource(&mut self, destination: &str, data: &[u8], options: ResourceOptions) -> Result<()> {
        if self.zipper.is_none() {
            return Err(PackagerError::NotOpen);
        }
        if self.adding {
            return Err(PackagerError::ResourceBusy);
        }

        self.adding = true;
        let destination = normalize_path(destination);
        self.add_resource_inner(&destination, data, &options, true, true).await?;
        self.adding = false;

        Ok(())
    }

    /// Finishes the package, timestamping the signature over HTTP when a timestamp URL is configured, and returns
    /// the sink.
    ///
    /// No HTTP client is created unless the package is signed and timestamped.
    pub async fn close(self) -> Result<W> {
        self.finish(None::<&HttpTransport>).await
    }

    /// Finishes the package, timestamping the signature over the given transport when a timestamp URL is
    /// configured, and returns the sink.
    pub async fn close_with<T: TimestampTransport>(self, transport: &T) -> Result<W> {
        self.finish(Some(transport)).await
    }

    async fn finish<T: TimestampTransport>(mut self, transport: Option<&T>) -> Result<W> {
        if self.zipper.is_none() {
            return Err(PackagerError::NotOpen);
        }

        if let Some(mut signature) = self.signature.take() {
            signature.digest()?;
            signature.sign()?;
            if signature.timestamp_url.is_some() {
                match transport {
                    Some(transport) => signature.timestamp_with(transport).await?,
                    None => signature.timestamp().await?,
                }
            }

            let document = signature.encode()?;
            self.add_resource_inner(SIGNATURES_PATH, &document, &ResourceOptions::default(), false, false).await?;
        }

        let zipper = self.zipper.take().ok_or(PackagerError::NotOpen)?;
        let mut sink = zipper.close().await?;

        if let Some(mut hash_entry) = self.hash_entry.take() {
            let digest = self.hasher.digest();
            hash_entry.init_data(Some(digest.as_slice()), CompressMode::Store).await?;
            patch_local_entry(&mut sink, &hash_entry, &digest).await?;
        }

        tracing::debug!(kind = ?self.kind, "closed package");
        Ok(sink)
    }

    async fn add_resource_inner(
        &mut self,
        destination: &str,
        data: &[u8],
        options: &ResourceOptions,
        hashed: bool,
        signed: bool,
    ) -> Result<()> {
        if hashed {
            self.hasher.update(data);
        }
        if signed {
            if let Some(signature) = self.signature.as_mut() {
                signature.add_file(destination, data)?;
            }
        }

        self.write_resource(destination, data, options).await
    }

    async fn write_resource(&mut self, destination: &str, data: &[u8], options: &ResourceOptions) -> Result<()> {
        let zipper = self.zipper.as_mut().ok_or(PackagerError::NotOpen)?;
        let compressible = destination != MIMETYPE_PATH && destination != HASH_PATH;
        let mtime = options.mtime.unwrap_or_else(Utc::now);
        let external_attributes = match options.executable {
            Some(true) => EXTERNAL_ATTRIBUTES_EXECUTABLE,
            _ => EXTERNAL_ATTRIBUTES_REGULAR,
        };

        let mut entry = ZipperEntryBuilder::new(destination)
            .create_version(CREATE_VERSION)
            .create_host_os(CREATE_HOST_OS)
            .internal_attributes(INTERNAL_ATTRIBUTES)
            .external_attributes(external_attributes)
            .extended_timestamp(Some(&mtime), Some(&mtime), None)
            .info_zip_unix2(UNIX_UID, UNIX_GID)
            .build();
        entry.set_date(&mtime.with_timezone(&Local).naive_local());

        let mode = if compressible { CompressMode::Auto } else { CompressMode::Store };
        let stored = entry.init_data(Some(data), mode).await?;
        let committed = zipper.add_entry(entry, stored.as_deref()).await?;

        if destination == HASH_PATH {
            self.hash_entry = Some(committed.clone());
        }

        Ok(())
    }
}

/// Normalizes a package path to forward slashes without empty or `.` segments.
pub fn normalize_path(path: &str) -> String {
    path.split(['/', '\\']).filter(|segment| !segment.is_empty() && *segment != ".").collect::<Vec<_>>().join("/")
}
