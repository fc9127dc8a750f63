// Copyright (c) 2021-2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! # airpack
//!
//! An asynchronous writer of signed AIR application packages, built on a streaming ZIP writer with low-level control
//! over every header field.
//!
//! ## Features
//! - A runtime-agnostic design using `futures-lite`'s IO traits, with [`tokio`](https://tokio.rs) support.
//! - Stored and Deflate entries with Extended Timestamp and Info-ZIP UNIX extra fields.
//! - In-place patching of a committed entry once the archive is closed.
//! - Detached XML signatures over a package manifest, optionally timestamped by an RFC 3161 authority.
//!
//! [Read more.](https://docs.rs/airpack)
//!
//! ## Feature Flags
//! - `full` - Enables all below features.
//! - `tokio` - Compatibility constructors and type aliases for [`tokio`] IO types.
//! - `tokio-fs` - Filesystem resource helpers for the packager, using [`tokio::fs`].

pub mod date;
pub mod entry;
pub mod error;
pub mod hasher;
pub mod packager;
pub mod security;
pub mod signature;
pub mod spec;
pub mod write;

#[cfg(feature = "tokio")]
pub mod tokio;


pub use crate::date::{builder::ZipDateTimeBuilder, ZipDateTime};
pub use crate::entry::{builder::ZipperEntryBuilder, ZipperEntry};
pub use crate::hasher::{DigestAlgorithm, Hasher};
pub use crate::packager::{AirPackager, PackageKind};
pub use crate::signature::{Signature, SignatureAlgorithm};
pub use crate::spec::compression::{CompressMode, Compression};
pub use crate::spec::extra_field::{ExtraField, ExtraFieldLocation, HeaderId};
pub use crate::write::Zipper;
