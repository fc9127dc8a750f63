// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A set of [`tokio`]-specific type aliases and features.
//!
//! # Usage
//! With the `tokio` feature enabled, the writer and packager implement additional constructors for use with
//! [`tokio`]. These constructors internally implement conversion between the required async IO traits. They are
//! defined as:
//! - [`write::Zipper::with_tokio()`](crate::write::Zipper::with_tokio)
//! - [`packager::AirPackager::with_tokio()`](crate::packager::AirPackager::with_tokio)
//!
//! The types returned by these constructors contain a wrapping compatibility type provided by an external crate,
//! which cannot be named unless you also pull in the [`tokio_util`] dependency manually. The aliases within this
//! module name them without needing a separate dependency.

#[cfg(doc)]
use tokio_util;

pub mod write {
    //! A module which supports writing ZIP files.

    use tokio_util::compat::Compat;

    /// A [`tokio`]-specific type alias for [`crate::write::Zipper`].
    pub type Zipper<W> = crate::write::Zipper<Compat<W>>;
}

pub mod packager {
    //! A module which supports writing AIR packages.

    use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

    use crate::packager::{PackageKind, PackagerOptions};

    /// A [`tokio`]-specific type alias for [`crate::packager::AirPackager`].
    pub type AirPackager<W> = crate::packager::AirPackager<Compat<W>>;

    impl<W> AirPackager<W>
    where
        W: tokio::io::AsyncWrite + tokio::io::AsyncSeek + Unpin,
    {
        /// Constructs a new packager over a [`tokio`] sink.
        pub fn with_tokio(kind: PackageKind, sink: W, options: PackagerOptions) -> Self {
            Self::new(kind, sink.compat_write(), options)
        }
    }
}
