// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Signing material and the timestamp authority client.

pub mod certificate;
pub(crate) mod der;
pub mod key;
pub mod keystore;
pub mod timestamper;

pub use certificate::{Certificate, X509Certificate};
pub use key::{PrivateKey, RsaPrivateKey};
pub use keystore::{Keystore, PemKeystore};
pub use timestamper::{HttpTransport, SecurityTimestamper, TimestampTransport};
