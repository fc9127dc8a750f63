// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A detached XML signature over a manifest of package files.
//!
//! A [`Signature`] moves through a fixed sequence of steps, each of which may run only once and in order:
//! [`add_file()`](Signature::add_file) any number of times, [`digest()`](Signature::digest),
//! [`sign()`](Signature::sign), optionally [`timestamp()`](Signature::timestamp), then
//! [`encode()`](Signature::encode). Calling a step out of order fails with
//! [`PackagerError::SignatureOrder`].
//!
//! Instances aren't synchronised. Steps must be awaited one after another.
//!
//! ### Example
//! ```no_run
//! # use airpack::{Signature, security::PemKeystore, security::Keystore};
//! # use airpack::error::PackagerError;
//! #
//! # async fn run(keystore: PemKeystore) -> Result<(), PackagerError> {
//! let mut signature = Signature::new();
//! signature.certificate = Some(keystore.certificate()?);
//! signature.private_key = Some(keystore.private_key()?);
//!
//! signature.add_file("mimetype", b"application/vnd.adobe.air-application-installer-package+zip")?;
//! signature.digest()?;
//! signature.sign()?;
//!
//! let document = signature.encode()?;
//! #   Ok(())
//! # }
//! ```

pub mod state;
pub(crate) mod template;

use std::sync::Arc;

use crate::error::{PackagerError, Result};
use crate::hasher::{DigestAlgorithm, Hasher};
use crate::security::certificate::Certificate;
use crate::security::key::PrivateKey;
use crate::security::timestamper::{HttpTransport, SecurityTimestamper, TimestampTransport};
use crate::signature::state::{Operation, State};
use crate::signature::template::base64_wrapped;

/// The reference target of the bare signature value.
pub const TIMESTAMP_URI_SIGNATURE: &str = "SignatureValue";

/// The reference target of the signature value by its identifier.
pub const TIMESTAMP_URI_PACKAGE: &str = "#PackageSignatureValue";

/// The algorithm used to sign the signed info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    RsaSha1,
    RsaSha256,
}

impl SignatureAlgorithm {
    /// Returns the XML signature method URI.
    pub fn xml_uri(&self) -> &'static str {
        match self {
            SignatureAlgorithm::RsaSha1 => "http://www.w3.org/TR/xmldsig-core#rsa-sha1",
            SignatureAlgorithm::RsaSha256 => "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256",
        }
    }

    /// Returns the digest the private key signs over.
    pub fn digest(&self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::RsaSha1 => DigestAlgorithm::Sha1,
            SignatureAlgorithm::RsaSha256 => DigestAlgorithm::Sha256,
        }
    }
}

/// A detached signature builder.
///
/// The public fields are configuration and are restored by [`Signature::defaults()`]. Accumulated state is cleared
/// by [`Signature::reset()`].
#[derive(Clone)]
pub struct Signature {
    /// The certificate embedded in the key info.
    pub certificate: Option<Arc<dyn Certificate>>,
    /// The key which signs the signed info.
    pub private_key: Option<Arc<dyn PrivateKey>>,
    /// The timestamp authority, if timestamping.
    pub timestamp_url: Option<String>,
    /// Whether to timestamp against the bare `SignatureValue` reference.
    pub timestamp_uri_signature: bool,
    /// Whether to timestamp against the `#PackageSignatureValue` reference.
    pub timestamp_uri_package: bool,
    /// The algorithm which signs the signed info.
    pub signature_algorithm: SignatureAlgorithm,
    /// The digest sent to the timestamp authority.
    pub timestamp_digest: DigestAlgorithm,

    state: State,
    references: Vec<String>,
    manifest_digest: Option<Vec<u8>>,
    signed_info: Option<String>,
    signature: Option<Vec<u8>>,
    key_info: Option<String>,
    timestamp: Option<Vec<u8>>,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            certificate: None,
            private_key: None,
            timestamp_url: None,
            timestamp_uri_signature: false,
            timestamp_uri_package: true,
            signature_algorithm: SignatureAlgorithm::default(),
            timestamp_digest: DigestAlgorithm::Sha1,
            state: State::default(),
            references: Vec::new(),
            manifest_digest: None,
            signed_info: None,
            signature: None,
            key_info: None,
            timestamp: None,
        }
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signature")
            .field("timestamp_url", &self.timestamp_url)
            .field("timestamp_uri_signature", &self.timestamp_uri_signature)
            .field("timestamp_uri_package", &self.timestamp_uri_package)
            .field("signature_algorithm", &self.signature_algorithm)
            .field("timestamp_digest", &self.timestamp_digest)
            .field("state", &self.state)
            .field("references", &self.references.len())
            .finish_non_exhaustive()
    }
}

impl Signature {
    /// Constructs a new signature with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Restores the configuration fields to their defaults, leaving accumulated state untouched.
    pub fn defaults(&mut self) {
        self.certificate = None;
        self.private_key = None;
        self.timestamp_url = None;
        self.timestamp_uri_signature = false;
        self.timestamp_uri_package = true;
        self.signature_algorithm = SignatureAlgorithm::default();
        self.timestamp_digest = DigestAlgorithm::Sha1;
    }

    /// Clears all accumulated state so that the instance may build a new signature.
    pub fn reset(&mut self) {
        self.state = State::Collecting;
        self.references.clear();
        self.manifest_digest = None;
        self.signed_info = None;
        self.signature = None;
        self.key_info = None;
        self.timestamp = None;
    }

    /// Adds a file reference to the manifest.
    ///
    /// The order of calls is preserved in the manifest.
    pub fn add_file(&mut self, uri: &str, data: &[u8]) -> Result<()> {
        self.state.check(Operation::AddFile)?;

        let digest = Hasher::digest_once(DigestAlgorithm::Sha256, data);
        let uri = uri.replace('&', "&amp;");

        self.references.push(template::file_reference(&uri, &base64_wrapped(&digest)));
        Ok(())
    }

    /// Digests the manifest and builds the signed info.
    pub fn digest(&mut self) -> Result<()> {
        self.state.check(Operation::Digest)?;

        let manifest = template::package_manifest(&self.references.concat());
        let digest = Hasher::digest_once(DigestAlgorithm::Sha256, manifest.as_bytes());
        let signed_info = template::signed_info(self.signature_algorithm.xml_uri(), &base64_wrapped(&digest));

        self.manifest_digest = Some(digest);
        self.signed_info = Some(signed_info);
        self.transition(Operation::Digest);
        Ok(())
    }

    /// Signs the signed info and builds the key info.
    pub fn sign(&mut self) -> Result<()> {
        self.state.check(Operation::Sign)?;

        let private_key = self.private_key.as_ref().ok_or(PackagerError::MissingPrivateKey)?;
        let certificate = self.certificate.as_ref().ok_or(PackagerError::MissingCertificate)?;
        let signed_info = self.signed_info.as_deref().ok_or(PackagerError::SignatureOrder {
            operation: Operation::Sign,
            state: self.state,
        })?;

        let key_info: String = certificate
            .encode_certchain()?
            .iter()
            .map(|der| template::certificate(&base64_wrapped(der)))
            .collect();
        let signature = private_key.sign(signed_info.as_bytes(), self.signature_algorithm.digest())?;

        self.key_info = Some(key_info);
        self.signature = Some(signature);
        self.transition(Operation::Sign);
        Ok(())
    }

    /// Timestamps the signature value with the configured authority over HTTP.
    pub async fn timestamp(&mut self) -> Result<()> {
        self.state.check(Operation::Timestamp)?;
        if self.timestamp_url.is_none() {
            return Err(PackagerError::MissingTimestampUrl);
        }

        self.timestamp_with(&HttpTransport::new()?).await
    }

    /// Timestamps the signature value with the configured authority over the given transport.
    pub async fn timestamp_with<T: TimestampTransport>(&mut self, transport: &T) -> Result<()> {
        self.state.check(Operation::Timestamp)?;

        let url = self.timestamp_url.as_deref().ok_or(PackagerError::MissingTimestampUrl)?;
        let signature = self.signature.as_deref().ok_or(PackagerError::SignatureOrder {
            operation: Operation::Timestamp,
            state: self.state,
        })?;

        let message = template::signature_value(&base64_wrapped(signature));
        let digest = Hasher::digest_once(self.timestamp_digest, message.as_bytes());

        let timestamper = SecurityTimestamper::with_transport(url, transport);
        let token = timestamper.timestamp(&digest, self.timestamp_digest).await?;

        self.timestamp = Some(token);
        self.transition(Operation::Timestamp);
        Ok(())
    }

    /// Encodes the signature document.
    ///
    /// This may be called more than once and doesn't advance the state.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.state.check(Operation::Encode)?;

        let order = PackagerError::SignatureOrder { operation: Operation::Encode, state: self.state };
        let (Some(manifest_digest), Some(signature), Some(key_info)) =
            (&self.manifest_digest, &self.signature, &self.key_info)
        else {
            return Err(order);
        };

        let timestamps = match &self.timestamp {
            Some(token) => self.timestamp_objects(token),
            None => String::new(),
        };

        let document = template::Document {
            signature_method: self.signature_algorithm.xml_uri(),
            manifest_digest_b64: &base64_wrapped(manifest_digest),
            signature_b64: &base64_wrapped(signature),
            key_info,
            references: &self.references.concat(),
            timestamps: &timestamps,
        };

        Ok(document.render().into_bytes())
    }

    fn timestamp_uris(&self) -> Vec<&'static str> {
        let mut uris = Vec::with_capacity(2);
        if self.timestamp_uri_signature {
            uris.push(TIMESTAMP_URI_SIGNATURE);
        }
        if self.timestamp_uri_package {
            uris.push(TIMESTAMP_URI_PACKAGE);
        }
        uris
    }

    fn timestamp_objects(&self, token: &[u8]) -> String {
        let token = base64_wrapped(token);
        self.timestamp_uris().iter().map(|uri| template::timestamp_object(uri, &token)).collect::<Vec<_>>().join("\n")
    }

    fn transition(&mut self, operation: Operation) {
        let next = self.state.after(operation);
        tracing::debug!(%operation, from = %self.state, to = %next, "signature state transition");
        self.state = next;
    }
}
