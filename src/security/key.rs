// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::Sha1;
use sha2::Sha256;

use crate::error::{PackagerError, Result};
use crate::hasher::DigestAlgorithm;

/// A private key able to sign data over a chosen digest.
pub trait PrivateKey: Send + Sync {
    /// Signs the data, hashing it with the given digest algorithm first.
    fn sign(&self, data: &[u8], digest: DigestAlgorithm) -> Result<Vec<u8>>;
}

/// An RSA private key producing RSASSA-PKCS1-v1_5 signatures.
#[derive(Clone)]
pub struct RsaPrivateKey {
    inner: rsa::RsaPrivateKey,
}

impl RsaPrivateKey {
    /// Wraps an already decoded key.
    pub fn new(inner: rsa::RsaPrivateKey) -> Self {
        Self { inner }
    }

    /// Decodes an unencrypted PEM key, either PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = match rsa::RsaPrivateKey::from_pkcs8_pem(pem) {
            Ok(inner) => inner,
            Err(pkcs8) => rsa::RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|pkcs1| PackagerError::KeyDecode(format!("{pkcs8}; {pkcs1}")))?,
        };

        Ok(Self { inner })
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey").finish_non_exhaustive()
    }
}

impl PrivateKey for RsaPrivateKey {
    fn sign(&self, data: &[u8], digest: DigestAlgorithm) -> Result<Vec<u8>> {
        let signature = match digest {
            DigestAlgorithm::Sha1 => SigningKey::<Sha1>::new(self.inner.clone()).try_sign(data)?,
            DigestAlgorithm::Sha256 => SigningKey::<Sha256>::new(self.inner.clone()).try_sign(data)?,
        };

        Ok(signature.to_vec())
    }
}
