// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::sync::Arc;

use crate::error::{PackagerError, Result};
use crate::security::certificate::{Certificate, X509Certificate};
use crate::security::key::{PrivateKey, RsaPrivateKey};

/// A source of signing material.
pub trait Keystore: Send + Sync {
    /// Returns the signing certificate.
    fn certificate(&self) -> Result<Arc<dyn Certificate>>;

    /// Returns the signing private key.
    fn private_key(&self) -> Result<Arc<dyn PrivateKey>>;
}

/// A keystore loaded from a PEM certificate and a PEM RSA private key.
#[derive(Debug, Clone, Default)]
pub struct PemKeystore {
    certificate: Option<Arc<X509Certificate>>,
    private_key: Option<Arc<RsaPrivateKey>>,
}

impl PemKeystore {
    /// Decodes the certificate and private key.
    pub fn from_pem(certificate: &str, private_key: &str) -> Result<Self> {
        Ok(Self {
            certificate: Some(Arc::new(X509Certificate::from_pem(certificate)?)),
            private_key: Some(Arc::new(RsaPrivateKey::from_pem(private_key)?)),
        })
    }

    /// Discards the loaded material, after which both getters fail.
    pub fn reset(&mut self) {
        self.certificate = None;
        self.private_key = None;
    }
}

impl Keystore for PemKeystore {
    fn certificate(&self) -> Result<Arc<dyn Certificate>> {
        match &self.certificate {
            Some(certificate) => Ok(certificate.clone()),
            None => Err(PackagerError::MissingCertificate),
        }
    }

    fn private_key(&self) -> Result<Arc<dyn PrivateKey>> {
        match &self.private_key {
            Some(private_key) => Ok(private_key.clone()),
            None => Err(PackagerError::MissingPrivateKey),
        }
    }
}
