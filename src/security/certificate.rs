// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use x509_certificate::CapturedX509Certificate;

use crate::error::{PackagerError, Result};

/// A certificate able to supply the chain embedded in a signature's key info.
pub trait Certificate: Send + Sync {
    /// Returns the DER encoding of each certificate in the chain, leaf first.
    fn encode_certchain(&self) -> Result<Vec<Vec<u8>>>;
}

/// A parsed X.509 certificate which keeps the exact DER it was decoded from.
///
/// Only the certificate itself is ever emitted as its chain, intermediates aren't resolved.
#[derive(Debug, Clone)]
pub struct X509Certificate {
    inner: CapturedX509Certificate,
}

impl X509Certificate {
    /// Decodes a certificate from its DER encoding.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self> {
        let inner = CapturedX509Certificate::from_der(der.into())
            .map_err(|e| PackagerError::CertificateDecode(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Decodes a certificate from a PEM `CERTIFICATE` block.
    ///
    /// Blocks with any other label, such as a private key, are rejected.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = CapturedX509Certificate::from_pem(pem.as_bytes())
            .map_err(|e| PackagerError::CertificateDecode(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Returns the certificate's DER encoding.
    pub fn der(&self) -> &[u8] {
        self.inner.constructed_data()
    }
}

impl Certificate for X509Certificate {
    fn encode_certchain(&self) -> Result<Vec<Vec<u8>>> {
        Ok(vec![self.der().to_vec()])
    }
}
