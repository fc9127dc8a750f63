// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Incremental message digests shared by the package hash and the signature manifest.

use sha1::Sha1;
use sha2::{Digest, Sha256};

/// A digest algorithm supported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the length of a digest in bytes.
    pub fn bytes(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    /// Returns the XML digest method URI.
    pub fn xml_uri(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "http://www.w3.org/2000/09/xmldsig#sha1",
            DigestAlgorithm::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
        }
    }

    /// Returns the ASN.1 object identifier arcs.
    pub fn oid(&self) -> &'static [u32] {
        match self {
            DigestAlgorithm::Sha1 => &[1, 3, 14, 3, 2, 26],
            DigestAlgorithm::Sha256 => &[2, 16, 840, 1, 101, 3, 4, 2, 1],
        }
    }
}

/// An incremental hasher over one of the supported [`DigestAlgorithm`]s.
///
/// [`Hasher::digest()`] finalises and resets the state, so any data fed afterwards starts a fresh computation.
#[derive(Clone)]
pub enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
}

impl Hasher {
    /// Constructs a new hasher for the given algorithm.
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha1 => Hasher::Sha1(Sha1::new()),
            DigestAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
        }
    }

    /// Returns this hasher's algorithm.
    pub fn algorithm(&self) -> DigestAlgorithm {
        match self {
            Hasher::Sha1(_) => DigestAlgorithm::Sha1,
            Hasher::Sha256(_) => DigestAlgorithm::Sha256,
        }
    }

    /// Returns the length of the digest in bytes.
    pub fn bytes(&self) -> usize {
        self.algorithm().bytes()
    }

    /// Discards any data fed so far.
    pub fn reset(&mut self) {
        match self {
            Hasher::Sha1(inner) => Digest::reset(inner),
            Hasher::Sha256(inner) => Digest::reset(inner),
        }
    }

    /// Feeds data into the hasher.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        match self {
            Hasher::Sha1(inner) => Digest::update(inner, data),
            Hasher::Sha256(inner) => Digest::update(inner, data),
        }
    }

    /// Finalises the digest of all data fed since the last reset.
    pub fn digest(&mut self) -> Vec<u8> {
        match self {
            Hasher::Sha1(inner) => inner.finalize_reset().to_vec(),
            Hasher::Sha256(inner) => inner.finalize_reset().to_vec(),
        }
    }

    /// Computes the digest of a single buffer.
    pub fn digest_once(algorithm: DigestAlgorithm, data: impl AsRef<[u8]>) -> Vec<u8> {
        let mut hasher = Self::new(algorithm);
        hasher.update(data);
        hasher.digest()
    }
}
