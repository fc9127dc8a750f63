// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use std::path::PathBuf;

use thiserror::Error;

use crate::signature::state::{Operation, State};

/// A Result type alias over PackagerError to minimise repetition.
pub type Result<V> = std::result::Result<V, PackagerError>;

/// An enum of possible errors and their descriptions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PackagerError {
    #[error("data length and compressed size must match (data: {actual}, compressed size: {expected})")]
    DataLengthMismatch { expected: u32, actual: usize },
    #[error("data required when compressed size not zero")]
    DataRequired,
    #[error("patch data must fill the reserved entry exactly (reserved: {expected}, data: {actual})")]
    PatchLengthMismatch { expected: u32, actual: usize },
    #[error("entry path length exceeds the maximum value of a u16")]
    FileNameTooLarge,
    #[error("entry comment length exceeds the maximum value of a u16")]
    CommentTooLarge,
    #[error("archive comment length exceeds the maximum value of a u16")]
    ArchiveCommentTooLarge,
    #[error("extra field length exceeds the maximum value of a u16")]
    ExtraFieldTooLarge,
    #[error("entry data length exceeds the maximum value of a u32")]
    EntryTooLarge,
    #[error("archive offset exceeds the maximum value of a u32")]
    OffsetTooLarge,
    #[error("archive entry count exceeds the maximum value of a u16")]
    TooManyEntries,

    #[error("an upstream writer returned an error: {0}")]
    UpstreamWriteError(#[from] std::io::Error),

    #[error("signature operation '{operation}' is not permitted while {state}")]
    SignatureOrder { operation: Operation, state: State },

    #[error("certificate not set")]
    MissingCertificate,
    #[error("private key not set")]
    MissingPrivateKey,
    #[error("timestamp url not set")]
    MissingTimestampUrl,
    #[error("keystore not set")]
    MissingKeystore,

    #[error("unable to decode private key: {0}")]
    KeyDecode(String),
    #[error("unable to produce signature: {0}")]
    Sign(#[from] rsa::signature::Error),
    #[error("unable to decode certificate: {0}")]
    CertificateDecode(String),

    #[error("timestamp request failed: {0}")]
    TimestampRequest(#[from] reqwest::Error),
    #[error("unexpected timestamp authority status code: {0}")]
    TimestampStatus(u16),
    #[error("malformed timestamp response: {0}")]
    TimestampDecode(&'static str),
    #[error("timestamp response is missing the pki status")]
    MissingPkiStatus,
    #[error("unexpected pki status length: {0}")]
    UnexpectedPkiStatusLength(usize),
    #[error("unexpected pki status: {0}")]
    UnexpectedPkiStatus(u8),
    #[error("timestamp response is missing the timestamp token")]
    MissingTstInfo,

    #[error("packager not open")]
    NotOpen,
    #[error("packager already open")]
    AlreadyOpen,
    #[error("resources must be added sequentially")]
    ResourceBusy,
    #[error("cannot add symlink: {0}")]
    SymlinkNotSupported(PathBuf),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(PathBuf),
}
