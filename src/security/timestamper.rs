// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! An RFC 3161 timestamp authority client.
//!
//! The request and response codecs are pure functions over bytes. The network leg sits behind
//! [`TimestampTransport`] so that recorded responses can be replayed.

use std::future::Future;

use crate::error::{PackagerError, Result};
use crate::hasher::DigestAlgorithm;
use crate::security::der::{
    der_boolean, der_children, der_integer_u64, der_null, der_octet_string, der_oid, der_read_tlv, der_sequence,
    TAG_BIT_STRING, TAG_INTEGER, TAG_SEQUENCE, TAG_UTF8_STRING,
};

/// The content type of a DER encoded timestamp request.
pub const TIMESTAMP_QUERY_CONTENT_TYPE: &str = "application/timestamp-query";

/// The user agent sent with every timestamp request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sends an encoded timestamp request and returns the raw response body.
pub trait TimestampTransport {
    fn send(&self, url: &str, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl<T: TimestampTransport> TimestampTransport for &T {
    fn send(&self, url: &str, body: Vec<u8>) -> impl Future<Output = Result<Vec<u8>>> + Send {
        (**self).send(url, body)
    }
}

/// A [`TimestampTransport`] over HTTP(S) POST.
///
/// No timeout is configured, a stalled authority stalls the request.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Constructs a transport over a new client, failing if the TLS backend can't be initialised.
    pub fn new() -> Result<Self> {
        Ok(Self { client: reqwest::Client::builder().build()? })
    }

    /// Constructs a transport over an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TimestampTransport for HttpTransport {
    #[tracing::instrument(skip(self, body))]
    async fn send(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, TIMESTAMP_QUERY_CONTENT_TYPE)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PackagerError::TimestampStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Requests timestamp tokens for digests from a single authority.
#[derive(Debug, Clone)]
pub struct SecurityTimestamper<T = HttpTransport> {
    url: String,
    transport: T,
}

impl SecurityTimestamper<HttpTransport> {
    /// Constructs a timestamper which talks to the authority over HTTP.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(url, HttpTransport::new()?))
    }
}

impl<T: TimestampTransport> SecurityTimestamper<T> {
    /// Constructs a timestamper over a custom transport.
    pub fn with_transport(url: impl Into<String>, transport: T) -> Self {
        Self { url: url.into(), transport }
    }

    /// Returns the authority's URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests a timestamp over an already computed digest, returning the DER encoded token.
    pub async fn timestamp(&self, digest: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
        let request = encode_request(digest, algorithm);
        let response = self.transport.send(&self.url, request).await?;
        decode_response(&response)
    }
}

/// Encodes a `TimeStampReq` with a message imprint and a certificate request, no policy, nonce or extensions.
pub fn encode_request(digest: &[u8], algorithm: DigestAlgorithm) -> Vec<u8> {
    let algorithm_identifier = der_sequence(&[der_oid(algorithm.oid()), der_null()]);
    let message_imprint = der_sequence(&[algorithm_identifier, der_octet_string(digest)]);

    der_sequence(&[der_integer_u64(1), message_imprint, der_boolean(true)])
}

/// Validates a `TimeStampResp` and extracts the DER encoded timestamp token.
///
/// The response must be a single element with nothing following it. Its status info holds an optional status, free
/// text and failure info, in that order. The status must be granted (0) or granted with modifications (1), encoded
/// in a single byte.
pub fn decode_response(response: &[u8]) -> Result<Vec<u8>> {
    let root = der_read_tlv(response)?;
    if root.tag != TAG_SEQUENCE {
        return Err(PackagerError::TimestampDecode("response is not a sequence"));
    }
    if root.raw.len() != response.len() {
        return Err(PackagerError::TimestampDecode("unparsed bytes follow the response"));
    }

    let children = der_children(root.value)?;
    let status_info = match children.first() {
        Some(status_info) if status_info.tag == TAG_SEQUENCE => status_info,
        _ => return Err(PackagerError::TimestampDecode("response is missing its status info")),
    };

    let status = der_children(status_info.value)?;
    let mut members = status.iter().peekable();
    let pki_status = members.next_if(|member| member.tag == TAG_INTEGER);
    let _free_text = members.next_if(|member| member.tag == TAG_UTF8_STRING);
    let _failure_info = members.next_if(|member| member.tag == TAG_BIT_STRING);
    if members.next().is_some() {
        return Err(PackagerError::TimestampDecode("unexpected status info member"));
    }

    let Some(pki_status) = pki_status else {
        return Err(PackagerError::MissingPkiStatus);
    };

    let [code] = pki_status.value else {
        return Err(PackagerError::UnexpectedPkiStatusLength(pki_status.value.len()));
    };

    match code {
        0 => {}
        1 => tracing::warn!("timestamp granted with modifications"),
        other => return Err(PackagerError::UnexpectedPkiStatus(*other)),
    }

    match children.get(1) {
        Some(token) if token.tag == TAG_SEQUENCE => Ok(token.raw.to_vec()),
        _ => Err(PackagerError::MissingTstInfo),
    }
}
