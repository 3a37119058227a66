// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XCP transport: encode -> sign -> POST -> decode.
//
// One request per call, no retries. Retry policy belongs to the caller.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::decode::decode_bytes;
use crate::encode::encode_envelope;
use crate::error::Result;
use crate::signer::Signer;
use crate::value::Map;

pub const HEADER_USERNAME: &str = "X-Username";
pub const HEADER_SIGNATURE: &str = "X-Signature";
pub const CONTENT_TYPE_XML: &str = "text/xml";

/// Longest response body quoted back in a [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("registrar returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Signed XCP client for one reseller account.
///
/// Holds only read-only configuration and a `reqwest::Client`, so a single
/// instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct XcpClient {
    endpoint: String,
    username: String,
    signer: Signer,
    client: reqwest::Client,
}

impl XcpClient {
    /// Create a client from validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TransportError::Build)?;

        Ok(Self {
            endpoint: config.endpoint,
            username: config.username,
            signer: Signer::new(config.private_key),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request envelope and decode the response envelope.
    pub async fn submit(&self, request: &Map) -> Result<Map> {
        let body = encode_envelope(request);
        let signature = self.signer.sign(&body);
        debug!(
            endpoint = %self.endpoint,
            object = request_field(request, "object"),
            action = request_field(request, "action"),
            bytes = body.len(),
            "submitting XCP request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_XML)
            .header(HEADER_USERNAME, &self.username)
            .header(HEADER_SIGNATURE, signature)
            .body(body)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate(&mut body, MAX_ERROR_BODY);
            warn!(status = %status, "registrar rejected XCP request");
            return Err(TransportError::Status { status, body }.into());
        }

        let bytes = response.bytes().await.map_err(TransportError::Body)?;
        let decoded = decode_bytes(&bytes)?;
        debug!(status = %status, keys = decoded.len(), "decoded XCP response");
        Ok(decoded)
    }
}

fn request_field<'a>(request: &'a Map, key: &str) -> &'a str {
    request
        .get(key)
        .and_then(|v| v.as_scalar())
        .unwrap_or("-")
}

fn truncate(text: &mut String, max: usize) {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let config = ClientConfig::new("http://localhost:55443", "reseller", "key");
        let client = XcpClient::new(config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:55443");
    }

    #[test]
    fn client_rejects_invalid_config() {
        let config = ClientConfig::new("http://localhost:55443", "reseller", "");
        assert!(XcpClient::new(config).is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let config = ClientConfig::new("http://localhost:55443", "reseller", "topsecret");
        let client = XcpClient::new(config).unwrap();
        assert!(!format!("{:?}", client).contains("topsecret"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let mut s = "ééé".to_string();
        truncate(&mut s, 3);
        assert_eq!(s, "é");
        let mut s = "short".to_string();
        truncate(&mut s, 512);
        assert_eq!(s, "short");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Take a free port, then close it again.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = format!("http://127.0.0.1:{}/", port);
        let config = ClientConfig::new(endpoint, "reseller", "key");
        let client = XcpClient::new(config).unwrap();
        let err = client.submit(&Map::new()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Transport(TransportError::Request(_))
        ));
    }
}
