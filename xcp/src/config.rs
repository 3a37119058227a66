// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Configuration for the XCP client.
//!
//! Environment variables read by [`ClientConfig::from_env`]:
//!
//! - `XCP_ENDPOINT`: registrar endpoint (default: the OpenSRS test environment)
//! - `XCP_USERNAME`: reseller username (required)
//! - `XCP_PRIVATE_KEY`: reseller private key (required)
//! - `XCP_TIMEOUT_SECS`: HTTP timeout in seconds (default: 30)

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// OpenSRS live environment.
pub const LIVE_ENDPOINT: &str = "https://rr-n1-tor.opensrs.net:55443";
/// OpenSRS test environment.
pub const TEST_ENDPOINT: &str = "https://horizon.opensrs.net:55443";

/// Connection settings for one reseller account.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Registrar endpoint URL (default: test environment)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Reseller username, sent as `X-Username`
    pub username: String,

    /// Shared private key used to sign requests; never sent
    pub private_key: String,

    /// Whole-request HTTP timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    TEST_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            username: String::new(),
            private_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            private_key: private_key.into(),
            ..Default::default()
        }
    }

    /// Load and validate configuration from `XCP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), but unset credentials are left
    /// empty for the caller to fill in before calling [`validate`](Self::validate).
    pub fn from_env_partial() -> Result<Self> {
        Self::partial_from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self::partial_from_lookup(&var)?;
        for (name, value) in [
            ("XCP_USERNAME", &config.username),
            ("XCP_PRIVATE_KEY", &config.private_key),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("{} is not set", name)));
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn partial_from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match var("XCP_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("XCP_TIMEOUT_SECS is not a number: {:?}", v)))?,
            None => default_timeout_secs(),
        };

        Ok(Self {
            endpoint: var("XCP_ENDPOINT").unwrap_or_else(default_endpoint),
            username: var("XCP_USERNAME").unwrap_or_default(),
            private_key: var("XCP_PRIVATE_KEY").unwrap_or_default(),
            timeout_secs,
        })
    }

    /// Check credentials are present and the endpoint is an http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::Config("username is empty".into()));
        }
        if self.private_key.is_empty() {
            return Err(Error::Config("private key is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least one second".into()));
        }
        let url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {}", self.endpoint, e)))?;
        match url.scheme() {
            "https" | "http" => Ok(()),
            other => Err(Error::Config(format!(
                "endpoint scheme must be http or https, got {:?}",
                other
            ))),
        }
    }

    /// Get the HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("private_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn env_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("XCP_USERNAME", "reseller"),
            ("XCP_PRIVATE_KEY", "abc123"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, TEST_ENDPOINT);
        assert_eq!(config.username, "reseller");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("XCP_ENDPOINT", LIVE_ENDPOINT),
            ("XCP_USERNAME", "reseller"),
            ("XCP_PRIVATE_KEY", "abc123"),
            ("XCP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, LIVE_ENDPOINT);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn missing_credentials() {
        let err = ClientConfig::from_lookup(lookup(&[("XCP_USERNAME", "reseller")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("XCP_PRIVATE_KEY")));

        let err = ClientConfig::from_lookup(lookup(&[
            ("XCP_USERNAME", ""),
            ("XCP_PRIVATE_KEY", "abc123"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("XCP_USERNAME")));
    }

    #[test]
    fn partial_leaves_credentials_to_caller() {
        let mut config =
            ClientConfig::partial_from_lookup(lookup(&[("XCP_PRIVATE_KEY", "abc123")])).unwrap();
        assert!(config.username.is_empty());
        assert!(config.validate().is_err());
        config.username = "from-flag".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("XCP_USERNAME", "reseller"),
            ("XCP_PRIVATE_KEY", "abc123"),
            ("XCP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_endpoint() {
        let mut config = ClientConfig::new("ftp://example.net", "u", "k");
        assert!(config.validate().is_err());
        config.endpoint = "not a url".into();
        assert!(config.validate().is_err());
        config.endpoint = "http://127.0.0.1:55443".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_private_key() {
        let config = ClientConfig::new(TEST_ENDPOINT, "reseller", "very-secret-key");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("reseller"));
        assert!(!rendered.contains("very-secret-key"));
    }
}
