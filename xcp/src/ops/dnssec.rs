// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! DNSSEC delegation signer (DS) records held at the registry
//!
//! The registrar stores DS records as a list of maps under
//! `attributes/dnssec`. Lists come back from the decoder as maps keyed
//! "0".."n-1", so records are re-ordered by their numeric index.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ensure_success, request, required_integer, required_scalar};
use crate::error::{Error, Result};
use crate::transport::XcpClient;
use crate::value::{Lookup, Map, Value};

const RECORDS_PATH: &str = "attributes/dnssec";

/// One DS record: `<key tag> <algorithm> <digest type> <digest>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsRecord {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

impl DsRecord {
    fn to_value(&self) -> Value {
        Value::map([
            ("key_tag", self.key_tag.to_string()),
            ("algorithm", self.algorithm.to_string()),
            ("digest_type", self.digest_type.to_string()),
            ("digest", self.digest.clone()),
        ])
    }

    fn from_map(index: &str, record: &Map) -> Result<Self> {
        let field = |name: &str| format!("{}/{}/{}", RECORDS_PATH, index, name);
        Ok(Self {
            key_tag: required_integer(record, "key_tag").map_err(|e| at(e, field("key_tag")))?,
            algorithm: required_integer(record, "algorithm")
                .map_err(|e| at(e, field("algorithm")))?,
            digest_type: required_integer(record, "digest_type")
                .map_err(|e| at(e, field("digest_type")))?,
            digest: required_scalar(record, "digest")
                .map_err(|e| at(e, field("digest")))?
                .to_string(),
        })
    }
}

/// Report field errors with their full response path.
fn at(err: Error, path: String) -> Error {
    match err {
        Error::MissingField(_) => Error::MissingField(path),
        Error::InvalidField { value, .. } => Error::InvalidField { path, value },
        other => other,
    }
}

/// Order index keys numerically; anything non-numeric goes last, lexically.
fn index_order(key: &str) -> (u64, &str) {
    (key.parse().unwrap_or(u64::MAX), key)
}

pub(crate) fn parse_records(response: &Map) -> Result<Vec<DsRecord>> {
    let records = response
        .get_map(RECORDS_PATH)
        .ok_or_else(|| Error::MissingField(RECORDS_PATH.to_string()))?;

    let mut entries: Vec<(&String, &Value)> = records.iter().collect();
    entries.sort_by(|(a, _), (b, _)| index_order(a).cmp(&index_order(b)));

    entries
        .into_iter()
        .map(|(index, value)| {
            let record = value.as_map().ok_or_else(|| Error::InvalidField {
                path: format!("{}/{}", RECORDS_PATH, index),
                value: value.as_scalar().unwrap_or("<list>").to_string(),
            })?;
            DsRecord::from_map(index, record)
        })
        .collect()
}

pub(crate) fn set_request(domain: &str, records: &[DsRecord]) -> Map {
    request(
        "domain",
        "modify",
        Value::map([
            ("domain", Value::from(domain)),
            ("data", Value::from("dnssec")),
            ("dnssec", Value::list(records.iter().map(DsRecord::to_value))),
        ]),
    )
}

impl XcpClient {
    /// Fetch the DS records the registry holds for `domain`.
    pub async fn get_ds_records(&self, domain: &str) -> Result<Vec<DsRecord>> {
        let req = request(
            "DOMAIN",
            "GET",
            Value::map([("domain", domain), ("type", "dnssec")]),
        );
        let response = self.submit(&req).await?;
        parse_records(&response)
    }

    /// Replace the DS records for `domain`. An empty slice removes them all.
    pub async fn set_ds_records(&self, domain: &str, records: &[DsRecord]) -> Result<()> {
        let response = self.submit(&set_request(domain, records)).await?;
        ensure_success(&response)?;
        info!(domain, count = records.len(), "updated DS records");
        Ok(())
    }
}
