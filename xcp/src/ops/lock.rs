// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Registrar (transfer) lock state. The wire value is "1" for locked and "0"
// for unlocked; nothing else is accepted.

use tracing::info;

use super::{ensure_success, request, required_scalar};
use crate::error::{Error, Result};
use crate::transport::XcpClient;
use crate::value::{Map, Value};

const LOCK_PATH: &str = "attributes/lock_state";

pub(crate) fn parse_lock_state(response: &Map) -> Result<bool> {
    match required_scalar(response, LOCK_PATH)? {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(Error::InvalidField {
            path: LOCK_PATH.to_string(),
            value: other.to_string(),
        }),
    }
}

pub(crate) fn set_request(domain: &str, locked: bool) -> Map {
    request(
        "domain",
        "modify",
        Value::map([
            ("domain", domain),
            ("lock_state", if locked { "1" } else { "0" }),
            ("data", "status"),
        ]),
    )
}

impl XcpClient {
    /// Whether `domain` is currently locked against transfer.
    pub async fn get_lock_state(&self, domain: &str) -> Result<bool> {
        let req = request(
            "DOMAIN",
            "GET",
            Value::map([("domain", domain), ("type", "status")]),
        );
        let response = self.submit(&req).await?;
        parse_lock_state(&response)
    }

    pub async fn set_lock_state(&self, domain: &str, locked: bool) -> Result<()> {
        let response = self.submit(&set_request(domain, locked)).await?;
        ensure_success(&response)?;
        info!(domain, locked, "updated lock state");
        Ok(())
    }
}
