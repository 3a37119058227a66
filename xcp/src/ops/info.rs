// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain registration details. Only the expiry date is read; the registrar
// sends it as local time with no zone.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{request, required_scalar};
use crate::error::{Error, Result};
use crate::transport::XcpClient;
use crate::value::{Map, Value};

const EXPIRY_PATH: &str = "attributes/expiredate";
/// Registrar timestamp layout, e.g. `2027-03-14 09:26:53`.
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfo {
    /// Registration expiry, in the registrar's local time (no zone is given).
    pub expiry: NaiveDateTime,
}

pub(crate) fn parse_info(response: &Map) -> Result<DomainInfo> {
    let raw = required_scalar(response, EXPIRY_PATH)?;
    let expiry =
        NaiveDateTime::parse_from_str(raw, EXPIRY_FORMAT).map_err(|_| Error::InvalidField {
            path: EXPIRY_PATH.to_string(),
            value: raw.to_string(),
        })?;
    Ok(DomainInfo { expiry })
}

impl XcpClient {
    /// Fetch registration details for `domain`.
    pub async fn get_info(&self, domain: &str) -> Result<DomainInfo> {
        let req = request(
            "DOMAIN",
            "GET",
            Value::map([("domain", domain), ("type", "all_info")]),
        );
        let response = self.submit(&req).await?;
        parse_info(&response)
    }
}
