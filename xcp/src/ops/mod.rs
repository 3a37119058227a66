// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain operations built on `XcpClient::submit`.
//
// Each one builds a request tree, submits it, and reads named paths out of the
// response. Missing fields are reported, never defaulted.

pub mod dnssec;
pub mod info;
pub mod lock;

pub use dnssec::DsRecord;
pub use info::DomainInfo;

use tracing::warn;

use crate::error::{Error, Result};
use crate::value::{Lookup, Map, Value};

pub const PROTOCOL: &str = "XCP";

/// Build a request envelope root: `{protocol, object, action, attributes}`.
pub fn request(object: &str, action: &str, attributes: Value) -> Map {
    let mut root = Map::new();
    root.insert("protocol".into(), PROTOCOL.into());
    root.insert("object".into(), object.into());
    root.insert("action".into(), action.into());
    root.insert("attributes".into(), attributes);
    root
}

/// Fail with [`Error::Application`] unless the response has `is_success` = "1".
pub fn ensure_success(response: &Map) -> Result<()> {
    if response.get_scalar("is_success") == Some("1") {
        return Ok(());
    }
    let code = response.get_scalar("response_code").map(str::to_string);
    let message = response
        .get_scalar("response_text")
        .unwrap_or_default()
        .to_string();
    warn!(code = code.as_deref().unwrap_or("-"), message = %message, "registrar reported failure");
    Err(Error::Application { code, message })
}

pub(crate) fn required_scalar<'a>(response: &'a Map, path: &str) -> Result<&'a str> {
    response
        .get_scalar(path)
        .ok_or_else(|| Error::MissingField(path.to_string()))
}

/// Integer at `path`, converted into a narrower type.
pub(crate) fn required_integer<T: TryFrom<i64>>(map: &Map, path: &str) -> Result<T> {
    let text = required_scalar(map, path)?;
    text.parse::<i64>()
        .ok()
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| Error::InvalidField {
            path: path.to_string(),
            value: text.to_string(),
        })
}
