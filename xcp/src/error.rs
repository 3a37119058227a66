// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Error types for the XCP client

use thiserror::Error;

use crate::decode::DecodeError;
use crate::transport::TransportError;

/// Client error types.
///
/// Decode and transport failures are hard errors and are passed through
/// untouched. Missing or mistyped response fields only become errors once a
/// domain operation decides it cannot do without them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The registrar answered, but with `is_success` other than "1".
    #[error("Registrar error{}: {message}", code_suffix(.code))]
    Application {
        code: Option<String>,
        message: String,
    },

    #[error("Field not found in response: {0}")]
    MissingField(String),

    #[error("Invalid value for {path}: {value:?}")]
    InvalidField { path: String, value: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

fn code_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(" {}", code),
        None => String::new(),
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
