// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XCP request signature (sent as the X-Signature header).
//
//   round1    = hex(MD5(body || key))
//   signature = hex(MD5(round1 || key))
//
// Round two hashes the lowercase hex *text* of round one, not its raw digest
// bytes. MD5 is fixed by the registrar's wire protocol and gives no security
// margin of its own; the private key never leaves this process.

use std::fmt;

/// Length of a signature in hex characters.
pub const SIGNATURE_LEN: usize = 32;

#[derive(Clone)]
pub struct Signer {
    private_key: String,
}

impl Signer {
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
        }
    }

    /// Sign the exact request body that will be sent on the wire.
    pub fn sign(&self, body: &str) -> String {
        let round1 = self.keyed_md5_hex(body.as_bytes());
        self.keyed_md5_hex(round1.as_bytes())
    }

    /// Check a signature received alongside `body`. Hex case is ignored.
    pub fn verify(&self, body: &str, signature: &str) -> bool {
        signature.len() == SIGNATURE_LEN && self.sign(body).eq_ignore_ascii_case(signature)
    }

    fn keyed_md5_hex(&self, data: &[u8]) -> String {
        let mut ctx = md5::Context::new();
        ctx.consume(data);
        ctx.consume(self.private_key.as_bytes());
        hex::encode(ctx.compute().0)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("private_key", &"<redacted>")
            .finish()
    }
}
