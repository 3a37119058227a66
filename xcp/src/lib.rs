// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OpenSRS XCP client: OPS envelope codec, request signing and transport
//
// Request path:
//   Value tree --encode--> OPS envelope --sign--> POST (X-Username, X-Signature)
//   response body --decode--> Map --Lookup--> fields
//
// Signing: two-round keyed MD5 over the exact request body. This is a legacy
// interoperability requirement of the registrar, not a security property.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ops;
pub mod signer;
pub mod transport;
pub mod value;

pub use config::ClientConfig;
pub use decode::{decode, decode_bytes, DecodeError};
pub use encode::{encode_assoc, encode_envelope};
pub use error::{Error, Result};
pub use ops::{DomainInfo, DsRecord};
pub use signer::Signer;
pub use transport::{TransportError, XcpClient};
pub use value::{Lookup, Map, Value};
