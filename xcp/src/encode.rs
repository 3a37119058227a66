// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OPS envelope encoder.
//
// Wire grammar:
//   dt_assoc := "<dt_assoc>" item* "</dt_assoc>"
//   dt_array := "<dt_array>" item* "</dt_array>"
//   item     := "<item key=\"" K "\">" (TEXT | dt_assoc | dt_array) "</item>"
//
// Keys and text are escaped with the five standard XML entities.

use quick_xml::escape::escape;

use crate::value::{Map, Value};

/// Protocol version announced in the envelope header.
pub const PROTOCOL_VERSION: &str = "0.9";

const PREAMBLE_HEAD: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone='yes'?>\n\
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>\n\
<OPS_envelope>\n\
<header><version>";

const PREAMBLE_TAIL: &str = "</version></header>\n<body><data_block>";

// The registrar has always been sent `</header>` here, not `</OPS_envelope>`.
// Keep it byte-for-byte.
const ENVELOPE_CLOSE: &str = "</data_block></body>\n</header>";

/// Serialize `root` inside the full OPS envelope. This is the exact text that
/// gets signed and POSTed.
pub fn encode_envelope(root: &Map) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(PREAMBLE_HEAD);
    out.push_str(PROTOCOL_VERSION);
    out.push_str(PREAMBLE_TAIL);
    write_assoc(root, &mut out);
    out.push_str(ENVELOPE_CLOSE);
    out
}

/// Serialize `map` as a bare `<dt_assoc>` element.
pub fn encode_assoc(map: &Map) -> String {
    let mut out = String::new();
    write_assoc(map, &mut out);
    out
}

fn write_assoc(map: &Map, out: &mut String) {
    out.push_str("<dt_assoc>");
    for (key, value) in map {
        write_item(key, value, out);
    }
    out.push_str("</dt_assoc>");
}

fn write_array(items: &[Value], out: &mut String) {
    out.push_str("<dt_array>");
    for (index, value) in items.iter().enumerate() {
        write_item(&index.to_string(), value, out);
    }
    out.push_str("</dt_array>");
}

fn write_item(key: &str, value: &Value, out: &mut String) {
    out.push_str("<item key=\"");
    out.push_str(&escape(key));
    out.push_str("\">");
    match value {
        Value::Scalar(text) => out.push_str(&escape(text.as_str())),
        Value::Map(map) => write_assoc(map, out),
        Value::List(items) => write_array(items, out),
    }
    out.push_str("</item>");
}
