// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OPS envelope decoder: a stack machine over quick-xml events.
//
// The wire carries no type information beyond the container element name, and
// `dt_assoc` / `dt_array` are treated alike: both become a `Map` keyed by their
// items' `key` attributes. An encoded list therefore comes back as a map with
// keys "0".."n-1". Callers read list-shaped data through those string indices.
//
// Elements outside the codec vocabulary (OPS_envelope, header, body,
// data_block, ...) are skipped, so a full envelope and a bare <dt_assoc>
// decode to the same tree.

use std::mem;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::value::{Map, Value};

const DT_ASSOC: &[u8] = b"dt_assoc";
const DT_ARRAY: &[u8] = b"dt_array";
const ITEM: &[u8] = b"item";
const KEY_ATTR: &str = "key";

/// Deepest container nesting accepted. Dropping or comparing a `Value` tree
/// recurses once per level, so deeper input is rejected while decoding.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed OPS envelope: {0}")]
    MalformedInput(String),

    #[error("no dt_assoc or dt_array found in response")]
    NoRootContainer,
}

/// Decode UTF-8 bytes, e.g. an HTTP response body.
pub fn decode_bytes(xml: &[u8]) -> Result<Map, DecodeError> {
    let text = std::str::from_utf8(xml)
        .map_err(|e| DecodeError::MalformedInput(format!("invalid UTF-8: {}", e)))?;
    decode(text)
}

/// Decode an OPS document (enveloped or bare) into its root container.
///
/// The root is the first `dt_assoc`/`dt_array` in the document. Nothing is
/// returned on failure; there is no partial tree.
pub fn decode(xml: &str) -> Result<Map, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text(false);
    config.expand_empty_elements = true;
    // The envelope closes <OPS_envelope> with </header>; balance is checked
    // by the machine instead.
    config.check_end_names = false;

    let mut machine = Machine::default();
    loop {
        let event = reader.read_event().map_err(|e| {
            DecodeError::MalformedInput(format!("{} at byte {}", e, reader.buffer_position()))
        })?;
        match event {
            Event::Start(start) => match start.local_name().as_ref() {
                DT_ASSOC => machine.open_container(Element::Assoc)?,
                DT_ARRAY => machine.open_container(Element::Array)?,
                ITEM => machine.open_item(item_key(&start)?)?,
                _ => machine.open.push(Element::Wrapper),
            },
            Event::End(end) => match end.local_name().as_ref() {
                DT_ASSOC => machine.close_container(Element::Assoc)?,
                DT_ARRAY => machine.close_container(Element::Array)?,
                ITEM => machine.close_item()?,
                _ => machine.close_wrapper()?,
            },
            Event::Text(text) => {
                if machine.simple {
                    let text = text
                        .unescape()
                        .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
                    machine.text.push_str(&text);
                }
            }
            Event::CData(cdata) => {
                if machine.simple {
                    let bytes = cdata.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
                    machine.text.push_str(text);
                }
            }
            Event::Eof => break,
            // Declaration, DOCTYPE, comments, processing instructions.
            _ => {}
        }
    }
    machine.finish()
}

fn item_key(start: &BytesStart<'_>) -> Result<String, DecodeError> {
    let attr = start
        .try_get_attribute(KEY_ATTR)
        .map_err(|e| DecodeError::MalformedInput(e.to_string()))?
        .ok_or_else(|| DecodeError::MalformedInput("item without key attribute".into()))?;
    let key = attr
        .unescape_value()
        .map_err(|e| DecodeError::MalformedInput(e.to_string()))?;
    Ok(key.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Wrapper,
    Assoc,
    Array,
    Item,
}

impl Element {
    fn tag(self) -> &'static str {
        match self {
            Element::Wrapper => "wrapper element",
            Element::Assoc => "dt_assoc",
            Element::Array => "dt_array",
            Element::Item => "item",
        }
    }
}

/// Where a container goes once it is closed.
#[derive(Debug)]
enum Attach {
    Root,
    Parent(String),
    /// A top-level container after the root; its content is dropped.
    Discard,
}

#[derive(Debug)]
struct Frame {
    attach: Attach,
    map: Map,
}

#[derive(Debug, Default)]
struct Machine {
    /// Containers under construction, innermost last. Each frame owns its map
    /// until it is closed and moved into its parent.
    containers: Vec<Frame>,
    /// Every open element, wrappers included, innermost last.
    open: Vec<Element>,
    root: Option<Map>,
    root_seen: bool,
    pending_key: Option<String>,
    text: String,
    /// Inside an item that has not (yet) opened a nested container.
    simple: bool,
}

impl Machine {
    fn innermost_vocabulary(&self) -> Option<Element> {
        self.open
            .iter()
            .rev()
            .copied()
            .find(|e| *e != Element::Wrapper)
    }

    fn open_container(&mut self, kind: Element) -> Result<(), DecodeError> {
        if self.containers.len() >= MAX_DEPTH {
            return Err(DecodeError::MalformedInput(format!(
                "containers nested deeper than {}",
                MAX_DEPTH
            )));
        }
        let attach = if self.containers.is_empty() {
            if self.root_seen {
                Attach::Discard
            } else {
                self.root_seen = true;
                Attach::Root
            }
        } else {
            if self.innermost_vocabulary() != Some(Element::Item) {
                return Err(DecodeError::MalformedInput(format!(
                    "{} directly inside a container, expected item",
                    kind.tag()
                )));
            }
            let key = self.pending_key.take().ok_or_else(|| {
                DecodeError::MalformedInput(format!("{} inside item with no key", kind.tag()))
            })?;
            self.simple = false;
            Attach::Parent(key)
        };

        self.containers.push(Frame {
            attach,
            map: Map::new(),
        });
        self.open.push(kind);
        Ok(())
    }

    fn close_container(&mut self, kind: Element) -> Result<(), DecodeError> {
        self.expect_innermost(kind)?;
        self.open.pop();
        self.simple = false;

        let frame = self.containers.pop().ok_or_else(|| {
            DecodeError::MalformedInput(format!("unbalanced </{}>", kind.tag()))
        })?;
        match frame.attach {
            Attach::Root => self.root = Some(frame.map),
            Attach::Parent(key) => {
                if let Some(parent) = self.containers.last_mut() {
                    parent.map.insert(key, Value::Map(frame.map));
                }
            }
            Attach::Discard => {}
        }
        Ok(())
    }

    fn open_item(&mut self, key: String) -> Result<(), DecodeError> {
        match self.innermost_vocabulary() {
            Some(Element::Assoc | Element::Array) => {}
            _ => {
                return Err(DecodeError::MalformedInput(format!(
                    "item {:?} outside dt_assoc/dt_array",
                    key
                )))
            }
        }
        self.pending_key = Some(key);
        self.text.clear();
        self.simple = true;
        self.open.push(Element::Item);
        Ok(())
    }

    fn close_item(&mut self) -> Result<(), DecodeError> {
        self.expect_innermost(Element::Item)?;
        self.open.pop();

        if self.simple {
            self.simple = false;
            let key = self
                .pending_key
                .take()
                .ok_or_else(|| DecodeError::MalformedInput("item with no key".into()))?;
            let text = mem::take(&mut self.text);
            if let Some(frame) = self.containers.last_mut() {
                frame.map.insert(key, Value::Scalar(text));
            }
        }
        Ok(())
    }

    fn close_wrapper(&mut self) -> Result<(), DecodeError> {
        match self.open.pop() {
            Some(Element::Wrapper) => Ok(()),
            Some(other) => Err(DecodeError::MalformedInput(format!(
                "unexpected close tag inside open {}",
                other.tag()
            ))),
            None => Err(DecodeError::MalformedInput(
                "close tag with no open element".into(),
            )),
        }
    }

    fn expect_innermost(&self, kind: Element) -> Result<(), DecodeError> {
        match self.open.last() {
            Some(open) if *open == kind => Ok(()),
            Some(open) => Err(DecodeError::MalformedInput(format!(
                "</{}> does not close open {}",
                kind.tag(),
                open.tag()
            ))),
            None => Err(DecodeError::MalformedInput(format!(
                "</{}> with no open element",
                kind.tag()
            ))),
        }
    }

    fn finish(self) -> Result<Map, DecodeError> {
        if !self.root_seen {
            return Err(DecodeError::NoRootContainer);
        }
        if let Some(open) = self.open.last() {
            return Err(DecodeError::MalformedInput(format!(
                "unexpected end of input inside {}",
                open.tag()
            )));
        }
        self.root.ok_or(DecodeError::NoRootContainer)
    }
}
