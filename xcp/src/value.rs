// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Schema-less value tree carried inside the OPS envelope.
//
// The wire format only knows three shapes: text, keyed containers (dt_assoc)
// and positional containers (dt_array). A decoded tree never contains
// `Value::List`; see `decode` for why.

use std::collections::BTreeMap;

/// Path separator for [`Lookup`] accessors, e.g. `attributes/dnssec/0/digest`.
pub const PATH_SEPARATOR: char = '/';

/// Keyed container. Keys are unique; a later insert under the same key wins.
pub type Map = BTreeMap<String, Value>;

/// A node in an XCP request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Opaque UTF-8 text.
    Scalar(String),
    /// Keyed container, encoded as `dt_assoc`.
    Map(Map),
    /// Ordered container, encoded as `dt_array` with keys `"0"`, `"1"`, ...
    List(Vec<Value>),
}

impl Value {
    /// Build a `Value::Map` from key/value pairs. Duplicate keys keep the last value.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a `Value::List`, preserving iteration order.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Map(_) | Value::List(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            Value::Scalar(_) | Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            Value::Scalar(_) | Value::Map(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

/// Path-based, non-failing accessors.
///
/// A path is a `/`-separated list of map keys. Every segment but the last must
/// name a nested map; "absent" and "wrong shape" both come back as `None`.
///
/// Keys that themselves contain `/` can be stored and round-tripped, but
/// cannot be reached through a path: the separator is never escaped.
pub trait Lookup {
    /// The root map lookups start from, if any.
    fn root(&self) -> Option<&Map>;

    /// Text at `path`; `None` if any segment is missing or the leaf is not a scalar.
    fn get_scalar(&self, path: &str) -> Option<&str> {
        let (parents, leaf) = match path.rsplit_once(PATH_SEPARATOR) {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };
        let map = match parents {
            Some(parents) => self.get_map(parents)?,
            None => self.root()?,
        };
        map.get(leaf)?.as_scalar()
    }

    /// Base-10 integer at `path`. Unparseable text is treated as not found.
    fn get_integer(&self, path: &str) -> Option<i64> {
        self.get_scalar(path)?.parse().ok()
    }

    /// Nested map at `path`; every segment, the last included, must be a map.
    fn get_map(&self, path: &str) -> Option<&Map> {
        path.split(PATH_SEPARATOR)
            .try_fold(self.root()?, |map, segment| map.get(segment)?.as_map())
    }
}

impl Lookup for Map {
    fn root(&self) -> Option<&Map> {
        Some(self)
    }
}

impl Lookup for Value {
    fn root(&self) -> Option<&Map> {
        self.as_map()
    }
}
