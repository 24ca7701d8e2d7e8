// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tree model of a parsed JSON document.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// One value in a parsed document tree.
///
/// A `Node` is never mutated by the comparator, so a parsed document can be
/// shared read-only between comparison runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Object(Fields),
    Array(Vec<Node>),
    Scalar(Scalar),
}

/// Leaf values of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

/// Coarse kind of a [`Node`], used to drive the comparator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    Scalar,
}

/// Object fields in document order with keyed lookup.
///
/// Equality ignores key order, which is presentation only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(IndexMap<String, Node>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Node)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Object(_) => Kind::Object,
            Node::Array(_) => Kind::Array,
            Node::Scalar(_) => Kind::Scalar,
        }
    }

    /// JSON type name, as used in failure messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Object(_) => "object",
            Node::Array(_) => "array",
            Node::Scalar(scalar) => scalar.type_name(),
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Node::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Field lookup on objects; `None` for any other kind.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Indexed access on arrays; `None` for any other kind.
    pub fn at(&self, idx: usize) -> Option<&Node> {
        self.as_array().and_then(|items| items.get(idx))
    }

    /// Object keys in document order. Empty for arrays and scalars.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Node::Object(fields) => fields.keys().collect(),
            _ => vec![],
        }
    }

    /// Number of fields or elements; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Node::Object(fields) => fields.len(),
            Node::Array(items) => items.len(),
            Node::Scalar(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// String form used by regular expression matching: string contents
    /// without quotes, everything else as compact JSON.
    pub fn text(&self) -> String {
        match self {
            Node::Scalar(Scalar::String(s)) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::String(_) => "string",
            Scalar::Number(_) => "number",
            Scalar::Bool(_) => "boolean",
            Scalar::Null => "null",
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => write!(f, "null"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Object => write!(f, "object"),
            Kind::Array => write!(f, "array"),
            Kind::Scalar => write!(f, "scalar"),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

/// Turns raw document text into a [`Node`] tree.
///
/// Implement this to compare documents that are not stored as JSON text.
pub trait DocumentParser {
    fn parse(&self, text: &str) -> Result<Node, Box<dyn std::error::Error + Send + Sync>>;
}

/// The default parser, backed by `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn parse(&self, text: &str) -> Result<Node, Box<dyn std::error::Error + Send + Sync>> {
        Ok(serde_json::from_str(text)?)
    }
}
