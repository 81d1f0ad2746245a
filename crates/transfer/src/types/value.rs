// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dynamically typed values produced by the schema-directed decoder.
//!
//! Call and event arguments are only known at runtime (from the runtime
//! schema), so they are carried as [`Value`]s and read back through accessors
//! that fail with a [`ValueError`] on a type mismatch instead of panicking.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Number '{0}' is out of range")]
    OutOfRange(String),

    #[error("Unsupported JSON value: {0}")]
    UnsupportedJson(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Number(u128),
    Bool(bool),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Record(Record),
}

/// Named fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.0.push((name.into(), value));
    }

    /// First field called `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn field(&self, name: &str) -> Result<&Value, ValueError> {
        self.get(name)
            .ok_or_else(|| ValueError::MissingField(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Numbers, and decimal strings as produced by JSON inputs.
    pub fn as_u128(&self) -> Result<u128, ValueError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(s) => s
                .parse()
                .map_err(|_| ValueError::OutOfRange(s.clone())),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], ValueError> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch("bytes")),
        }
    }

    pub fn as_list(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(other.mismatch("list")),
        }
    }

    pub fn as_record(&self) -> Result<&Record, ValueError> {
        match self {
            Value::Record(record) => Ok(record),
            other => Err(other.mismatch("record")),
        }
    }

    /// Shorthand for `as_record()?.field(name)`.
    pub fn field(&self, name: &str) -> Result<&Value, ValueError> {
        self.as_record()?.field(name)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = ValueError;

    /// Strings stay strings; the encoder coerces them (hex, SS58, decimal)
    /// once the target type is known.
    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(|n| Value::Number(n.into()))
                .ok_or_else(|| ValueError::UnsupportedJson(n.to_string())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(k, v)| Value::try_from(v).map(|v| (k.clone(), v)))
                .collect::<Result<Record, _>>()
                .map(Value::Record),
            serde_json::Value::Null => Err(ValueError::UnsupportedJson("null".to_string())),
        }
    }
}

/// Numbers serialize as decimal strings and bytes as `0x` hex so that
/// 128-bit balances survive JSON consumers.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(n) => serializer.serialize_str(&n.to_string()),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Bytes(b) => serializer.serialize_str(&format!("0x{}", hex::encode(b))),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
