//! Typed values and the JSON document sink.
//!
//! [`Value`] is the tagged union produced by coercion; [`Document`] collects
//! values under field names and serializes to a self-contained JSON object.
//! Built on `serde_json` (with `preserve_order`) so i64 values keep full
//! precision and fields serialize in insertion order.

use serde_json::{Map, Number};

/// A parsed value as produced by coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Raw captured bytes, emitted as a JSON string.
    Raw(Vec<u8>),
    /// Multiple raw capture groups, emitted as a JSON array of strings
    /// without type coercion.
    RawArray(Vec<Vec<u8>>),
}

impl Value {
    fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(Number::from(i)),
            Value::Float(f) => float_to_json(f),
            Value::String(s) => serde_json::Value::String(s),
            Value::Raw(b) => serde_json::Value::String(lossy(b)),
            Value::RawArray(groups) => serde_json::Value::Array(
                groups
                    .into_iter()
                    .map(|g| serde_json::Value::String(lossy(g)))
                    .collect(),
            ),
        }
    }
}

/// Integral finite floats become JSON integers, matching the shortest-form
/// float formatting of the reference output (`8`, not `8.0`). Non-finite
/// floats have no JSON representation and degrade to null.
fn float_to_json(f: f64) -> serde_json::Value {
    if !f.is_finite() {
        return serde_json::Value::Null;
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        return serde_json::Value::Number(Number::from(f as i64));
    }
    match Number::from_f64(f) {
        Some(n) => serde_json::Value::Number(n),
        None => serde_json::Value::Null,
    }
}

fn lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Incrementally built JSON object for one record.
#[derive(Debug, Default)]
pub struct Document {
    root: Map<String, serde_json::Value>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field has been set yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Whether a value exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: Value) {
        self.root.insert(key.to_string(), value.into_json());
    }

    /// Serialize to JSON object bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Map-to-vec serialization of string keys and scalar values cannot fail.
        serde_json::to_vec(&self.root).unwrap_or_else(|_| b"{}".to_vec())
    }
}
