//! Field descriptors.
//!
//! A [`ValueSpec`] describes one output field: its name, target type,
//! optional capture pattern and conversion formats. Specs are immutable once
//! built and shared by reference across parse invocations.

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::document::Value;
use crate::{Error, Result};

/// Default decimal precision applied to numeric parsing.
pub(crate) const DEFAULT_ROUND: i32 = 2;

/// Target type of an output field.
///
/// `int` and `float` are accepted in declarative descriptions as legacy
/// aliases of `number`; numbers are always 64-bit floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    #[serde(alias = "int", alias = "float")]
    Number,
    Bool,
    Time,
    Duration,
    DigitalUnit,
}

/// Outcome of applying a value spec's pattern to an input line.
#[derive(Debug)]
pub enum Capture {
    /// The pattern did not match; the line does not contribute to this field.
    Miss,
    /// A single captured group, coerced to the target type.
    One(Value),
    /// More than one captured group: the raw byte groups. Array captures
    /// bypass type conversion and are emitted as raw strings.
    Many(Vec<Vec<u8>>),
}

/// Immutable description of one output field.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) pattern: Option<Regex>,
    pub(crate) from_format: Option<String>,
    pub(crate) to_format: Option<String>,
    pub(crate) round: i32,
    pub(crate) nullable: bool,
}

impl ValueSpec {
    /// Create a spec with defaults: no pattern, no formats, round 2,
    /// not nullable.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            pattern: None,
            from_format: None,
            to_format: None,
            round: DEFAULT_ROUND,
            nullable: false,
        }
    }

    /// Set the capture pattern, compiling it eagerly. The pattern must
    /// contain at least one capturing group.
    pub fn with_regex(mut self, pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern {
                what: "value capture",
            });
        }
        let compiled = Regex::new(pattern).map_err(|e| Error::pattern(pattern, e))?;
        if compiled.captures_len() < 2 {
            return Err(Error::MissingValuePattern {
                name: self.name.clone(),
            });
        }
        self.pattern = Some(compiled);
        Ok(self)
    }

    /// Set the source format. Time layouts keep their case; everything else
    /// is matched case-insensitively and stored lowercased.
    pub fn with_from_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.from_format = Some(match self.value_type {
            ValueType::Time => format,
            _ => format.to_lowercase(),
        });
        self
    }

    /// Set the destination format (stored lowercased).
    pub fn with_to_format(mut self, format: impl Into<String>) -> Self {
        self.to_format = Some(format.into().to_lowercase());
        self
    }

    /// Set the decimal precision for numeric parsing. Negative disables
    /// rounding.
    pub fn with_round(mut self, round: i32) -> Self {
        self.round = round;
        self
    }

    /// Map parse failures of this field to JSON null instead of an error.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Field name; becomes the JSON key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the spec's own pattern to `input` and coerce the capture.
    ///
    /// Without a pattern the whole input is coerced. Coercion failures of a
    /// nullable spec fold to `Capture::One(Value::Null)`.
    pub fn capture(&self, input: &[u8]) -> Result<Capture> {
        let Some(pattern) = &self.pattern else {
            return self.coerce_or_null(input).map(Capture::One);
        };

        let Some(caps) = pattern.captures(input) else {
            return Ok(Capture::Miss);
        };

        if caps.len() > 2 {
            let groups = (1..caps.len())
                .map(|i| caps.get(i).map_or(Vec::new(), |m| m.as_bytes().to_vec()))
                .collect();
            return Ok(Capture::Many(groups));
        }

        let raw = caps.get(1).map_or(&b""[..], |m| m.as_bytes());
        self.coerce_or_null(raw).map(Capture::One)
    }

    /// Coerce raw bytes to the target type without applying the pattern.
    pub fn coerce(&self, raw: &[u8]) -> Result<Value> {
        coerce::coerce(self, raw)
    }

    /// Like [`coerce`](Self::coerce), but a nullable spec swallows the
    /// failure and yields null.
    pub(crate) fn coerce_or_null(&self, raw: &[u8]) -> Result<Value> {
        match coerce::coerce(self, raw) {
            Ok(value) => Ok(value),
            Err(_) if self.nullable => Ok(Value::Null),
            Err(e) => Err(e),
        }
    }
}
