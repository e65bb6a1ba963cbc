//! Coercion of captured bytes into typed values.
//!
//! Dispatches on the spec's [`ValueType`] and handles the scalar cases
//! directly; time, duration and digital-unit conversion live in their own
//! submodules.

pub(crate) mod duration;
pub(crate) mod time;
pub(crate) mod units;

#[cfg(test)]
mod tests;

use crate::document::Value;
use crate::spec::{ValueSpec, ValueType};
use crate::{Error, Result};

/// Selects byte-unit parsing when given as a Number's source format.
pub(crate) const DIGITAL_UNIT_FORMAT: &str = "digital_unit";

/// Coerce `raw` into the spec's target type.
pub(crate) fn coerce(spec: &ValueSpec, raw: &[u8]) -> Result<Value> {
    match spec.value_type {
        ValueType::String => Ok(coerce_string(spec, raw)),
        ValueType::Number => coerce_number(spec, raw),
        ValueType::Bool => coerce_bool(spec, raw),
        ValueType::Time => time::coerce(spec, raw),
        ValueType::Duration => duration::coerce(spec, raw),
        ValueType::DigitalUnit => units::coerce(spec, raw, spec.from_format.as_deref()),
    }
}

fn coerce_string(spec: &ValueSpec, raw: &[u8]) -> Value {
    if spec.nullable && (raw.is_empty() || raw == b"null") {
        return Value::Null;
    }
    Value::String(String::from_utf8_lossy(raw).into_owned())
}

fn coerce_number(spec: &ValueSpec, raw: &[u8]) -> Result<Value> {
    if spec.from_format.as_deref() == Some(DIGITAL_UNIT_FORMAT) {
        // A plain digital-unit number has no default source unit.
        return units::coerce(spec, raw, None);
    }

    let text = std::str::from_utf8(raw).unwrap_or("");
    let parsed: f64 = text.parse().map_err(|e| Error::InvalidNumber {
        name: spec.name.clone(),
        input: String::from_utf8_lossy(raw).into_owned(),
        source: e,
    })?;
    Ok(Value::Float(round_to(parsed, spec.round)))
}

fn coerce_bool(spec: &ValueSpec, raw: &[u8]) -> Result<Value> {
    match raw {
        b"1" | b"t" | b"T" | b"true" | b"TRUE" | b"True" => Ok(Value::Bool(true)),
        b"0" | b"f" | b"F" | b"false" | b"FALSE" | b"False" => Ok(Value::Bool(false)),
        _ => Err(Error::InvalidBool {
            name: spec.name.clone(),
            input: String::from_utf8_lossy(raw).into_owned(),
        }),
    }
}

/// Round to `digits` decimals, half away from zero. Negative `digits`
/// disables rounding.
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    if digits < 0 {
        return value;
    }
    let shift = 10f64.powi(digits);
    let scaled = value * shift;
    ((scaled.abs() + 0.5).floor() * scaled.signum()) / shift
}
