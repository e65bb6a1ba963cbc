//! Digital byte-unit parsing.
//!
//! Quantities like `1.6445666GB` or `512 KiB` are resolved against a fixed
//! table of decimal (SI) and binary (IEC) denominations, converted to bytes
//! and then to the destination unit.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::coerce::round_to;
use crate::document::Value;
use crate::spec::ValueSpec;
use crate::{Error, Result};

// Decimal denominations.
const BYTE: f64 = 1.0;
const KB: f64 = BYTE * 1000.0;
const MB: f64 = KB * 1000.0;
const GB: f64 = MB * 1000.0;
const TB: f64 = GB * 1000.0;
const PB: f64 = TB * 1000.0;

// Binary denominations.
const KIB: f64 = BYTE * 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;
const PIB: f64 = TIB * 1024.0;

static UNIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([-+]?[0-9]*\.?[0-9]+)\s*(\w+)?").expect("unit pattern"));

/// Resolve a lowercased unit name to its byte multiplier. The empty string
/// means bytes.
fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "" | "b" | "byte" => Some(BYTE),
        "k" | "kb" | "kilo" | "kilobyte" | "kilobytes" => Some(KB),
        "m" | "mb" | "mega" | "megabyte" | "megabytes" => Some(MB),
        "g" | "gb" | "giga" | "gigabyte" | "gigabytes" => Some(GB),
        "t" | "tb" | "tera" | "terabyte" | "terabytes" => Some(TB),
        "p" | "pb" | "peta" | "petabyte" | "petabytes" => Some(PB),
        "ki" | "kib" | "kibibyte" | "kibibytes" => Some(KIB),
        "mi" | "mib" | "mebibyte" | "mebibytes" => Some(MIB),
        "gi" | "gib" | "gibibyte" | "gibibytes" => Some(GIB),
        "ti" | "tib" | "tebibyte" | "tebibytes" => Some(TIB),
        "pi" | "pib" | "pebibyte" | "pebibytes" => Some(PIB),
        _ => None,
    }
}

/// Parse a digital quantity and convert it to the spec's destination unit.
///
/// `default_unit` is substituted when the input carries no unit suffix;
/// an absent destination format means bytes.
pub(crate) fn coerce(spec: &ValueSpec, raw: &[u8], default_unit: Option<&str>) -> Result<Value> {
    let lowered = raw.to_ascii_lowercase();

    let caps = UNIT_PATTERN
        .captures(&lowered)
        .ok_or_else(|| Error::NoUnitMatch {
            name: spec.name.clone(),
            input: String::from_utf8_lossy(raw).into_owned(),
        })?;

    let number = std::str::from_utf8(&caps[1]).unwrap_or("");
    let number: f64 = number.parse().map_err(|e| Error::InvalidNumber {
        name: spec.name.clone(),
        input: number.to_string(),
        source: e,
    })?;

    let mut source_unit = caps
        .get(2)
        .map_or(String::new(), |m| String::from_utf8_lossy(m.as_bytes()).into_owned());
    if source_unit.is_empty() {
        if let Some(default) = default_unit {
            source_unit = default.to_string();
        }
    }

    let from = unit_factor(&source_unit).ok_or_else(|| Error::UnknownUnit {
        name: spec.name.clone(),
        unit: source_unit.clone(),
    })?;

    let to_format = spec.to_format.as_deref().unwrap_or("");
    let to = unit_factor(to_format).ok_or_else(|| Error::UnknownFormat {
        name: spec.name.clone(),
        format: to_format.to_string(),
    })?;

    Ok(Value::Float(round_to(number * from / to, spec.round)))
}
