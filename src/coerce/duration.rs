//! Duration parsing and conversion.
//!
//! Inputs are compound duration literals (`300ms`, `1.5h`, `2h45m`) with
//! nanosecond resolution. A bare number takes the spec's source format as
//! its unit, defaulting to seconds. The canonical string form follows the
//! `1h1m1s` shape with sub-second units for small values.

use crate::document::Value;
use crate::spec::ValueSpec;
use crate::{Error, Result};

const NANOS_PER_SEC: u64 = 1_000_000_000;

fn invalid(spec: &ValueSpec, input: &str, reason: impl Into<String>) -> Error {
    Error::InvalidDuration {
        name: spec.name.clone(),
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// Parse a lowercased compound duration literal into nanoseconds.
fn parse_nanos(text: &str) -> std::result::Result<i64, String> {
    let mut rest = text;
    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: f64 = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(format!("missing number before '{}'", rest));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| format!("bad number '{}'", number))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.' || c == '+' || c == '-')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        let factor = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3_600e9,
            "" => return Err(format!("missing unit after '{}'", number)),
            other => return Err(format!("unknown unit '{}'", other)),
        };
        rest = &rest[unit_len..];

        total += value * factor;
        if total > i64::MAX as f64 {
            return Err("duration overflows".to_string());
        }
    }

    let nanos = total as i64;
    Ok(if negative { -nanos } else { nanos })
}

/// Format nanoseconds canonically: `0s`, `123ns`, `1.5µs`, `812ms`,
/// `1m30s`, `2h45m0s`. Fractions drop trailing zeros.
pub(crate) fn format_nanos(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    let negative = nanos < 0;
    let magnitude = nanos.unsigned_abs();

    let body = if magnitude < NANOS_PER_SEC {
        if magnitude < 1_000 {
            format!("{}ns", magnitude)
        } else if magnitude < 1_000_000 {
            format!("{}{}µs", magnitude / 1_000, fraction(magnitude % 1_000, 1_000))
        } else {
            format!(
                "{}{}ms",
                magnitude / 1_000_000,
                fraction(magnitude % 1_000_000, 1_000_000)
            )
        }
    } else {
        let seconds = magnitude / NANOS_PER_SEC;
        let seconds_part = format!(
            "{}{}s",
            seconds % 60,
            fraction(magnitude % NANOS_PER_SEC, NANOS_PER_SEC)
        );
        let minutes = seconds / 60;
        if minutes == 0 {
            seconds_part
        } else {
            let hours = minutes / 60;
            if hours == 0 {
                format!("{}m{}", minutes % 60, seconds_part)
            } else {
                format!("{}h{}m{}", hours, minutes % 60, seconds_part)
            }
        }
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Fractional suffix over a power-of-ten scale, trailing zeros trimmed.
fn fraction(remainder: u64, scale: u64) -> String {
    if remainder == 0 {
        return String::new();
    }
    let width = scale.ilog10() as usize;
    let mut digits = format!("{:0width$}", remainder, width = width);
    while digits.ends_with('0') {
        digits.pop();
    }
    format!(".{}", digits)
}

/// Parse `raw` as a duration and convert per the spec's destination format.
pub(crate) fn coerce(spec: &ValueSpec, raw: &[u8]) -> Result<Value> {
    let mut text = String::from_utf8_lossy(raw).to_lowercase();

    // Bare numbers take the configured default unit.
    if text
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_digit() || c == '.')
    {
        text.push_str(spec.from_format.as_deref().unwrap_or("s"));
    }

    let nanos =
        parse_nanos(&text).map_err(|reason| invalid(spec, &String::from_utf8_lossy(raw), reason))?;

    match spec.to_format.as_deref().unwrap_or("") {
        "ns" | "nano" | "nanosecond" | "nanoseconds" => Ok(Value::Int(nanos)),
        "ms" | "milli" | "millisecond" | "milliseconds" => Ok(Value::Int(nanos / 1_000_000)),
        "s" | "sec" | "second" | "seconds" => Ok(Value::Float(nanos as f64 / 1e9)),
        "m" | "min" | "minute" | "minutes" => Ok(Value::Float(nanos as f64 / 60e9)),
        "h" | "hour" | "hours" => Ok(Value::Float(nanos as f64 / 3_600e9)),
        "string" | "" => Ok(Value::String(format_nanos(nanos))),
        other => Err(Error::UnknownFormat {
            name: spec.name.clone(),
            format: other.to_string(),
        }),
    }
}
