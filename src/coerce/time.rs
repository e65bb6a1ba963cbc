//! Time parsing and conversion.
//!
//! Source layouts use the reference-date notation (`2006-01-02 15:04:05`
//! describes year-month-day hour:minute:second); they are translated to
//! chrono format strings before parsing. Layouts without a zone token are
//! interpreted as UTC. The names `rfc3339` and `rfc3339nano` are accepted
//! as layouts as well.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::document::Value;
use crate::spec::ValueSpec;
use crate::{Error, Result};

/// Reference-date tokens and their chrono equivalents, longest first so the
/// scan is unambiguous (`2006` before `2`, `02` before `2`).
const TOKENS: &[(&str, &str, bool)] = &[
    (".000000000", "%.9f", false),
    (".000000", "%.6f", false),
    (".000", "%.3f", false),
    (".999999999", "%.f", false),
    (".999999", "%.f", false),
    (".999", "%.f", false),
    ("2006", "%Y", false),
    ("January", "%B", false),
    ("Jan", "%b", false),
    ("Monday", "%A", false),
    ("Mon", "%a", false),
    ("15", "%H", false),
    ("PM", "%p", false),
    ("pm", "%P", false),
    ("01", "%m", false),
    ("02", "%d", false),
    ("03", "%I", false),
    ("04", "%M", false),
    ("05", "%S", false),
    ("06", "%y", false),
    ("Z07:00", "%:z", true),
    ("Z0700", "%z", true),
    ("-07:00", "%:z", true),
    ("-0700", "%z", true),
    ("MST", "%Z", true),
    ("_2", "%e", false),
    ("2", "%-d", false),
];

/// Translate a reference-date layout into a chrono format string.
/// Returns the format and whether it contains a zone token.
fn translate_layout(layout: &str) -> (String, bool) {
    let mut format = String::with_capacity(layout.len());
    let mut has_zone = false;
    let mut rest = layout;

    'scan: while !rest.is_empty() {
        for (token, replacement, zone) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                format.push_str(replacement);
                has_zone |= zone;
                rest = tail;
                continue 'scan;
            }
        }
        let ch = rest.chars().next().expect("non-empty");
        if ch == '%' {
            format.push_str("%%");
        } else {
            format.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    (format, has_zone)
}

fn parse_instant(spec: &ValueSpec, text: &str, layout: &str) -> Result<DateTime<Utc>> {
    if layout.eq_ignore_ascii_case("rfc3339")
        || layout.eq_ignore_ascii_case("rfc3339nano")
        || layout == "2006-01-02T15:04:05Z07:00"
        || layout == "2006-01-02T15:04:05.999999999Z07:00"
    {
        return DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| invalid(spec, text, layout));
    }

    let (format, has_zone) = translate_layout(layout);

    if has_zone {
        return DateTime::parse_from_str(text, &format)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| invalid(spec, text, layout));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, &format) {
        return Ok(naive.and_utc());
    }

    // Date-only layouts carry no time of day.
    NaiveDate::parse_from_str(text, &format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid(spec, text, layout))
}

fn invalid(spec: &ValueSpec, text: &str, layout: &str) -> Error {
    Error::InvalidTime {
        name: spec.name.clone(),
        input: text.to_string(),
        layout: layout.to_string(),
    }
}

/// Parse `raw` per the spec's source layout and convert per its destination
/// format.
pub(crate) fn coerce(spec: &ValueSpec, raw: &[u8]) -> Result<Value> {
    let layout = spec.from_format.as_deref().unwrap_or("");
    let text = std::str::from_utf8(raw).map_err(|_| invalid(spec, "<non-utf8>", layout))?;

    let instant = parse_instant(spec, text, layout)?;

    match spec.to_format.as_deref().unwrap_or("") {
        "unix" => Ok(Value::Int(instant.timestamp())),
        "unix_milli" => Ok(Value::Int(instant.timestamp_millis())),
        "unix_nano" => instant
            .timestamp_nanos_opt()
            .map(Value::Int)
            .ok_or_else(|| Error::TimeOutOfRange {
                name: spec.name.clone(),
                format: "unix_nano".to_string(),
            }),
        "rfc3339" => Ok(Value::String(
            instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        )),
        "rfc3339nano" | "string" | "" => Ok(Value::String(
            instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )),
        other => Err(Error::UnknownFormat {
            name: spec.name.clone(),
            format: other.to_string(),
        }),
    }
}
