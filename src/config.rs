//! Declarative extractor descriptions.
//!
//! An extractor can be loaded from a JSON object instead of being wired up
//! programmatically. Presence of a top-level `regexp` selects line mode;
//! absence selects set mode. Legacy key spellings (`_start_tag`,
//! `_drop_tag`, `_skip_tag`, `_continue_tag`, `_all`) are accepted
//! alongside the current ones.
//!
//! ```json
//! {
//!     "start_tag": "message.*",
//!     "value_parsers": [
//!         { "name": "id", "type": "number", "round": 2, "regexp": "id\\s*(\\d+)" }
//!     ]
//! }
//! ```

use serde::Deserialize;

use crate::extractor::Extractor;
use crate::spec::{ValueSpec, ValueType};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct Description {
    #[serde(alias = "_start_tag")]
    start_tag: Option<String>,
    #[serde(alias = "_drop_tag")]
    stop_tag: Option<String>,
    #[serde(alias = "_skip_tag")]
    skip_tag: Option<String>,
    #[serde(alias = "_continue_tag")]
    continue_tag: Option<String>,
    #[serde(default)]
    trim_spaces: bool,
    prepare_regexp: Option<String>,
    regexp: Option<String>,
    /// Catch-all type for value descriptors that omit `type`.
    #[serde(alias = "_all")]
    default_type: Option<ValueType>,
    #[serde(default)]
    value_parsers: Vec<ValueDescription>,
}

#[derive(Debug, Deserialize)]
struct ValueDescription {
    name: String,
    #[serde(rename = "type")]
    value_type: Option<ValueType>,
    from_format: Option<String>,
    to_format: Option<String>,
    round: Option<i32>,
    regexp: Option<String>,
    #[serde(default)]
    nullable: bool,
}

/// Empty pattern strings in descriptions mean "not set".
fn given(pattern: &Option<String>) -> Option<&str> {
    pattern.as_deref().filter(|p| !p.is_empty())
}

impl Extractor {
    /// Build an extractor from a declarative JSON description.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let description: Description =
            serde_json::from_slice(data).map_err(|source| Error::Description { source })?;

        let mut builder = Extractor::builder();
        if description.trim_spaces {
            builder = builder.with_trim_spaces();
        }
        if let Some(pattern) = given(&description.regexp) {
            builder = builder.with_line_regex(pattern)?;
        }
        if let Some(pattern) = given(&description.start_tag) {
            builder = builder.with_start_tag(pattern)?;
        }
        if let Some(pattern) = given(&description.stop_tag) {
            builder = builder.with_stop_tag(pattern)?;
        }
        if let Some(pattern) = given(&description.skip_tag) {
            builder = builder.with_skip_tag(pattern)?;
        }
        if let Some(pattern) = given(&description.continue_tag) {
            builder = builder.with_continue_tag(pattern)?;
        }
        if let Some(pattern) = given(&description.prepare_regexp) {
            builder = builder.with_prepare_regex(pattern)?;
        }

        let fallback = description.default_type.unwrap_or(ValueType::String);
        for value in description.value_parsers {
            let mut spec = ValueSpec::new(value.name, value.value_type.unwrap_or(fallback));
            if let Some(format) = value.from_format {
                spec = spec.with_from_format(format);
            }
            if let Some(format) = value.to_format {
                spec = spec.with_to_format(format);
            }
            if let Some(round) = value.round {
                spec = spec.with_round(round);
            }
            if value.nullable {
                spec = spec.nullable();
            }
            if let Some(pattern) = value.regexp.as_deref().filter(|p| !p.is_empty()) {
                spec = spec.with_regex(pattern)?;
            }
            builder = builder.with_value(spec);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_mode_description_round_trips() {
        let extractor = Extractor::from_json(
            br#"{
                "regexp": "^(\\d+)\\s+(\\d+)\\s+(.*?)\\s+",
                "value_parsers": [
                    { "name": "maj", "type": "number", "round": 2 },
                    { "name": "min", "type": "number", "round": 2 },
                    { "name": "device", "type": "string" }
                ]
            }"#,
        );
        assert!(extractor.is_ok());
    }

    #[test]
    fn legacy_key_spellings_are_accepted() {
        let extractor = Extractor::from_json(
            br#"{
                "_start_tag": "message.*",
                "_drop_tag": "^END$",
                "_skip_tag": "^--",
                "_continue_tag": "^==",
                "_all": "number",
                "value_parsers": [
                    { "name": "id", "regexp": "id\\s*(\\d+)" }
                ]
            }"#,
        );
        assert!(extractor.is_ok());
    }

    #[test]
    fn legacy_type_aliases_map_to_number() {
        for alias in ["int", "float"] {
            let description = format!(
                r#"{{
                    "start_tag": ".",
                    "value_parsers": [
                        {{ "name": "n", "type": "{alias}", "regexp": "(\\d+)" }}
                    ]
                }}"#
            );
            assert!(Extractor::from_json(description.as_bytes()).is_ok());
        }
    }

    #[test]
    fn set_mode_requires_value_patterns() {
        let err = Extractor::from_json(
            br#"{
                "start_tag": "message.*",
                "value_parsers": [ { "name": "id", "type": "number" } ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingValuePattern { name } if name == "id"));
    }

    #[test]
    fn malformed_json_is_a_description_error() {
        let err = Extractor::from_json(b"{ not json }").unwrap_err();
        assert!(matches!(err, Error::Description { .. }));
    }

    #[test]
    fn empty_value_list_is_rejected() {
        let err = Extractor::from_json(br#"{ "start_tag": "." }"#).unwrap_err();
        assert!(matches!(err, Error::NoValues));
    }
}
