//! Shared helpers for engine tests.

use tokio_util::sync::CancellationToken;

use crate::extractor::{Extractor, Record};
use crate::spec::{ValueSpec, ValueType};

mod builder_tests;
mod line_tests;

/// Run an extractor over in-memory input and drain the stream.
pub async fn parse_all(extractor: &Extractor, input: &str) -> Vec<Record> {
    extractor
        .parse_bytes(CancellationToken::new(), input.as_bytes().to_vec())
        .collect()
        .await
}

/// Decode a record's data as a JSON value.
pub fn json(record: &Record) -> serde_json::Value {
    serde_json::from_slice(&record.data).expect("record data must be a JSON object")
}

/// Number spec with a set-mode capture pattern.
pub fn number_value(name: &str, pattern: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::Number)
        .with_regex(pattern)
        .expect("test pattern must compile")
}

/// String spec with a set-mode capture pattern.
pub fn string_value(name: &str, pattern: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::String)
        .with_regex(pattern)
        .expect("test pattern must compile")
}
