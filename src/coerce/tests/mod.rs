//! Shared helpers for coercion tests.

use crate::spec::{ValueSpec, ValueType};


/// Number spec with the default precision.
pub fn number(name: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::Number)
}

pub fn string(name: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::String)
}

pub fn boolean(name: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::Bool)
}

pub fn time(name: &str, from: &str, to: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::Time)
        .with_from_format(from)
        .with_to_format(to)
}

pub fn duration(name: &str, to: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::Duration).with_to_format(to)
}

pub fn digital(name: &str, to: &str) -> ValueSpec {
    ValueSpec::new(name, ValueType::DigitalUnit).with_to_format(to)
}
