//! Builder validation.

use crate::extractor::Extractor;
use crate::spec::{ValueSpec, ValueType};
use crate::Error;

#[test]
fn at_least_one_value_is_required() {
    let err = Extractor::builder().build().unwrap_err();
    assert!(matches!(err, Error::NoValues));
}

#[test]
fn value_names_must_be_non_empty() {
    let err = Extractor::builder()
        .with_line_regex(r"(\d+)")
        .unwrap()
        .with_value(ValueSpec::new("", ValueType::Number))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::EmptyValueName { position: 0 }));
}

#[test]
fn value_names_must_be_unique() {
    let err = Extractor::builder()
        .with_line_regex(r"(\d+)\s+(\d+)")
        .unwrap()
        .with_value(ValueSpec::new("n", ValueType::Number))
        .with_value(ValueSpec::new("n", ValueType::Number))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateValueName { name } if name == "n"));
}

#[test]
fn set_mode_values_need_patterns() {
    let err = Extractor::builder()
        .with_start_tag("message.*")
        .unwrap()
        .with_value(ValueSpec::new("id", ValueType::Number))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MissingValuePattern { name } if name == "id"));
}

#[test]
fn line_mode_values_do_not_need_patterns() {
    let extractor = Extractor::builder()
        .with_line_regex(r"(\d+)")
        .unwrap()
        .with_value(ValueSpec::new("id", ValueType::Number))
        .build();
    assert!(extractor.is_ok());
}

#[test]
fn pattern_compile_errors_surface_from_the_builder() {
    let err = Extractor::builder().with_line_regex(r"([)").unwrap_err();
    assert!(matches!(err, Error::Pattern { .. }));
}

#[test]
fn empty_anchor_patterns_are_rejected() {
    let err = Extractor::builder().with_start_tag("").unwrap_err();
    assert!(matches!(err, Error::EmptyPattern { .. }));
}
