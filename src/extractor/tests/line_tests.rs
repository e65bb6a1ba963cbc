//! Line mode extraction.

use serde_json::json;

use super::{json, parse_all};
use crate::extractor::Extractor;
use crate::spec::{ValueSpec, ValueType};
use crate::Error;

fn disk_stats_extractor() -> Extractor {
    Extractor::builder()
        .with_line_regex(r"^(\d+)\s+(\d+)\s+(.*?)\s+")
        .unwrap()
        .with_value(ValueSpec::new("maj", ValueType::Number))
        .with_value(ValueSpec::new("min", ValueType::Number))
        .with_value(ValueSpec::new("device", ValueType::String))
        .build()
        .unwrap()
}

#[tokio::test]
async fn captures_map_positionally_to_values() {
    let records = parse_all(
        &disk_stats_extractor(),
        "8       0 sda 5154769 15140912 164152460 3212508\n",
    )
    .await;

    assert_eq!(records.len(), 1);
    assert!(records[0].errors.is_empty());
    assert_eq!(
        json(&records[0]),
        json!({"maj": 8, "min": 0, "device": "sda"})
    );
}

#[tokio::test]
async fn every_matching_line_yields_a_record_in_order() {
    let input = "8       0 sda 5154769 15140912\n\
                 8       1 sda1 193 84\n\
                 253     0 dm-0 35230 0\n";
    let records = parse_all(&disk_stats_extractor(), input).await;

    assert_eq!(records.len(), 3);
    assert_eq!(json(&records[0])["device"], json!("sda"));
    assert_eq!(json(&records[1])["device"], json!("sda1"));
    assert_eq!(json(&records[2])["device"], json!("dm-0"));
}

#[tokio::test]
async fn non_matching_lines_are_skipped() {
    let input = "preamble without numbers\n8       0 sda 1 2\ntrailer\n";
    let records = parse_all(&disk_stats_extractor(), input).await;
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn trim_spaces_applies_before_matching() {
    let extractor = Extractor::builder()
        .with_trim_spaces()
        .with_line_regex(r"^(\d+)\s+(\d+)\s+(.*?)\s+")
        .unwrap()
        .with_value(ValueSpec::new("maj", ValueType::Number))
        .with_value(ValueSpec::new("min", ValueType::Number))
        .with_value(ValueSpec::new("device", ValueType::String))
        .build()
        .unwrap();

    let records = parse_all(&extractor, "   253       1 dm-1 20262834 0\n").await;
    assert_eq!(records.len(), 1);
    assert_eq!(json(&records[0])["maj"], json!(253));
}

#[tokio::test]
async fn capture_count_mismatch_terminates_with_one_error_record() {
    let extractor = Extractor::builder()
        .with_line_regex(r"^(\d+)\s+(\d+)")
        .unwrap()
        .with_value(ValueSpec::new("maj", ValueType::Number))
        .with_value(ValueSpec::new("min", ValueType::Number))
        .with_value(ValueSpec::new("device", ValueType::String))
        .build()
        .unwrap();

    let records = parse_all(&extractor, "8 0 sda\n8 1 sda1\n").await;

    assert_eq!(records.len(), 1, "the structural error is terminal");
    assert!(records[0].data.is_empty());
    assert!(matches!(
        records[0].errors[0],
        Error::CaptureMismatch {
            captured: 2,
            expected: 3
        }
    ));
}

#[tokio::test]
async fn parse_failures_attach_to_the_record_and_null_the_field() {
    let extractor = Extractor::builder()
        .with_line_regex(r"^(\w+)\s+(\w+)$")
        .unwrap()
        .with_value(ValueSpec::new("device", ValueType::String))
        .with_value(ValueSpec::new("count", ValueType::Number))
        .build()
        .unwrap();

    let records = parse_all(&extractor, "sda oops\n").await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].errors.len(), 1);
    assert_eq!(json(&records[0]), json!({"device": "sda", "count": null}));
}

#[tokio::test]
async fn nullable_fields_swallow_parse_failures() {
    let extractor = Extractor::builder()
        .with_line_regex(r"^(\w+)\s+(\w+)$")
        .unwrap()
        .with_value(ValueSpec::new("device", ValueType::String))
        .with_value(ValueSpec::new("count", ValueType::Number).nullable())
        .build()
        .unwrap();

    let records = parse_all(&extractor, "sda oops\n").await;

    assert_eq!(records.len(), 1);
    assert!(records[0].errors.is_empty());
    assert_eq!(json(&records[0]), json!({"device": "sda", "count": null}));
}

#[tokio::test]
async fn multiline_pattern_buffers_until_the_window_matches() {
    let extractor = Extractor::builder()
        .with_trim_spaces()
        .with_line_regex(
            r"(?m)message\s*(\w+)\nid\s*([-+]?[0-9]*\.?[0-9]+)\nvmm\s*(\w+)\s*cdd\s*(\w+)",
        )
        .unwrap()
        .with_value(ValueSpec::new("message", ValueType::String))
        .with_value(ValueSpec::new("id", ValueType::Number))
        .with_value(ValueSpec::new("vmm", ValueType::String))
        .with_value(ValueSpec::new("cdd", ValueType::String))
        .build()
        .unwrap();

    let input = "message aaammmkkklll\nid 8879789.9\nvmm 7hgj cdd xxkkll\n\n\
                 message bbmm\nid 67\nvmm bcn cdd llmm\n";
    let records = parse_all(&extractor, input).await;

    assert_eq!(records.len(), 2);
    assert_eq!(
        json(&records[0]),
        json!({"message": "aaammmkkklll", "id": 8879789.9, "vmm": "7hgj", "cdd": "xxkkll"})
    );
    assert_eq!(
        json(&records[1]),
        json!({"message": "bbmm", "id": 67, "vmm": "bcn", "cdd": "llmm"})
    );
}

#[tokio::test]
async fn prepare_pattern_strips_noise_before_matching() {
    let extractor = Extractor::builder()
        .with_prepare_regex(r#"[",]"#)
        .unwrap()
        .with_line_regex(r"^(\w+)=(\d+)$")
        .unwrap()
        .with_value(ValueSpec::new("key", ValueType::String))
        .with_value(ValueSpec::new("count", ValueType::Number))
        .build()
        .unwrap();

    let records = parse_all(&extractor, "\"reads\"=42,\n").await;
    assert_eq!(records.len(), 1);
    assert_eq!(json(&records[0]), json!({"key": "reads", "count": 42}));
}
