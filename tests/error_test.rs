//! Tests for error types

use sum_game_pipeline::Error;

#[test]
fn test_invalid_config_error() {
    let error = Error::InvalidConfig("input_range must be at least 1".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid configuration"));
    assert!(error_str.contains("input_range"));
}

#[test]
fn test_malformed_row_error() {
    let error = Error::MalformedRow {
        path: "train.txt".to_string(),
        line: 7,
        reason: "expected 3 fields, found 2".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("row 7"));
    assert!(error_str.contains("train.txt"));
    assert!(error_str.contains("expected 3 fields"));
}

#[test]
fn test_malformed_log_error() {
    let error = Error::MalformedLog {
        path: "seed-1_vocab-10_maxlen-5_ec-0.1.txt".to_string(),
        reason: "line 3: missing field `acc`".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Malformed log file"));
    assert!(error_str.contains("line 3"));
}

#[test]
fn test_invalid_log_name_error() {
    let error = Error::InvalidLogName {
        name: "notes.txt".to_string(),
        reason: "token \"notes.txt\" does not start with \"seed-\"".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid log file name notes.txt"));
}

#[test]
fn test_empty_sequence_error() {
    let error = Error::EmptySequence {
        path: "run.txt".to_string(),
        mode: "validation".to_string(),
    };
    assert_eq!(format!("{error}"), "No validation epochs recorded in run.txt");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: Error = io.into();
    assert!(matches!(error, Error::Io(_)));
    assert!(format!("{error}").contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json.into();
    assert!(format!("{error}").starts_with("JSON error"));
}
