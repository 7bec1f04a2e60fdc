//! Tests for error types

use std::path::PathBuf;

use searchlog::Error;

#[test]
fn test_history_not_found_error() {
    let error = Error::HistoryNotFound {
        path: PathBuf::from("history/tree_best_params.json"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("History file not found"));
    assert!(error_str.contains("history/tree_best_params.json"));
    assert!(error.is_not_found());
}

#[test]
fn test_model_not_found_error() {
    let error = Error::ModelNotFound {
        version: 3,
        path: PathBuf::from("history/models/model_3.bin"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Model version 3 not found"));
    assert!(error_str.contains("model_3.bin"));
    assert!(error.is_not_found());
}

#[test]
fn test_index_out_of_range_error() {
    let error = Error::IndexOutOfRange { index: 7, len: 2 };
    let error_str = format!("{error}");
    assert!(error_str.contains("index 7"));
    assert!(error_str.contains("2 entries"));
    assert!(!error.is_not_found());
}

#[test]
fn test_missing_iterations_error() {
    let error_str = format!("{}", Error::MissingIterations);
    assert!(error_str.contains("iteration count"));
}

#[test]
fn test_message_errors() {
    let cases = [
        (Error::InvalidParamSpace("empty".to_string()), "Invalid parameter space: empty"),
        (Error::InvalidData("no rows".to_string()), "Invalid data: no rows"),
        (Error::Estimator("not fitted".to_string()), "Estimator error: not fitted"),
        (
            Error::InconsistentHistory("orphan artifact".to_string()),
            "Inconsistent history: orphan artifact",
        ),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::Io(_)));
    assert!(format!("{error}").contains("read-only"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json(_)));
}
