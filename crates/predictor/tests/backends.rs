// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: building backends from their config description.

use dataset::Record;
use predictor::{PredictionErrorKind, Predictor, PredictorSpec, Retrying, SetupError};
use std::time::Duration;

fn record(qid: &str) -> Record {
    Record::new(qid, "Thủ đô của Việt Nam là gì?", vec!["Hà Nội".into(), "Huế".into()])
}

#[test]
fn test_lookup_spec_builds_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("answers.json");
    std::fs::write(&table, r#"{"q1": "A", "q2": "B"}"#).unwrap();

    let model = PredictorSpec::Lookup { path: table }.build().unwrap();
    assert_eq!(model.name(), "lookup");
    assert_eq!(model.predict(&record("q2")).unwrap(), "B");

    let err = model.predict(&record("q3")).unwrap_err();
    assert_eq!(err.key, "q3");
    assert!(matches!(err.kind, PredictionErrorKind::NoAnswer));
}

#[test]
fn test_lookup_spec_missing_table() {
    let dir = tempfile::tempdir().unwrap();
    let spec = PredictorSpec::Lookup {
        path: dir.path().join("absent.json"),
    };
    assert!(matches!(spec.build(), Err(SetupError::TableRead { .. })));
}

#[test]
fn test_lookup_spec_rejects_non_object_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("answers.json");
    std::fs::write(&table, r#"["A", "B"]"#).unwrap();
    let spec = PredictorSpec::Lookup { path: table };
    assert!(matches!(spec.build(), Err(SetupError::TableParse { .. })));
}

#[test]
fn test_invalid_command_specs() {
    let empty = PredictorSpec::Command {
        program: "  ".into(),
        args: vec![],
        timeout_secs: 5,
    };
    assert!(matches!(empty.build(), Err(SetupError::InvalidSpec(_))));

    let zero = PredictorSpec::Command {
        program: "sh".into(),
        args: vec![],
        timeout_secs: 0,
    };
    assert!(matches!(zero.build(), Err(SetupError::InvalidSpec(_))));
}

#[cfg(unix)]
#[test]
fn test_command_spec_with_retry() {
    let model = PredictorSpec::Command {
        program: "sh".into(),
        args: vec!["-c".into(), "cat > /dev/null; echo 'Đáp án: B'".into()],
        timeout_secs: 10,
    }
    .build()
    .unwrap();

    let retrying = Retrying::new(model, 3, Duration::from_millis(1));
    assert_eq!(retrying.predict(&record("q1")).unwrap(), "B");
}
