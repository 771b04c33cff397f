// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: loading datasets from the filesystem.

use dataset::{DatasetError, DatasetLoader};
use std::fs;

#[test]
fn test_load_from_file_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("private_test.json");
    fs::write(
        &path,
        r#"[
            {"qid": "test_0003", "question": "Câu 3", "choices": ["A1", "B1"]},
            {"qid": "test_0001", "question": "Câu 1", "choices": ["A2", "B2"]},
            {"qid": "test_0002", "question": "Câu 2", "choices": ["A3", "B3"]}
        ]"#,
    )
    .unwrap();

    let ds = DatasetLoader::load(&path).unwrap();
    let keys: Vec<&str> = ds.keys().collect();
    assert_eq!(keys, vec!["test_0003", "test_0001", "test_0002"]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.json");

    let err = DatasetLoader::load(&path).unwrap_err();
    match err {
        DatasetError::MissingInput { path: p } => assert_eq!(p, path),
        other => panic!("expected MissingInput, got {other}"),
    }
}

#[test]
fn test_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DatasetLoader::load(dir.path()).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "got {err}");
}

#[test]
fn test_malformed_file_reports_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"[{"qid": "a", "question": "ok"}, {"qid": "b", "question": ""}]"#,
    )
    .unwrap();

    let err = DatasetLoader::load(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("'b'"), "message should name the record: {msg}");
}
