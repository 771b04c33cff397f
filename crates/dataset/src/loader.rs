// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loading the input dataset from a JSON file.
//!
//! The file is parsed in two passes: first into a generic JSON array, then
//! record by record. The second pass lets a malformed record be reported by
//! its own `qid` rather than by a byte offset.

use crate::{Dataset, DatasetError, Record};
use serde_json::Value;
use std::path::Path;

/// Field names accepted as the record key, in lookup order.
const KEY_FIELDS: [&str; 3] = ["qid", "id", "key"];

/// Field names accepted as the question text, in lookup order.
const CONTENT_FIELDS: [&str; 3] = ["question", "text", "content"];

/// Key reported for errors that concern the whole document.
const DOCUMENT_KEY: &str = "<document>";

/// Loads and validates a [`Dataset`] from disk.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads the dataset at `path`.
    ///
    /// Fails with [`DatasetError::MissingInput`] if the file does not exist
    /// and [`DatasetError::Malformed`] if it does not parse into a sequence
    /// of complete records with unique keys. Source order is preserved.
    pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DatasetError::MissingInput {
                path: path.to_path_buf(),
            },
            _ => DatasetError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let dataset = Self::from_json(&content)?;
        tracing::info!("loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parses a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Dataset, DatasetError> {
        let document: Value = serde_json::from_str(json)
            .map_err(|e| DatasetError::malformed(DOCUMENT_KEY, format!("invalid JSON: {e}")))?;

        let items = match document {
            Value::Array(items) => items,
            other => {
                return Err(DatasetError::malformed(
                    DOCUMENT_KEY,
                    format!("expected a JSON array of records, found {}", kind_of(&other)),
                ))
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            records.push(Self::parse_record(i, item)?);
        }

        Dataset::from_records(records)
    }

    /// Parses a single array element into a [`Record`].
    ///
    /// Key and question are resolved by field precedence; the first field
    /// present wins and the others are ignored like any unknown field.
    fn parse_record(index: usize, item: Value) -> Result<Record, DatasetError> {
        let fallback = format!("#{index}");

        let mut fields = match item {
            Value::Object(fields) => fields,
            other => {
                return Err(DatasetError::malformed(
                    fallback,
                    format!("expected an object, found {}", kind_of(&other)),
                ))
            }
        };

        let qid = match first_field(&mut fields, &KEY_FIELDS) {
            Some((_, Value::String(k))) if !k.trim().is_empty() => k,
            Some((name, Value::String(_))) => {
                return Err(DatasetError::malformed(fallback, format!("empty '{name}'")))
            }
            Some((name, other)) => {
                return Err(DatasetError::malformed(
                    fallback,
                    format!("'{name}' must be a string, found {}", kind_of(&other)),
                ))
            }
            None => return Err(DatasetError::malformed(fallback, "missing field 'qid'")),
        };

        let question = match first_field(&mut fields, &CONTENT_FIELDS) {
            Some((_, Value::String(q))) => q,
            Some((name, other)) => {
                return Err(DatasetError::malformed(
                    &qid,
                    format!("'{name}' must be a string, found {}", kind_of(&other)),
                ))
            }
            None => return Err(DatasetError::malformed(&qid, "missing field 'question'")),
        };

        let choices = match fields.remove("choices") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<String>>(value)
                .map_err(|e| DatasetError::malformed(&qid, format!("invalid 'choices': {e}")))?,
        };

        let record = Record::new(qid, question, choices);
        record.check_required(&fallback)?;

        tracing::trace!("parsed record {} ({} choices)", record.qid, record.choices.len());
        Ok(record)
    }
}

/// Removes and returns the first of `names` present in `fields`.
fn first_field(
    fields: &mut serde_json::Map<String, Value>,
    names: &[&'static str],
) -> Option<(&'static str, Value)> {
    names
        .iter()
        .find_map(|name| fields.remove(*name).map(|value| (*name, value)))
}

/// Describes a JSON value's type for error messages.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_key(err: DatasetError) -> String {
        match err {
            DatasetError::Malformed { key, .. } => key,
            other => panic!("expected Malformed, got {other}"),
        }
    }

    #[test]
    fn test_from_json_basic() {
        let json = r#"[
            {"qid": "q1", "question": "1 + 1 = ?", "choices": ["1", "2"]},
            {"qid": "q2", "question": "2 + 2 = ?", "choices": ["4", "5", "6"]}
        ]"#;
        let ds = DatasetLoader::from_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get("q2").unwrap().choices.len(), 3);
    }

    #[test]
    fn test_from_json_aliases_and_defaults() {
        let json = r#"[{"id": "a", "content": "xin chào", "extra": 42}]"#;
        let ds = DatasetLoader::from_json(json).unwrap();
        let r = ds.get("a").unwrap();
        assert_eq!(r.question, "xin chào");
        assert!(r.choices.is_empty());
    }

    #[test]
    fn test_from_json_empty_array() {
        let ds = DatasetLoader::from_json("[]").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_not_an_array() {
        let err = DatasetLoader::from_json(r#"{"qid": "a"}"#).unwrap_err();
        assert_eq!(malformed_key(err), "<document>");
    }

    #[test]
    fn test_invalid_json() {
        let err = DatasetLoader::from_json("[{").unwrap_err();
        assert_eq!(malformed_key(err), "<document>");
    }

    #[test]
    fn test_missing_question_names_key() {
        let json = r#"[{"qid": "a", "question": "ok"}, {"qid": "b"}]"#;
        let err = DatasetLoader::from_json(json).unwrap_err();
        assert_eq!(malformed_key(err), "b");
    }

    #[test]
    fn test_missing_key_uses_index() {
        let json = r#"[{"qid": "a", "question": "ok"}, {"question": "no key"}]"#;
        let err = DatasetLoader::from_json(json).unwrap_err();
        assert_eq!(malformed_key(err), "#1");
    }

    #[test]
    fn test_non_object_record() {
        let err = DatasetLoader::from_json(r#"["just a string"]"#).unwrap_err();
        assert_eq!(malformed_key(err), "#0");
    }

    #[test]
    fn test_non_string_choice() {
        let json = r#"[{"qid": "a", "question": "q", "choices": ["x", 3]}]"#;
        let err = DatasetLoader::from_json(json).unwrap_err();
        assert_eq!(malformed_key(err), "a");
    }

    #[test]
    fn test_qid_takes_precedence_over_id() {
        let json = r#"[{"qid": "test_0001", "id": "x1", "question": "q", "choices": ["a", "b"]}]"#;
        let ds = DatasetLoader::from_json(json).unwrap();
        assert!(ds.contains("test_0001"));
        assert!(!ds.contains("x1"));
        assert_eq!(ds.get("test_0001").unwrap().choices, vec!["a", "b"]);
    }

    #[test]
    fn test_question_takes_precedence_over_text() {
        let json = r#"[{"qid": "a", "question": "primary", "text": "secondary"}]"#;
        let ds = DatasetLoader::from_json(json).unwrap();
        assert_eq!(ds.get("a").unwrap().question, "primary");
    }

    #[test]
    fn test_non_string_key() {
        let json = r#"[{"qid": 7, "question": "q"}]"#;
        let err = DatasetLoader::from_json(json).unwrap_err();
        assert_eq!(malformed_key(err), "#0");
    }

    #[test]
    fn test_duplicate_key() {
        let json = r#"[{"qid": "a", "question": "q"}, {"qid": "a", "question": "r"}]"#;
        let err = DatasetLoader::from_json(json).unwrap_err();
        assert_eq!(malformed_key(err), "a");
    }
}
