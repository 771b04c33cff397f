// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A predictor backed by a fixed answer table.

use crate::{PredictionError, PredictionErrorKind, Predictor, SetupError};
use dataset::Record;
use std::collections::HashMap;
use std::path::Path;

/// Answers each record from a `qid → answer` table.
///
/// Used to replay previously computed answers and as a deterministic
/// stand-in for a real model in tests. A record missing from the table
/// fails with [`PredictionErrorKind::NoAnswer`].
#[derive(Debug, Clone, Default)]
pub struct LookupPredictor {
    answers: HashMap<String, String>,
}

impl LookupPredictor {
    /// Creates a predictor from an existing table.
    pub fn new(answers: HashMap<String, String>) -> Self {
        Self { answers }
    }

    /// Creates a predictor from `(qid, answer)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            answers: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads the table from a JSON object file: `{"test_0001": "B", ...}`.
    pub fn from_file(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|source| SetupError::TableRead {
            path: path.to_path_buf(),
            source,
        })?;
        let answers: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|source| SetupError::TableParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("answer table: {} entries from {}", answers.len(), path.display());
        Ok(Self { answers })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Predictor for LookupPredictor {
    fn name(&self) -> &str {
        "lookup"
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        self.answers
            .get(&record.qid)
            .cloned()
            .ok_or_else(|| PredictionError::new(&record.qid, PredictionErrorKind::NoAnswer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hit_and_miss() {
        let p = LookupPredictor::from_pairs([("a", "greeting"), ("b", "farewell")]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.predict(&Record::new("a", "xin chào", vec![])).unwrap(), "greeting");

        let err = p.predict(&Record::new("z", "?", vec![])).unwrap_err();
        assert_eq!(err.key, "z");
        assert!(matches!(err.kind, PredictionErrorKind::NoAnswer));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"{"test_0001": "B", "test_0002": "D"}"#).unwrap();

        let p = LookupPredictor::from_file(&path).unwrap();
        assert_eq!(p.predict(&Record::new("test_0002", "q", vec![])).unwrap(), "D");
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            LookupPredictor::from_file(&missing),
            Err(SetupError::TableRead { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"["not", "a", "map"]"#).unwrap();
        assert!(matches!(
            LookupPredictor::from_file(&bad),
            Err(SetupError::TableParse { .. })
        ));
    }
}
