// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for prediction backends.

use std::path::PathBuf;
use std::time::Duration;

/// A failed prediction for a single record.
#[derive(Debug, thiserror::Error)]
#[error("prediction failed for record '{key}': {kind}")]
pub struct PredictionError {
    /// Key of the record being predicted.
    pub key: String,
    /// What went wrong.
    #[source]
    pub kind: PredictionErrorKind,
}

/// The cause of a [`PredictionError`].
#[derive(Debug, thiserror::Error)]
pub enum PredictionErrorKind {
    /// The backend reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// Communicating with the backend failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The backend has no answer for this record.
    #[error("no answer available")]
    NoAnswer,
}

impl PredictionError {
    /// Creates an error for the given record key.
    pub fn new(key: impl Into<String>, kind: PredictionErrorKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }

    /// Whether retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self.kind, PredictionErrorKind::NoAnswer)
    }
}

/// Errors raised while constructing a backend.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The answer table file could not be read.
    #[error("cannot read answer table '{}': {source}", path.display())]
    TableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The answer table file is not a JSON object of strings.
    #[error("cannot parse answer table '{}': {source}", path.display())]
    TableParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backend specification is unusable.
    #[error("invalid predictor specification: {0}")]
    InvalidSpec(String),
}
