// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for dataset loading.

use std::path::PathBuf;

/// Errors that can occur while loading the input dataset.
///
/// All variants are fatal for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The input file does not exist.
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// The input could not be parsed, or a record is incomplete.
    ///
    /// `key` is the offending record's `qid` when it could be read,
    /// `#<index>` otherwise, and `<document>` for whole-file errors.
    #[error("malformed input at record '{key}': {detail}")]
    Malformed { key: String, detail: String },

    /// The input file exists but could not be read.
    #[error("failed to read input '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn malformed(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            key: key.into(),
            detail: detail.into(),
        }
    }
}
