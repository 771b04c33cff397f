// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for writing and verifying output files.

use std::path::PathBuf;

/// An output file could not be persisted.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A filesystem operation failed (directory missing, not writable,
    /// disk full, rename failed).
    #[error("cannot write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialisation failed.
    #[error("cannot serialise '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl WriteError {
    /// Path of the output file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Csv { path, .. } => path,
        }
    }
}

/// A key was inserted twice into a [`ResultSet`](crate::ResultSet) or
/// [`TimingSet`](crate::TimingSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate key '{0}'")]
pub struct DuplicateKey(pub String);

/// An output file exists but is not a valid, complete result.
#[derive(Debug, thiserror::Error)]
pub enum OutputCheckError {
    /// The file does not exist.
    #[error("output file missing: {}", path.display())]
    Missing { path: PathBuf },

    /// The file exists but is empty.
    #[error("output file is empty: {}", path.display())]
    Empty { path: PathBuf },

    /// The header row is not the expected one.
    #[error("unexpected header in '{}': expected '{expected}', found '{found}'", path.display())]
    BadHeader {
        path: PathBuf,
        expected: String,
        found: String,
    },

    /// A data row is malformed.
    #[error("bad row {line} in '{}': {detail}", path.display())]
    BadRow {
        path: PathBuf,
        line: u64,
        detail: String,
    },

    /// The file's keys are not exactly the expected keys.
    #[error(
        "key mismatch in '{}': {missing} missing, {extra} unexpected, {duplicate} duplicated (e.g. '{example}')",
        path.display()
    )]
    KeyMismatch {
        path: PathBuf,
        missing: usize,
        extra: usize,
        duplicate: usize,
        example: String,
    },

    /// The file could not be read as CSV.
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
