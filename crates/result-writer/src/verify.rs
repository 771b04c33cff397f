// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Post-write verification of output files.
//!
//! Existence alone is not enough: each file must be non-empty, carry the
//! expected header, have well-formed rows, and contain every expected key
//! exactly once.

use crate::{OutputCheckError, PREDICTION_HEADER, TIMING_HEADER};
use std::collections::HashSet;
use std::path::Path;

/// Row counts of a verified output pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSummary {
    /// Rows in the predictions file.
    pub predictions: usize,
    /// Rows in the timing file.
    pub timings: usize,
}

/// Verifies both output files against the expected key set.
pub fn verify_outputs(
    result_path: &Path,
    timing_path: &Path,
    expected: &HashSet<&str>,
) -> Result<OutputSummary, OutputCheckError> {
    let predictions = check_file(result_path, &PREDICTION_HEADER, expected, |answer| {
        if answer.trim().is_empty() {
            Err("empty answer".to_string())
        } else {
            Ok(())
        }
    })?;

    let timings = check_file(timing_path, &TIMING_HEADER, expected, |secs| {
        match secs.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
            Ok(v) => Err(format!("invalid duration {v}")),
            Err(e) => Err(format!("unparsable duration '{secs}': {e}")),
        }
    })?;

    tracing::debug!(
        "verified {} ({predictions} rows) and {} ({timings} rows)",
        result_path.display(),
        timing_path.display(),
    );
    Ok(OutputSummary {
        predictions,
        timings,
    })
}

/// Checks one two-column file; `check_value` validates the second column.
fn check_file<F>(
    path: &Path,
    header: &[&str; 2],
    expected: &HashSet<&str>,
    check_value: F,
) -> Result<usize, OutputCheckError>
where
    F: Fn(&str) -> Result<(), String>,
{
    let meta = std::fs::metadata(path).map_err(|_| OutputCheckError::Missing {
        path: path.to_path_buf(),
    })?;
    if meta.len() == 0 {
        return Err(OutputCheckError::Empty {
            path: path.to_path_buf(),
        });
    }

    let read_err = |source| OutputCheckError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let found = reader.headers().map_err(read_err)?.clone();
    if found.len() != header.len() || found.iter().zip(header.iter()).any(|(a, b)| a != *b) {
        return Err(OutputCheckError::BadHeader {
            path: path.to_path_buf(),
            expected: header.join(","),
            found: found.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(expected.len());
    let mut duplicates = Vec::new();
    let mut rows = 0;

    for row in reader.records() {
        let row = row.map_err(read_err)?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() != 2 {
            return Err(OutputCheckError::BadRow {
                path: path.to_path_buf(),
                line,
                detail: format!("expected 2 fields, found {}", row.len()),
            });
        }
        check_value(&row[1]).map_err(|detail| OutputCheckError::BadRow {
            path: path.to_path_buf(),
            line,
            detail,
        })?;
        if !seen.insert(row[0].to_string()) {
            duplicates.push(row[0].to_string());
        }
        rows += 1;
    }

    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|k| !seen.contains(*k))
        .collect();
    let extra: Vec<&str> = seen
        .iter()
        .map(String::as_str)
        .filter(|k| !expected.contains(k))
        .collect();

    if !missing.is_empty() || !extra.is_empty() || !duplicates.is_empty() {
        let example = missing
            .first()
            .or(extra.first())
            .map(|s| s.to_string())
            .or_else(|| duplicates.first().cloned())
            .unwrap_or_default();
        return Err(OutputCheckError::KeyMismatch {
            path: path.to_path_buf(),
            missing: missing.len(),
            extra: extra.len(),
            duplicate: duplicates.len(),
            example,
        });
    }

    Ok(rows)
}
