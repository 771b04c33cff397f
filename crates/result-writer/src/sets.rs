// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Keyed result collections.

use crate::DuplicateKey;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// The model's answer for one record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Prediction {
    /// Record key.
    pub qid: String,
    /// Answer label.
    pub answer: String,
}

/// Measured latency of one prediction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingEntry {
    /// Record key.
    pub qid: String,
    /// Wall-clock duration of the call, from a monotonic clock.
    pub elapsed: Duration,
}

impl TimingEntry {
    /// Elapsed time in seconds, rounded to 4 decimal places.
    pub fn elapsed_seconds(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
    }
}

/// Predictions in insertion order, unique by key.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<Prediction>,
    index: HashMap<String, usize>,
}

impl ResultSet {
    /// Creates an empty set with room for `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    /// Adds a prediction. Fails if the key is already present.
    pub fn insert(&mut self, qid: impl Into<String>, answer: impl Into<String>) -> Result<(), DuplicateKey> {
        let qid = qid.into();
        if self.index.contains_key(&qid) {
            return Err(DuplicateKey(qid));
        }
        self.index.insert(qid.clone(), self.entries.len());
        self.entries.push(Prediction {
            qid,
            answer: answer.into(),
        });
        Ok(())
    }

    /// Looks up the answer for a key.
    pub fn get(&self, qid: &str) -> Option<&str> {
        self.index
            .get(qid)
            .map(|&i| self.entries[i].answer.as_str())
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates predictions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.entries.iter()
    }

    /// The set of keys.
    pub fn key_set(&self) -> HashSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }
}

/// Timing entries in insertion order, unique by key.
#[derive(Debug, Clone, Default)]
pub struct TimingSet {
    entries: Vec<TimingEntry>,
    index: HashMap<String, usize>,
}

impl TimingSet {
    /// Creates an empty set with room for `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    /// Adds a timing entry. Fails if the key is already present.
    pub fn insert(&mut self, qid: impl Into<String>, elapsed: Duration) -> Result<(), DuplicateKey> {
        let qid = qid.into();
        if self.index.contains_key(&qid) {
            return Err(DuplicateKey(qid));
        }
        self.index.insert(qid.clone(), self.entries.len());
        self.entries.push(TimingEntry { qid, elapsed });
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimingEntry> {
        self.entries.iter()
    }

    /// The set of keys.
    pub fn key_set(&self) -> HashSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Looks up the duration for a key.
    pub fn get(&self, qid: &str) -> Option<Duration> {
        self.index.get(qid).map(|&i| self.entries[i].elapsed)
    }

    /// Sum of all durations.
    pub fn total(&self) -> Duration {
        self.entries.iter().map(|e| e.elapsed).sum()
    }
}
