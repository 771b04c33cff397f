// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Typed records and the ordered [`Dataset`] collection.

use crate::DatasetError;
use std::collections::{HashMap, HashSet};

/// Marker that introduces an embedded reading passage in a question.
const PASSAGE_MARKER: &str = "Đoạn thông tin";

/// Marker that separates an embedded passage from the actual question.
const QUESTION_MARKER: &str = "Câu hỏi:";

/// One unit of input requiring a prediction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    /// Unique record key (e.g., `"test_0001"`).
    pub qid: String,
    /// Question text. May embed a reading passage (see [`Record::split_context`]).
    pub question: String,
    /// Answer options, labelled `A`, `B`, `C`, ... in order.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// A question with its embedded reading passage separated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitQuestion<'a> {
    /// The reading passage, if the question carried one.
    pub context: Option<&'a str>,
    /// The question itself.
    pub question: &'a str,
}

impl Record {
    /// Creates a record.
    pub fn new(qid: impl Into<String>, question: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            qid: qid.into(),
            question: question.into(),
            choices,
        }
    }

    /// Separates an embedded reading passage from the question text.
    ///
    /// Reading-comprehension items carry the passage inline:
    /// `"Đoạn thông tin: ... Câu hỏi: ..."`. The passage is everything
    /// before the first `Câu hỏi:` marker and the question is everything
    /// after the last one. Items without the passage marker are returned
    /// unchanged.
    pub fn split_context(&self) -> SplitQuestion<'_> {
        let text = self.question.as_str();
        if text.contains(PASSAGE_MARKER) {
            if let (Some(first), Some(last)) =
                (text.find(QUESTION_MARKER), text.rfind(QUESTION_MARKER))
            {
                return SplitQuestion {
                    context: Some(text[..first].trim()),
                    question: text[last + QUESTION_MARKER.len()..].trim(),
                };
            }
        }
        SplitQuestion {
            context: None,
            question: text,
        }
    }

    /// Returns the letter of the last valid option, or `None` if the record
    /// has no choices. Options beyond `Z` are not addressable.
    pub fn max_choice_letter(&self) -> Option<char> {
        match self.choices.len() {
            0 => None,
            n => {
                let offset = (n - 1).min(25) as u8;
                Some((b'A' + offset) as char)
            }
        }
    }

    /// Checks that required fields are present and non-blank.
    pub(crate) fn check_required(&self, fallback_key: &str) -> Result<(), DatasetError> {
        if self.qid.trim().is_empty() {
            return Err(DatasetError::malformed(fallback_key, "empty 'qid'"));
        }
        if self.question.trim().is_empty() {
            return Err(DatasetError::malformed(&self.qid, "empty 'question'"));
        }
        Ok(())
    }
}

/// The ordered, read-only collection of records for one pipeline run.
///
/// Record keys are unique; construction fails otherwise.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Builds a dataset, rejecting duplicate keys.
    pub fn from_records(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            record.check_required(&format!("#{i}"))?;
            if index.insert(record.qid.clone(), i).is_some() {
                return Err(DatasetError::malformed(&record.qid, "duplicate record key"));
            }
        }
        Ok(Self { records, index })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Looks up a record by key.
    pub fn get(&self, qid: &str) -> Option<&Record> {
        self.index.get(qid).map(|&i| &self.records[i])
    }

    /// Whether a record with this key exists.
    pub fn contains(&self, qid: &str) -> bool {
        self.index.contains_key(qid)
    }

    /// Record keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.qid.as_str())
    }

    /// The set of record keys.
    pub fn key_set(&self) -> HashSet<&str> {
        self.keys().collect()
    }

    /// Number of records carrying an embedded reading passage.
    pub fn num_with_passage(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.split_context().context.is_some())
            .count()
    }

    /// Returns a one-line summary for logging.
    pub fn summary(&self) -> String {
        let choices: usize = self.records.iter().map(|r| r.choices.len()).sum();
        format!(
            "Dataset: {} records, {} with reading passage, {} options total",
            self.len(),
            self.num_with_passage(),
            choices,
        )
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
