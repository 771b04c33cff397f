// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Extracting the chosen option letter from a free-text completion.
//!
//! Language models rarely answer with exactly one letter. Extraction tries,
//! in order:
//!
//! 1. An explicit marker (`Đáp án: B`, `Chọn C`, `Trả lời - D`,
//!    `Kết quả: A`) or a letter standing on its own after whitespace,
//!    optionally followed by `.`.
//! 2. A line consisting of a single capital letter.
//! 3. Any standalone capital letter.
//!
//! Anything that yields no letter, or a letter past the record's last
//! option, falls back to [`DEFAULT_ANSWER`].

use regex::Regex;
use std::sync::OnceLock;

/// Answer used when no valid letter can be extracted.
pub const DEFAULT_ANSWER: &str = "A";

fn marker_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|\s|đáp án|chọn|trả lời|kết quả)\s*[:\-]?\s*([A-Z])(?:[.\s]|$)")
            .expect("marker pattern is valid")
    })
}

fn single_line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([A-Z])$").expect("line pattern is valid"))
}

fn standalone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z])\b").expect("standalone pattern is valid"))
}

/// Extracts the option letter from `raw`.
///
/// `max_letter` is the last valid option (`None` accepts any letter).
pub fn extract_answer(raw: &str, max_letter: Option<char>) -> String {
    let letter = find_letter(raw);

    match (letter, max_letter) {
        (None, _) => {
            tracing::debug!("no answer letter in completion {:?}", preview(raw));
            DEFAULT_ANSWER.to_string()
        }
        (Some(l), Some(max)) if l > max => {
            tracing::warn!("answer '{l}' exceeds choices (max={max}), defaulting to {DEFAULT_ANSWER}");
            DEFAULT_ANSWER.to_string()
        }
        (Some(l), _) => l.to_string(),
    }
}

fn find_letter(raw: &str) -> Option<char> {
    let capture = |re: &Regex, text: &str| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase())
    };

    capture(marker_pattern(), raw)
        .or_else(|| capture(single_line_pattern(), raw.trim()))
        .or_else(|| capture(standalone_pattern(), raw))
        .filter(char::is_ascii_uppercase)
}

/// First 30 characters of a completion, for log lines.
fn preview(raw: &str) -> String {
    raw.chars().take(30).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_letter() {
        assert_eq!(extract_answer("B", Some('D')), "B");
        assert_eq!(extract_answer("  C\n", Some('D')), "C");
    }

    #[test]
    fn test_vietnamese_markers() {
        assert_eq!(extract_answer("Đáp án: C", Some('D')), "C");
        assert_eq!(extract_answer("đáp án là gì? Chọn D.", Some('D')), "D");
        assert_eq!(extract_answer("Trả lời - B", Some('D')), "B");
        assert_eq!(extract_answer("Kết quả:A", Some('D')), "A");
    }

    #[test]
    fn test_letter_with_period() {
        assert_eq!(extract_answer("B. 30 kPa", Some('D')), "B");
    }

    #[test]
    fn test_lowercase_after_marker() {
        assert_eq!(extract_answer("Chọn c", Some('D')), "C");
    }

    #[test]
    fn test_letter_in_sentence() {
        assert_eq!(extract_answer("The answer is B", Some('D')), "B");
    }

    #[test]
    fn test_standalone_fallback() {
        // No whitespace before the letter, so only the word-boundary scan finds it.
        assert_eq!(extract_answer("(F)", Some('F')), "F");
    }

    #[test]
    fn test_no_letter_defaults() {
        assert_eq!(extract_answer("", Some('D')), DEFAULT_ANSWER);
        assert_eq!(extract_answer("15 kPa", Some('D')), DEFAULT_ANSWER);
    }

    #[test]
    fn test_out_of_range_defaults() {
        assert_eq!(extract_answer("E", Some('D')), DEFAULT_ANSWER);
        assert_eq!(extract_answer("E", Some('F')), "E");
    }

    #[test]
    fn test_no_choices_accepts_any_letter() {
        assert_eq!(extract_answer("Z", None), "Z");
    }
}
