// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backend selection from configuration.
//!
//! # TOML Format
//! ```toml
//! [predictor]
//! kind = "command"
//! program = "python3"
//! args = ["solve.py"]
//! timeout_secs = 60
//! ```
//! or
//! ```toml
//! [predictor]
//! kind = "lookup"
//! path = "answers.json"
//! ```

use crate::{CommandPredictor, LookupPredictor, Predictor, SetupError};
use std::path::PathBuf;
use std::time::Duration;

/// Describes which backend to build.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PredictorSpec {
    /// Fixed answer table loaded from a JSON object file.
    Lookup {
        /// Path to the answer table.
        path: PathBuf,
    },
    /// External program invoked once per record.
    Command {
        /// Program to run.
        program: String,
        /// Arguments passed to the program.
        #[serde(default)]
        args: Vec<String>,
        /// Per-call timeout in seconds.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_timeout_secs() -> u64 {
    120
}

impl PredictorSpec {
    /// Builds the backend. Called once per process; the result is shared
    /// read-only across all records.
    pub fn build(&self) -> Result<Box<dyn Predictor>, SetupError> {
        match self {
            Self::Lookup { path } => Ok(Box::new(LookupPredictor::from_file(path)?)),
            Self::Command {
                program,
                args,
                timeout_secs,
            } => {
                if program.trim().is_empty() {
                    return Err(SetupError::InvalidSpec("empty command program".into()));
                }
                if *timeout_secs == 0 {
                    return Err(SetupError::InvalidSpec("timeout_secs must be positive".into()));
                }
                tracing::info!("command backend: {program} {}", args.join(" "));
                Ok(Box::new(CommandPredictor::new(
                    program.clone(),
                    args.clone(),
                    Duration::from_secs(*timeout_secs),
                )))
            }
        }
    }

    /// Short description for status output.
    pub fn describe(&self) -> String {
        match self {
            Self::Lookup { path } => format!("lookup ({})", path.display()),
            Self::Command { program, .. } => format!("command ({program})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Wrapper {
        predictor: PredictorSpec,
    }

    #[test]
    fn test_parse_command_defaults() {
        let w: Wrapper = toml::from_str(
            r#"
[predictor]
kind = "command"
program = "python3"
"#,
        )
        .unwrap();
        assert_eq!(
            w.predictor,
            PredictorSpec::Command {
                program: "python3".into(),
                args: vec![],
                timeout_secs: 120,
            }
        );
    }

    #[test]
    fn test_parse_lookup() {
        let w: Wrapper = toml::from_str(
            r#"
[predictor]
kind = "lookup"
path = "/tmp/answers.json"
"#,
        )
        .unwrap();
        assert_eq!(w.predictor.describe(), "lookup (/tmp/answers.json)");
    }

    #[test]
    fn test_build_rejects_invalid_command() {
        let spec = PredictorSpec::Command {
            program: " ".into(),
            args: vec![],
            timeout_secs: 10,
        };
        assert!(matches!(spec.build(), Err(SetupError::InvalidSpec(_))));

        let spec = PredictorSpec::Command {
            program: "sh".into(),
            args: vec![],
            timeout_secs: 0,
        };
        assert!(matches!(spec.build(), Err(SetupError::InvalidSpec(_))));
    }

    #[test]
    fn test_build_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, r#"{"a": "B"}"#).unwrap();
        let p = PredictorSpec::Lookup { path }.build().unwrap();
        assert_eq!(p.name(), "lookup");
    }
}
