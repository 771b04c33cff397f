// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! input = "/code/private_test.json"
//! predictions = "/code/submission.csv"
//! timings = "/code/submission_time.csv"
//! min_records = 0
//!
//! [runner]
//! on_error = "abort"        # or "fallback"
//! fallback_answer = "A"
//! max_attempts = 1
//! backoff_ms = 500
//! progress_interval = 50
//!
//! [predictor]
//! kind = "command"
//! program = "python3"
//! args = ["solve.py"]
//! timeout_secs = 120
//! ```

use crate::RuntimeError;
use predictor::PredictorSpec;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// What the runner does when the model fails for a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run and surface the error.
    #[default]
    Abort,
    /// Record the fallback answer and continue.
    Fallback,
}

impl std::str::FromStr for FailurePolicy {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "fallback" => Ok(Self::Fallback),
            other => Err(RuntimeError::ConfigError(format!(
                "unknown failure policy '{other}'; expected 'abort' or 'fallback'"
            ))),
        }
    }
}

/// Configuration for the inference runner.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunnerConfig {
    /// Failure policy for model errors.
    #[serde(default)]
    pub on_error: FailurePolicy,
    /// Answer recorded under [`FailurePolicy::Fallback`].
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
    /// Calls per record before a transient failure is final (1 = no retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds.
    #[serde(default)]
    pub backoff_ms: u64,
    /// Log a progress line every N records (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_fallback_answer() -> String {
    predictor::DEFAULT_ANSWER.to_string()
}

fn default_max_attempts() -> u32 {
    1
}

fn default_progress_interval() -> usize {
    50
}

impl RunnerConfig {
    /// Pause between attempts.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_attempts == 0 {
            return Err(RuntimeError::ConfigError("max_attempts must be at least 1".into()));
        }
        if self.on_error == FailurePolicy::Fallback && self.fallback_answer.trim().is_empty() {
            return Err(RuntimeError::ConfigError(
                "fallback policy requires a non-empty fallback_answer".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            on_error: FailurePolicy::Abort,
            fallback_answer: default_fallback_answer(),
            max_attempts: default_max_attempts(),
            backoff_ms: 0,
            progress_interval: default_progress_interval(),
        }
    }
}

/// Configuration for a full pipeline run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineConfig {
    /// Path to the input dataset.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Path of the predictions CSV.
    #[serde(default = "default_predictions")]
    pub predictions: PathBuf,
    /// Path of the timing CSV.
    #[serde(default = "default_timings")]
    pub timings: PathBuf,
    /// Minimum number of records for the input to be accepted.
    #[serde(default)]
    pub min_records: usize,
    /// Runner settings.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Model backend. May be supplied on the command line instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictor: Option<PredictorSpec>,
}

fn default_input() -> PathBuf {
    PathBuf::from("/code/private_test.json")
}

fn default_predictions() -> PathBuf {
    PathBuf::from("/code/submission.csv")
}

fn default_timings() -> PathBuf {
    PathBuf::from("/code/submission_time.csv")
}

impl PipelineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if output_target(&self.predictions) == output_target(&self.timings) {
            return Err(RuntimeError::ConfigError(format!(
                "predictions and timings must be different files (both '{}')",
                self.predictions.display()
            )));
        }
        self.runner.validate()
    }
}

/// Where a write to `path` lands: the canonical parent directory joined
/// with the file name, or the path without `.` components when the parent
/// does not exist yet.
fn output_target(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect(),
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            predictions: default_predictions(),
            timings: default_timings(),
            min_records: 0,
            runner: RunnerConfig::default(),
            predictor: None,
        }
    }
}
