// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runner and pipeline controller.

use crate::Stage;

/// Errors that can occur while running inference over a dataset.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The model failed for a record and the failure policy is `abort`.
    #[error(transparent)]
    Prediction(#[from] predictor::PredictionError),

    /// The results do not cover the dataset exactly once.
    #[error("incomplete results: {0}")]
    Incomplete(String),

    /// The run was cancelled at a record boundary.
    #[error("cancelled after {completed} of {total} records")]
    Cancelled { completed: usize, total: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// A pipeline failure, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The pipeline configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The input file is missing or malformed.
    #[error("input validation failed: {0}")]
    Input(#[from] dataset::DatasetError),

    /// The dataset is smaller than the configured minimum.
    #[error("input validation failed: {found} records, at least {required} required")]
    TooFewRecords { found: usize, required: usize },

    /// Inference did not complete.
    #[error("inference failed: {0}")]
    Inference(#[from] RuntimeError),

    /// The outputs could not be persisted.
    #[error("writing outputs failed: {0}")]
    Write(#[from] result_writer::WriteError),

    /// The outputs were written but do not pass validation.
    #[error("output validation failed: {0}")]
    OutputValidation(#[from] result_writer::OutputCheckError),
}

impl PipelineError {
    /// The stage in which the failure occurred.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config(_) => Stage::Configuration,
            Self::Input(_) | Self::TooFewRecords { .. } => Stage::InputValidation,
            Self::Inference(_) => Stage::Inference,
            Self::Write(_) => Stage::Write,
            Self::OutputValidation(_) => Stage::OutputValidation,
        }
    }

    /// Process exit code for this failure.
    ///
    /// | Code | Failure |
    /// |------|---------|
    /// | 1 | configuration |
    /// | 2 | input file missing |
    /// | 3 | input malformed or too small |
    /// | 4 | inference |
    /// | 5 | writing outputs |
    /// | 6 | output validation |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Input(dataset::DatasetError::MissingInput { .. }) => 2,
            Self::Input(_) | Self::TooFewRecords { .. } => 3,
            Self::Inference(_) => 4,
            Self::Write(_) => 5,
            Self::OutputValidation(_) => 6,
        }
    }
}
