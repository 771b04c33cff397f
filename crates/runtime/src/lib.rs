// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The execution layer that drives a predictor over a dataset.
//!
//! The runtime takes:
//! - A validated [`dataset::Dataset`] from `dataset`.
//! - Any [`predictor::Predictor`] implementation.
//! - Output paths for the predictions and timing files.
//!
//! And runs the model record by record in input order, timing each call
//! with a monotonic clock, then hands the collected sets to `result-writer`
//! for atomic persistence and verification.
//!
//! # Type-State Pipeline
//! The pipeline controller enforces its stage order at compile time:
//! ```text
//! Pipeline<NotStarted> → Pipeline<InputValidated> → Pipeline<OutputValidated> → PipelineReport
//! ```
//!
//! # Concurrency
//! Inference is strictly sequential. The model instance is created once by
//! the caller and borrowed for the whole run.

mod config;
mod error;
mod metrics;
mod pipeline;
mod runner;

pub use config::{FailurePolicy, PipelineConfig, RunnerConfig};
pub use error::{PipelineError, RuntimeError};
pub use metrics::RunMetrics;
pub use pipeline::{
    InputValidated, NotStarted, OutputValidated, Pipeline, PipelineReport, PipelineState, Stage,
};
pub use runner::{InferenceRunner, RunOutput};
