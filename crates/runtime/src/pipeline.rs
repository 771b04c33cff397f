// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The pipeline controller with type-state–enforced stages.
//!
//! ```text
//! Pipeline<NotStarted>
//!     │  .validate_input()        input exists and parses
//!     ▼
//! Pipeline<InputValidated>
//!     │  .execute(&predictor)     Running: infer → write → verify
//!     ▼
//! Pipeline<OutputValidated>
//!     │  .finish()
//!     ▼
//!   PipelineReport              Done
//! ```
//!
//! Each transition consumes the old value and returns a new one. Any
//! failure returns a [`PipelineError`] instead (the `Failed` state), which
//! names the failing [`Stage`] and maps to a process exit code. No output
//! file is touched before the input has been validated.

use crate::{InferenceRunner, PipelineConfig, PipelineError, RunMetrics, RunOutput, RuntimeError};
use dataset::{Dataset, DatasetLoader};
use predictor::Predictor;
use result_writer::{verify_outputs, OutputSummary, ResultWriter};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// The step of the pipeline that was executing when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Checking the configuration before anything is read.
    Configuration,
    /// Checking that the input exists and parses.
    InputValidation,
    /// Running the model over the dataset.
    Inference,
    /// Persisting the output files.
    Write,
    /// Checking the persisted outputs.
    OutputValidation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::InputValidation => "input validation",
            Self::Inference => "inference",
            Self::Write => "write",
            Self::OutputValidation => "output validation",
        };
        f.write_str(name)
    }
}

// ── Type-state markers ─────────────────────────────────────────

/// Nothing has been read yet.
#[derive(Debug)]
pub struct NotStarted;

/// The dataset has been loaded and validated.
#[derive(Debug)]
pub struct InputValidated {
    dataset: Dataset,
}

/// Both outputs have been written and validated.
#[derive(Debug)]
pub struct OutputValidated {
    dataset: Dataset,
    output: RunOutput,
    summary: OutputSummary,
}

/// Marker trait for pipeline states.
pub trait PipelineState: std::fmt::Debug {}
impl PipelineState for NotStarted {}
impl PipelineState for InputValidated {}
impl PipelineState for OutputValidated {}

// ── Report ─────────────────────────────────────────────────────

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of records processed.
    pub records: usize,
    /// Where the predictions were written.
    pub predictions: PathBuf,
    /// Where the timings were written.
    pub timings: PathBuf,
    /// Aggregate latency metrics.
    pub metrics: RunMetrics,
}

impl PipelineReport {
    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} records -> {}, {}\n{}",
            self.records,
            self.predictions.display(),
            self.timings.display(),
            self.metrics.summary(),
        )
    }
}

// ── Pipeline ───────────────────────────────────────────────────

/// The batch prediction pipeline.
///
/// # Example
/// ```no_run
/// use predictor::LookupPredictor;
/// use runtime::{Pipeline, PipelineConfig};
///
/// # fn example() -> Result<(), runtime::PipelineError> {
/// let model = LookupPredictor::from_pairs([("test_0001", "B")]);
/// let report = Pipeline::new(PipelineConfig::default())
///     .validate_input()?
///     .execute(&model)?
///     .finish();
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<S: PipelineState = NotStarted> {
    config: PipelineConfig,
    cancel: Option<Arc<AtomicBool>>,
    state: S,
}

impl<S: PipelineState> Pipeline<S> {
    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn with_state<T: PipelineState>(self, state: T) -> Pipeline<T> {
        Pipeline {
            config: self.config,
            cancel: self.cancel,
            state,
        }
    }
}

// ── NotStarted → InputValidated ────────────────────────────────

impl Pipeline<NotStarted> {
    /// Creates a pipeline from the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: None,
            state: NotStarted,
        }
    }

    /// Installs a cancellation flag checked between records.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Loads and validates the input dataset.
    pub fn validate_input(self) -> Result<Pipeline<InputValidated>, PipelineError> {
        Self::check_config(&self.config)?;
        tracing::info!("[1/3] validating input {}", self.config.input.display());
        let dataset = DatasetLoader::load(&self.config.input).map_err(|e| {
            tracing::error!("input validation failed: {e}");
            PipelineError::from(e)
        })?;
        Self::check_min_records(&dataset, self.config.min_records)?;
        tracing::info!("      {}", dataset.summary());
        Ok(self.with_state(InputValidated { dataset }))
    }

    /// Starts from an already-loaded dataset (for testing and embedding).
    pub fn from_dataset(
        config: PipelineConfig,
        dataset: Dataset,
    ) -> Result<Pipeline<InputValidated>, PipelineError> {
        Self::check_config(&config)?;
        Self::check_min_records(&dataset, config.min_records)?;
        Ok(Pipeline::new(config).with_state(InputValidated { dataset }))
    }

    fn check_config(config: &PipelineConfig) -> Result<(), PipelineError> {
        config.validate().map_err(|e| {
            tracing::error!("configuration rejected: {e}");
            match e {
                RuntimeError::ConfigError(detail) => PipelineError::Config(detail),
                other => PipelineError::Config(other.to_string()),
            }
        })
    }

    fn check_min_records(dataset: &Dataset, required: usize) -> Result<(), PipelineError> {
        if dataset.len() < required {
            tracing::error!("dataset has {} records, {required} required", dataset.len());
            return Err(PipelineError::TooFewRecords {
                found: dataset.len(),
                required,
            });
        }
        Ok(())
    }
}

// ── InputValidated → OutputValidated ───────────────────────────

impl Pipeline<InputValidated> {
    /// The validated dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.state.dataset
    }

    /// Runs inference, writes both outputs, then validates them.
    pub fn execute(
        self,
        predictor: &dyn Predictor,
    ) -> Result<Pipeline<OutputValidated>, PipelineError> {
        let config = &self.config;
        let dataset = &self.state.dataset;

        tracing::info!("[2/3] running '{}' over {} records", predictor.name(), dataset.len());
        let mut runner = InferenceRunner::new(config.runner.clone());
        if let Some(flag) = &self.cancel {
            runner = runner.with_cancel_flag(Arc::clone(flag));
        }
        let output = runner.run(dataset, predictor).map_err(|e| {
            tracing::error!("inference failed: {e}");
            PipelineError::from(e)
        })?;

        ResultWriter::write(
            &output.results,
            &output.timings,
            &config.predictions,
            &config.timings,
        )
        .map_err(|e| {
            tracing::error!("write failed: {e}");
            PipelineError::from(e)
        })?;

        tracing::info!("[3/3] validating outputs");
        let summary = verify_outputs(&config.predictions, &config.timings, &dataset.key_set())
            .map_err(|e| {
                tracing::error!("output validation failed: {e}");
                discard_outputs(config);
                PipelineError::from(e)
            })?;

        let InputValidated { dataset } = self.state;
        Ok(Pipeline {
            config: self.config,
            cancel: self.cancel,
            state: OutputValidated {
                dataset,
                output,
                summary,
            },
        })
    }
}

// ── OutputValidated → Done ─────────────────────────────────────

impl Pipeline<OutputValidated> {
    /// The inference outputs.
    pub fn output(&self) -> &RunOutput {
        &self.state.output
    }

    /// Row counts of the validated files.
    pub fn output_summary(&self) -> OutputSummary {
        self.state.summary
    }

    /// Completes the run.
    pub fn finish(self) -> PipelineReport {
        let report = PipelineReport {
            records: self.state.dataset.len(),
            predictions: self.config.predictions,
            timings: self.config.timings,
            metrics: self.state.output.metrics,
        };
        tracing::info!("done: {} records", report.records);
        report
    }
}

/// Removes both output files so a failed run leaves nothing behind.
fn discard_outputs(config: &PipelineConfig) {
    for path in [&config.predictions, &config.timings] {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::warn!("removed rejected output {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("could not remove {}: {e}", path.display()),
        }
    }
}

impl<S: PipelineState> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("state", &std::any::type_name::<S>())
            .field("input", &self.config.input)
            .field("predictions", &self.config.predictions)
            .field("timings", &self.config.timings)
            .finish()
    }
}
