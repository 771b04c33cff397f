// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The sequential inference loop.
//!
//! For each record, in dataset order:
//!
//! ```text
//!   Instant::now() ─▶ predictor.predict(record) [+ retries] ─▶ elapsed()
//!        │
//!        ├─ Ok(answer)              → ResultSet + TimingSet
//!        └─ Err(e)
//!             ├─ policy = abort     → RuntimeError::Prediction
//!             └─ policy = fallback  → fallback answer + measured time
//! ```
//!
//! Records are processed one at a time; the predictor is borrowed for the
//! whole run and never called concurrently.

use crate::{FailurePolicy, RunMetrics, RunnerConfig, RuntimeError};
use dataset::{Dataset, Record};
use predictor::{PredictionError, PredictionErrorKind, Predictor, Retrying};
use result_writer::{ResultSet, TimingSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// The outputs of one inference run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// One prediction per record, in dataset order.
    pub results: ResultSet,
    /// One timing entry per record, in dataset order.
    pub timings: TimingSet,
    /// Aggregate latency metrics.
    pub metrics: RunMetrics,
}

/// Runs a predictor over every record of a dataset.
///
/// # Example
/// ```
/// use dataset::{Dataset, Record};
/// use predictor::LookupPredictor;
/// use runtime::{InferenceRunner, RunnerConfig};
///
/// let dataset = Dataset::from_records(vec![Record::new("a", "xin chào", vec![])]).unwrap();
/// let model = LookupPredictor::from_pairs([("a", "greeting")]);
///
/// let output = InferenceRunner::new(RunnerConfig::default())
///     .run(&dataset, &model)
///     .unwrap();
/// assert_eq!(output.results.get("a"), Some("greeting"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InferenceRunner {
    config: RunnerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl InferenceRunner {
    /// Creates a runner from the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Installs a cancellation flag, checked between records only.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The runner's configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `predictor` over `dataset`.
    ///
    /// On success the key sets of both output collections equal the
    /// dataset's key set.
    pub fn run(&self, dataset: &Dataset, predictor: &dyn Predictor) -> Result<RunOutput, RuntimeError> {
        self.config.validate()?;

        let run_start = Instant::now();
        let total = dataset.len();
        let model = Retrying::new(predictor, self.config.max_attempts, self.config.backoff());
        let mut results = ResultSet::with_capacity(total);
        let mut timings = TimingSet::with_capacity(total);
        let mut metrics = RunMetrics::new();

        tracing::info!(
            "starting inference: {total} records, backend '{}', policy {:?}, {} attempt(s) per record",
            model.name(),
            self.config.on_error,
            model.max_attempts(),
        );

        for (idx, record) in dataset.iter().enumerate() {
            if self.is_cancelled() {
                tracing::warn!("cancellation requested after {idx}/{total} records");
                return Err(RuntimeError::Cancelled {
                    completed: idx,
                    total,
                });
            }

            let start = Instant::now();
            let outcome = model.predict(record).and_then(|answer| reject_blank(record, answer));
            let elapsed = start.elapsed();

            let (answer, fallback) = match outcome {
                Ok(answer) => (answer, false),
                Err(e) => match self.config.on_error {
                    FailurePolicy::Abort => {
                        tracing::error!("[{}/{total}] {}: {e}", idx + 1, record.qid);
                        return Err(e.into());
                    }
                    FailurePolicy::Fallback => {
                        tracing::warn!(
                            "[{}/{total}] {}: {e}; using fallback '{}'",
                            idx + 1,
                            record.qid,
                            self.config.fallback_answer,
                        );
                        (self.config.fallback_answer.clone(), true)
                    }
                },
            };

            tracing::debug!(
                "[{}/{total}] {}: {answer} ({:.4}s)",
                idx + 1,
                record.qid,
                elapsed.as_secs_f64(),
            );

            results
                .insert(record.qid.as_str(), answer)
                .map_err(|e| RuntimeError::Incomplete(format!("predictions: {e}")))?;
            timings
                .insert(record.qid.as_str(), elapsed)
                .map_err(|e| RuntimeError::Incomplete(format!("timings: {e}")))?;
            metrics.record(elapsed, fallback);

            let interval = self.config.progress_interval;
            if interval > 0 && (idx + 1) % interval == 0 {
                tracing::info!("progress: {}/{total} records", idx + 1);
            }
        }

        check_coverage(dataset, &results, &timings)?;

        metrics.finalise(run_start.elapsed());
        tracing::info!("{}", metrics.summary());

        Ok(RunOutput {
            results,
            timings,
            metrics,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// A blank label is never a valid prediction.
fn reject_blank(record: &Record, answer: String) -> Result<String, PredictionError> {
    if answer.trim().is_empty() {
        return Err(PredictionError::new(&record.qid, PredictionErrorKind::NoAnswer));
    }
    Ok(answer)
}

/// Checks that both collections cover exactly the dataset's keys.
fn check_coverage(
    dataset: &Dataset,
    results: &ResultSet,
    timings: &TimingSet,
) -> Result<(), RuntimeError> {
    let expected = dataset.key_set();
    if results.key_set() != expected {
        return Err(RuntimeError::Incomplete(format!(
            "{} predictions for {} records",
            results.len(),
            dataset.len()
        )));
    }
    if timings.key_set() != expected {
        return Err(RuntimeError::Incomplete(format!(
            "{} timing entries for {} records",
            timings.len(),
            dataset.len()
        )));
    }
    Ok(())
}
