// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare failure policies on an unreliable model.
//!
//! Runs the same synthetic dataset through a model that fails every few
//! calls, once per runner configuration, and prints how many records each
//! configuration completed and how many fell back to the default answer.
//!
//! ```bash
//! cargo run -p runtime --example failure_policies
//! ```

use dataset::{Dataset, Record};
use predictor::{PredictionError, PredictionErrorKind, Predictor};
use runtime::{FailurePolicy, InferenceRunner, RunnerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails on every `period`-th call with a transient backend error.
struct Unreliable {
    period: usize,
    calls: AtomicUsize,
}

impl Predictor for Unreliable {
    fn name(&self) -> &str {
        "unreliable"
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n % self.period == 0 {
            return Err(PredictionError::new(
                &record.qid,
                PredictionErrorKind::Backend("connection reset".into()),
            ));
        }
        Ok(["A", "B", "C", "D"][record.qid.len() % 4].to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .init();

    let records = (0..200)
        .map(|i| {
            Record::new(
                format!("test_{i:04}"),
                format!("Câu hỏi số {i}?"),
                vec!["một".into(), "hai".into(), "ba".into(), "bốn".into()],
            )
        })
        .collect();
    let dataset = Dataset::from_records(records)?;
    println!("Dataset: {}\n", dataset.summary());

    let configs = [
        ("abort", RunnerConfig::default()),
        (
            "fallback",
            RunnerConfig {
                on_error: FailurePolicy::Fallback,
                ..Default::default()
            },
        ),
        (
            "fallback+retry",
            RunnerConfig {
                on_error: FailurePolicy::Fallback,
                max_attempts: 3,
                ..Default::default()
            },
        ),
    ];

    println!("{:<18} {:>10} {:>10} {:>14}", "Policy", "Records", "Fallbacks", "Mean latency");
    println!("{}", "-".repeat(56));

    for (label, config) in configs {
        let model = Unreliable {
            period: 7,
            calls: AtomicUsize::new(0),
        };
        match InferenceRunner::new(config).run(&dataset, &model) {
            Ok(output) => println!(
                "{:<18} {:>10} {:>10} {:>14}",
                label,
                output.metrics.records,
                output.metrics.fallbacks,
                format!("{:.2?}", output.metrics.mean_latency()),
            ),
            Err(e) => println!("{label:<18} {:>10} ({e})", "FAILED"),
        }
    }

    Ok(())
}
