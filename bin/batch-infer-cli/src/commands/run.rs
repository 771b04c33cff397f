// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `batch-infer run` command: predict every record and write the outputs.
//!
//! Drives the full type-state pipeline:
//! ```text
//! Pipeline<NotStarted> → validate_input → <InputValidated> → execute → <OutputValidated> → finish
//! ```

use crate::PathArgs;
use anyhow::Context;
use predictor::{Predictor, PredictorSpec};
use runtime::{FailurePolicy, Pipeline, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Flags accepted by `run`, on top of the shared paths.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub paths: PathArgs,
    pub lookup: Option<PathBuf>,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub on_error: Option<FailurePolicy>,
    pub retries: Option<u32>,
    pub min_records: Option<usize>,
}

pub fn execute(config: Option<PathBuf>, args: RunArgs) -> anyhow::Result<ExitCode> {
    super::banner("Batch Predictor");

    // ── Configuration ──────────────────────────────────────────
    let RunArgs {
        paths,
        lookup,
        command,
        args,
        timeout_secs,
        on_error,
        retries,
        min_records,
    } = args;

    let mut config = super::load_config(config, paths)?;
    apply_overrides(&mut config, on_error, retries, min_records);
    if let Some(spec) = predictor_override(lookup, command, args, timeout_secs) {
        config.predictor = Some(spec);
    }
    config.validate().context("invalid configuration")?;

    let spec = config
        .predictor
        .clone()
        .context("no predictor configured; pass --lookup, --command, or a [predictor] table")?;

    print_config(&config, &spec);

    // ── Type-State Pipeline ────────────────────────────────────
    println!("  [1/3] Validating input...");
    let validated = match Pipeline::new(config).validate_input() {
        Ok(v) => v,
        Err(e) => return Ok(super::fail(&e)),
    };
    println!("        {}", validated.dataset().summary());
    println!();

    // The model is built once and borrowed for the whole run.
    let model: Box<dyn Predictor> = spec.build().context("building predictor")?;

    println!("  [2/3] Running '{}'...", model.name());
    let done = match validated.execute(model.as_ref()) {
        Ok(d) => d,
        Err(e) => return Ok(super::fail(&e)),
    };
    println!("  [3/3] Outputs verified.");
    println!();

    let report = done.finish();
    println!("  Results:");
    for line in report.summary().lines() {
        println!("   {line}");
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

/// Applies runner flags on top of the loaded configuration.
///
/// `retries` counts additional attempts, so `--retries 2` allows three
/// calls per record.
fn apply_overrides(
    config: &mut PipelineConfig,
    on_error: Option<FailurePolicy>,
    retries: Option<u32>,
    min_records: Option<usize>,
) {
    if let Some(policy) = on_error {
        config.runner.on_error = policy;
    }
    if let Some(retries) = retries {
        config.runner.max_attempts = retries.saturating_add(1);
    }
    if let Some(min) = min_records {
        config.min_records = min;
    }
}

/// Builds a predictor spec from CLI flags, if any were given.
fn predictor_override(
    lookup: Option<PathBuf>,
    command: Option<String>,
    args: Vec<String>,
    timeout_secs: Option<u64>,
) -> Option<PredictorSpec> {
    if let Some(path) = lookup {
        return Some(PredictorSpec::Lookup { path });
    }
    command.map(|program| PredictorSpec::Command {
        program,
        args,
        timeout_secs: timeout_secs.unwrap_or(120),
    })
}

fn print_config(config: &PipelineConfig, spec: &PredictorSpec) {
    println!("  Config:");
    println!("   Input:       {}", config.input.display());
    println!("   Predictions: {}", config.predictions.display());
    println!("   Timings:     {}", config.timings.display());
    println!("   Model:       {}", spec.describe());
    println!(
        "   On error:    {:?} (attempts: {})",
        config.runner.on_error, config.runner.max_attempts
    );
    println!();
}
