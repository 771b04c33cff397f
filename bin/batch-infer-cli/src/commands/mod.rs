// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared helpers.

pub mod check_input;
pub mod run;
pub mod verify;

use crate::PathArgs;
use anyhow::Context;
use runtime::{PipelineConfig, PipelineError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for configuration and argument errors.
pub const CONFIG_ERROR: u8 = 1;

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (if any) and applies path overrides.
pub fn load_config(config: Option<PathBuf>, paths: PathArgs) -> anyhow::Result<PipelineConfig> {
    let mut loaded = match &config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = paths.input {
        loaded.input = input;
    }
    if let Some(predictions) = paths.predictions {
        loaded.predictions = predictions;
    }
    if let Some(timings) = paths.timings {
        loaded.timings = timings;
    }
    Ok(loaded)
}

/// Reports a pipeline failure and maps it to its exit status.
pub fn fail(err: &PipelineError) -> ExitCode {
    tracing::error!(stage = %err.stage(), "{err}");
    eprintln!("error ({}): {err}", err.stage());
    ExitCode::from(err.exit_code())
}

pub(crate) fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║  {:<52}║", format!("batch-infer · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}
