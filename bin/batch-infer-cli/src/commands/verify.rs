// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `batch-infer verify` command: re-check outputs of an earlier run
//! against the input they were produced from.

use crate::PathArgs;
use runtime::{Pipeline, PipelineError};
use std::path::PathBuf;
use std::process::ExitCode;

pub fn execute(config: Option<PathBuf>, paths: PathArgs) -> anyhow::Result<ExitCode> {
    super::banner("Output Verification");

    let config = super::load_config(config, paths)?;
    let predictions = config.predictions.clone();
    let timings = config.timings.clone();

    let validated = match Pipeline::new(config).validate_input() {
        Ok(v) => v,
        Err(e) => return Ok(super::fail(&e)),
    };
    let expected = validated.dataset().key_set();

    println!("  Predictions: {}", predictions.display());
    println!("  Timings:     {}", timings.display());

    match result_writer::verify_outputs(&predictions, &timings, &expected) {
        Ok(summary) => {
            println!(
                "  Rows:        {} predictions, {} timings",
                summary.predictions, summary.timings
            );
            println!();
            println!("  Status: OK");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(super::fail(&PipelineError::from(e))),
    }
}
