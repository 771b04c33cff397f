// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `batch-infer check-input` command: validate the dataset only.

use crate::PathArgs;
use runtime::Pipeline;
use std::path::PathBuf;
use std::process::ExitCode;

pub fn execute(config: Option<PathBuf>, paths: PathArgs) -> anyhow::Result<ExitCode> {
    super::banner("Input Check");

    let config = super::load_config(config, paths)?;
    println!("  Input: {}", config.input.display());

    let validated = match Pipeline::new(config).validate_input() {
        Ok(v) => v,
        Err(e) => return Ok(super::fail(&e)),
    };

    let dataset = validated.dataset();
    println!("  {}", dataset.summary());
    if let Some(first) = dataset.iter().next() {
        println!("  First record: {}", first.qid);
    }
    println!();
    println!("  Status: OK");

    Ok(ExitCode::SUCCESS)
}
