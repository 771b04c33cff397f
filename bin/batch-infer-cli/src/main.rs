// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # batch-infer
//!
//! Command-line interface for the batch prediction pipeline.
//!
//! ## Usage
//! ```bash
//! # Predict every record with a fixed answer table
//! batch-infer run --input private_test.json --lookup answers.json
//!
//! # Drive an external model, falling back to "A" when it fails
//! batch-infer run --command ./ask-model --arg --temperature=0 --on-error fallback
//!
//! # Validate an input file without running anything
//! batch-infer check-input --input private_test.json
//!
//! # Re-check outputs from an earlier run
//! batch-infer verify --input private_test.json
//! ```
//!
//! Exit status is 0 on success, 1 for configuration errors, and the
//! failing stage's code otherwise (2 missing input, 3 malformed input,
//! 4 inference, 5 write, 6 output validation).

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "batch-infer",
    about = "Run a prediction model over a JSON test set and write submission files",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Input and output locations shared by several subcommands.
#[derive(clap::Args, Debug, Default)]
pub struct PathArgs {
    /// Input JSON dataset.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Predictions CSV to write.
    #[arg(short, long)]
    pub predictions: Option<PathBuf>,

    /// Timing CSV to write.
    #[arg(short, long)]
    pub timings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the model over every record and write both output files.
    Run {
        #[command(flatten)]
        paths: PathArgs,

        /// JSON object mapping qid to answer.
        #[arg(long, conflicts_with = "command")]
        lookup: Option<PathBuf>,

        /// External program that reads a prompt on stdin and prints a completion.
        #[arg(long)]
        command: Option<String>,

        /// Argument passed to the external program (repeatable).
        #[arg(long = "arg", requires = "command", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Per-call timeout for the external program, in seconds.
        #[arg(long, requires = "command")]
        timeout_secs: Option<u64>,

        /// What to do when the model fails for a record: abort or fallback.
        #[arg(long)]
        on_error: Option<runtime::FailurePolicy>,

        /// Extra attempts per record for transient model failures (0 = no retry).
        #[arg(long)]
        retries: Option<u32>,

        /// Fail unless the dataset has at least this many records.
        #[arg(long)]
        min_records: Option<usize>,
    },

    /// Load and validate the input dataset without running the model.
    CheckInput {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Check existing output files against the input dataset.
    Verify {
        #[command(flatten)]
        paths: PathArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            paths,
            lookup,
            command,
            args,
            timeout_secs,
            on_error,
            retries,
            min_records,
        } => commands::run::execute(
            cli.config,
            commands::run::RunArgs {
                paths,
                lookup,
                command,
                args,
                timeout_secs,
                on_error,
                retries,
                min_records,
            },
        ),
        Commands::CheckInput { paths } => commands::check_input::execute(cli.config, paths),
        Commands::Verify { paths } => commands::verify::execute(cli.config, paths),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(commands::CONFIG_ERROR)
        }
    }
}
