// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # result-writer
//!
//! Persists a run's results as two CSV files and checks them afterwards.
//!
//! - [`ResultSet`] / [`TimingSet`] — keyed, insertion-ordered collections of
//!   [`Prediction`]s and [`TimingEntry`]s. Duplicate keys are rejected.
//! - [`AtomicFile`] — an RAII guard over a temporary file in the target
//!   directory. `commit()` fsyncs and renames it into place; dropping the
//!   guard without committing deletes the temporary file.
//! - [`ResultWriter`] — stages both files, then commits both.
//! - [`verify_outputs`] — re-reads both files and checks header, row
//!   shape, durations and the key set.
//!
//! # Output Format
//! ```text
//! predictions:  qid,answer            timings:  qid,elapsed_seconds
//!               test_0001,B                     test_0001,1.2345
//! ```
//!
//! # Write Lifecycle
//! ```text
//! AtomicFile::create(final)  ──▶  .final.XXXX.tmp  (same directory)
//!       │ write rows
//!       │ commit()  ── fsync + rename ──▶  final
//!       │ drop() without commit ─────────▶  temp file removed
//! ```

mod atomic;
mod error;
mod sets;
mod verify;
mod writer;

pub use atomic::AtomicFile;
pub use error::{DuplicateKey, OutputCheckError, WriteError};
pub use sets::{Prediction, ResultSet, TimingEntry, TimingSet};
pub use verify::{verify_outputs, OutputSummary};
pub use writer::{write_predictions, write_timings, ResultWriter, PREDICTION_HEADER, TIMING_HEADER};
