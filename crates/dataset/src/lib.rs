// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dataset
//!
//! The input side of the batch pipeline: typed records and the loader that
//! turns a JSON test file into an ordered, validated [`Dataset`].
//!
//! - [`Record`] — one question: a unique `qid`, the question text, and the
//!   answer options.
//! - [`Dataset`] — the ordered, read-only collection of records for one run.
//!   Keys are guaranteed unique.
//! - [`DatasetLoader`] — reads and validates the input file.
//!
//! # Input Format
//! ```json
//! [
//!   {
//!     "qid": "test_0001",
//!     "question": "Thủ đô của Việt Nam là gì?",
//!     "choices": ["Hà Nội", "Huế", "Đà Nẵng", "Sài Gòn"]
//!   }
//! ]
//! ```
//!
//! # Example
//! ```no_run
//! use dataset::DatasetLoader;
//! use std::path::Path;
//!
//! let dataset = DatasetLoader::load(Path::new("/code/private_test.json")).unwrap();
//! for record in dataset.iter() {
//!     println!("{}: {}", record.qid, record.question);
//! }
//! ```

mod error;
mod loader;
mod record;

pub use error::DatasetError;
pub use loader::DatasetLoader;
pub use record::{Dataset, Record, SplitQuestion};
