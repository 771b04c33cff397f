// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # predictor
//!
//! The model adapter layer. The pipeline never talks to an NLP backend
//! directly; it only sees the [`Predictor`] capability:
//!
//! ```text
//! predict(&Record) -> Result<String, PredictionError>
//! ```
//!
//! # Backends
//! - [`LookupPredictor`] — a fixed `qid → answer` table (replays, tests).
//! - [`CommandPredictor`] — runs an external program per record, feeding it
//!   the rendered prompt on stdin and extracting the answer letter from its
//!   stdout.
//! - [`Retrying`] — wraps any backend with bounded per-record retries.
//!
//! [`PredictorSpec`] selects and builds a backend from configuration.
//!
//! # Example
//! ```
//! use dataset::Record;
//! use predictor::{LookupPredictor, Predictor};
//!
//! let model = LookupPredictor::from_pairs([("a", "greeting")]);
//! let record = Record::new("a", "xin chào", vec![]);
//! assert_eq!(model.predict(&record).unwrap(), "greeting");
//! ```

mod adapters;
pub mod answer;
mod error;
pub mod prompt;
mod retry;
mod spec;

pub use adapters::{CommandPredictor, LookupPredictor};
pub use answer::{extract_answer, DEFAULT_ANSWER};
pub use error::{PredictionError, PredictionErrorKind, SetupError};
pub use retry::Retrying;
pub use spec::PredictorSpec;

use dataset::Record;

/// A prediction capability.
///
/// Implementations must not mutate the record and should be deterministic
/// for a fixed model version. The trait is object-safe so the pipeline can
/// hold any backend as `&dyn Predictor`.
pub trait Predictor: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Produces the answer label for one record.
    fn predict(&self, record: &Record) -> Result<String, PredictionError>;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        (**self).predict(record)
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        (**self).predict(record)
    }
}
