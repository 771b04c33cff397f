// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded per-record retries.

use crate::{PredictionError, Predictor};
use dataset::Record;
use std::time::Duration;

/// Retries transient failures of an inner predictor.
///
/// At most `max_attempts` calls are made per record, sleeping `backoff`
/// between them. Non-transient failures (e.g., a missing answer) are
/// returned immediately. When attempts are exhausted the last error is
/// returned.
#[derive(Debug, Clone)]
pub struct Retrying<P> {
    inner: P,
    max_attempts: u32,
    backoff: Duration,
}

impl<P: Predictor> Retrying<P> {
    /// Wraps `inner`. `max_attempts` is clamped to at least 1.
    pub fn new(inner: P, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Maximum calls per record.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the wrapped predictor.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Predictor> Predictor for Retrying<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn predict(&self, record: &Record) -> Result<String, PredictionError> {
        let mut attempt = 1;
        loop {
            match self.inner.predict(record) {
                Ok(answer) => return Ok(answer),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        "attempt {attempt}/{} failed for {}: {}; retrying in {:?}",
                        self.max_attempts,
                        record.qid,
                        e.kind,
                        self.backoff,
                    );
                    std::thread::sleep(self.backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PredictionErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with a backend error for the first `failures` calls.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Predictor for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        fn predict(&self, record: &Record) -> Result<String, PredictionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(PredictionError::new(
                    &record.qid,
                    PredictionErrorKind::Backend("busy".into()),
                ))
            } else {
                Ok("B".into())
            }
        }
    }

    struct NeverKnows;

    impl Predictor for NeverKnows {
        fn name(&self) -> &str {
            "never"
        }

        fn predict(&self, record: &Record) -> Result<String, PredictionError> {
            Err(PredictionError::new(&record.qid, PredictionErrorKind::NoAnswer))
        }
    }

    fn rec() -> Record {
        Record::new("q", "?", vec![])
    }

    #[test]
    fn test_recovers_within_budget() {
        let p = Retrying::new(Flaky::new(2), 3, Duration::ZERO);
        assert_eq!(p.predict(&rec()).unwrap(), "B");
        assert_eq!(p.into_inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_exhausts_budget() {
        let p = Retrying::new(Flaky::new(5), 3, Duration::ZERO);
        let err = p.predict(&rec()).unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::Backend(_)));
        assert_eq!(p.into_inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_single_attempt_does_not_retry() {
        let p = Retrying::new(Flaky::new(1), 0, Duration::ZERO);
        assert_eq!(p.max_attempts(), 1);
        assert!(p.predict(&rec()).is_err());
    }

    #[test]
    fn test_non_transient_not_retried() {
        let p = Retrying::new(NeverKnows, 5, Duration::from_secs(10));
        let err = p.predict(&rec()).unwrap_err();
        assert!(matches!(err.kind, PredictionErrorKind::NoAnswer));
    }
}
