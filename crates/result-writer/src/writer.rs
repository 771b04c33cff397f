// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Serialising result sets to CSV.

use crate::{AtomicFile, ResultSet, TimingSet, WriteError};
use std::io::Write;
use std::path::Path;

/// Header row of the predictions file.
pub const PREDICTION_HEADER: [&str; 2] = ["qid", "answer"];

/// Header row of the timing file.
pub const TIMING_HEADER: [&str; 2] = ["qid", "elapsed_seconds"];

/// Writes predictions as CSV to any writer.
pub fn write_predictions<W: Write>(out: W, results: &ResultSet) -> Result<(), csv::Error> {
    // The header is written explicitly so an empty set still gets one.
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    w.write_record(PREDICTION_HEADER)?;
    for p in results.iter() {
        w.serialize(p)?;
    }
    w.flush()?;
    Ok(())
}

/// Writes timings as CSV to any writer. Durations are seconds with four
/// decimal places.
pub fn write_timings<W: Write>(out: W, timings: &TimingSet) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(TIMING_HEADER)?;
    for t in timings.iter() {
        let secs = format!("{:.4}", t.elapsed_seconds());
        w.write_record([t.qid.as_str(), secs.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Persists both result files with all-or-nothing semantics.
pub struct ResultWriter;

impl ResultWriter {
    /// Writes `results` to `result_path` and `timings` to `timing_path`.
    ///
    /// Both files are fully written to temporary siblings before either is
    /// renamed into place. If the second rename fails, the first committed
    /// file is removed again, so the caller never observes one output
    /// without the other.
    pub fn write(
        results: &ResultSet,
        timings: &TimingSet,
        result_path: &Path,
        timing_path: &Path,
    ) -> Result<(), WriteError> {
        let predictions = Self::stage(result_path, |f| write_predictions(f, results))?;
        let timing = Self::stage(timing_path, |f| write_timings(f, timings))?;

        let committed = predictions.commit()?;
        if let Err(e) = timing.commit() {
            tracing::warn!("rolling back {} after failed commit", committed.display());
            if let Err(rm) = std::fs::remove_file(&committed) {
                tracing::warn!("rollback of {} failed: {rm}", committed.display());
            }
            return Err(e);
        }

        tracing::info!(
            "wrote {} predictions to {} and {} timings to {}",
            results.len(),
            result_path.display(),
            timings.len(),
            timing_path.display(),
        );
        Ok(())
    }

    /// Creates a staged file and fills it; the guard is dropped (and the
    /// temporary file removed) if writing fails.
    fn stage<F>(path: &Path, fill: F) -> Result<AtomicFile, WriteError>
    where
        F: FnOnce(&mut std::fs::File) -> Result<(), csv::Error>,
    {
        let mut file = AtomicFile::create(path)?;
        fill(file.file_mut()).map_err(|source| WriteError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    /// Fails like a full disk once `remaining` bytes are used.
    struct FullDisk<W> {
        inner: W,
        remaining: usize,
    }

    impl<W: Write> Write for FullDisk<W> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "No space left on device"));
            }
            let n = buf.len().min(self.remaining);
            let written = self.inner.write(&buf[..n])?;
            self.remaining -= written;
            Ok(written)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn test_stage_disk_full_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("submission.csv");
        let mut rs = ResultSet::default();
        for i in 0..500 {
            rs.insert(format!("test_{i:04}"), "C").unwrap();
        }

        let err = ResultWriter::stage(&target, |f| {
            write_predictions(FullDisk { inner: f, remaining: 64 }, &rs)
        })
        .unwrap_err();

        assert!(matches!(err, WriteError::Csv { .. }), "{err}");
        assert_eq!(err.path(), target.as_path());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0, "temporary file must be removed");
    }

    #[test]
    fn test_write_predictions_format() {
        let mut rs = ResultSet::default();
        rs.insert("test_0001", "B").unwrap();
        rs.insert("test_0002", "D").unwrap();

        let mut buf = Vec::new();
        write_predictions(&mut buf, &rs).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "qid,answer\ntest_0001,B\ntest_0002,D\n"
        );
    }

    #[test]
    fn test_write_timings_format() {
        let mut ts = TimingSet::default();
        ts.insert("test_0001", Duration::from_micros(1_234_560)).unwrap();
        ts.insert("test_0002", Duration::ZERO).unwrap();

        let mut buf = Vec::new();
        write_timings(&mut buf, &ts).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "qid,elapsed_seconds\ntest_0001,1.2346\ntest_0002,0.0000\n"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut rs = ResultSet::default();
        rs.insert("a,b", "x").unwrap();
        let mut buf = Vec::new();
        write_predictions(&mut buf, &rs).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "qid,answer\n\"a,b\",x\n");
    }

    #[test]
    fn test_empty_sets_write_headers_only() {
        let mut buf = Vec::new();
        write_timings(&mut buf, &TimingSet::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "qid,elapsed_seconds\n");
    }
}
