// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run profiling metrics.
//!
//! [`RunMetrics`] aggregates per-record prediction latency over a run. The
//! per-record values themselves live in the
//! [`TimingSet`](result_writer::TimingSet).

use std::time::Duration;

/// Aggregate metrics for a complete inference run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Records processed (including fallbacks).
    pub records: usize,
    /// Records that received the fallback answer.
    pub fallbacks: usize,
    /// Sum of all prediction call durations.
    pub total_predict_duration: Duration,
    /// Shortest prediction call.
    pub min_latency: Option<Duration>,
    /// Longest prediction call.
    pub max_latency: Option<Duration>,
    /// Wall-clock time of the whole run, loop overhead included.
    pub wall_duration: Duration,
}

impl RunMetrics {
    /// Creates an empty metrics container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one prediction call.
    pub fn record(&mut self, latency: Duration, fallback: bool) {
        self.records += 1;
        if fallback {
            self.fallbacks += 1;
        }
        self.total_predict_duration += latency;
        self.min_latency = Some(self.min_latency.map_or(latency, |m| m.min(latency)));
        self.max_latency = Some(self.max_latency.map_or(latency, |m| m.max(latency)));
    }

    /// Finalises metrics with the wall-clock time of the run.
    pub fn finalise(&mut self, wall: Duration) {
        self.wall_duration = wall;
    }

    /// Mean prediction latency, zero for an empty run.
    pub fn mean_latency(&self) -> Duration {
        match self.records {
            0 => Duration::ZERO,
            n => self.total_predict_duration / n as u32,
        }
    }

    /// Records per second over the wall-clock time.
    pub fn throughput(&self) -> f64 {
        let secs = self.wall_duration.as_secs_f64();
        if secs <= 0.0 || self.records == 0 {
            return 0.0;
        }
        self.records as f64 / secs
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let secs = |d: Option<Duration>| d.unwrap_or_default().as_secs_f64();
        format!(
            "Inference: {} records ({} fallback), {:.2}s total inference, \
             {:.4}s mean, {:.4}s min, {:.4}s max, {:.2}s wall ({:.1} rec/s)",
            self.records,
            self.fallbacks,
            self.total_predict_duration.as_secs_f64(),
            self.mean_latency().as_secs_f64(),
            secs(self.min_latency),
            secs(self.max_latency),
            self.wall_duration.as_secs_f64(),
            self.throughput(),
        )
    }
}
