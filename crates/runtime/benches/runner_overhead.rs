// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for runner bookkeeping and the full write path.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dataset::{Dataset, Record};
use predictor::LookupPredictor;
use runtime::{InferenceRunner, Pipeline, PipelineConfig, RunnerConfig};

fn synthetic(n: usize) -> (Dataset, LookupPredictor) {
    let records = (0..n)
        .map(|i| Record::new(format!("q{i}"), "Câu hỏi?", vec!["x".into(), "y".into()]))
        .collect();
    let dataset = Dataset::from_records(records).expect("unique keys");
    let model = LookupPredictor::from_pairs((0..n).map(|i| (format!("q{i}"), "B")));
    (dataset, model)
}

fn bench_runner(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner");
    for n in [100usize, 1_000, 10_000] {
        let (dataset, model) = synthetic(n);
        let runner = InferenceRunner::new(RunnerConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| runner.run(&dataset, &model).expect("run succeeds"))
        });
    }
    group.finish();
}

fn bench_pipeline_write(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = PipelineConfig {
        predictions: dir.path().join("submission.csv"),
        timings: dir.path().join("submission_time.csv"),
        ..Default::default()
    };
    let (dataset, model) = synthetic(1_000);

    c.bench_function("pipeline_1000", |b| {
        b.iter(|| {
            Pipeline::from_dataset(config.clone(), dataset.clone())
                .expect("valid")
                .execute(&model)
                .expect("pipeline succeeds")
                .finish()
        })
    });
}

criterion_group!(benches, bench_runner, bench_pipeline_write);
criterion_main!(benches);
