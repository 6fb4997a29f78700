// ABOUTME: Criterion benchmarks for requirement formulas and food log aggregation
// ABOUTME: Measures daily target computation and windowed chart bucketing over histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the nutrition intelligence crate.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

mod common;

use calorie_core::models::{ActivityLevel, Gender, Goal, UserDetails};
use calorie_intelligence::{
    aggregate_by_bucket, compute_requirements, history_view, today_totals, TimeWindow,
};
use chrono::Utc;
use common::fixtures::{generate_food_logs, reference_now, LogBatchSize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_requirements(c: &mut Criterion) {
    let profiles: Vec<UserDetails> = ActivityLevel::ALL
        .iter()
        .flat_map(|&activity_level| {
            [Goal::Lose, Goal::Maintain, Goal::Gain].map(|goal| UserDetails {
                height: 168.0,
                weight: 64.0,
                age: 41.0,
                gender: Gender::Female,
                activity_level,
                goal,
            })
        })
        .collect();

    c.bench_function("compute_requirements", |b| {
        b.iter(|| {
            for profile in &profiles {
                black_box(compute_requirements(black_box(profile)));
            }
        });
    });
}

fn bench_windowed_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_view");
    let now = reference_now();

    for size in [LogBatchSize::Week, LogBatchSize::Month, LogBatchSize::Year] {
        let logs = generate_food_logs(size);
        group.throughput(Throughput::Elements(logs.len() as u64));
        for window in TimeWindow::ALL {
            group.bench_with_input(
                BenchmarkId::new(window.as_str(), size.label()),
                &logs,
                |b, logs| b.iter(|| black_box(history_view(logs, window, &now))),
            );
        }
    }

    group.finish();
}

fn bench_chart_buckets(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_by_bucket");
    let now = reference_now();

    for size in [LogBatchSize::Month, LogBatchSize::Year] {
        let logs = generate_food_logs(size);
        group.throughput(Throughput::Elements(logs.len() as u64));
        for window in [TimeWindow::Weekly, TimeWindow::Monthly] {
            group.bench_with_input(
                BenchmarkId::new(window.as_str(), size.label()),
                &logs,
                |b, logs| {
                    b.iter(|| {
                        let history = history_view(logs, window, &now);
                        black_box(aggregate_by_bucket(history, window, &Utc))
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_dashboard_totals(c: &mut Criterion) {
    let logs = generate_food_logs(LogBatchSize::Year);
    let now = reference_now();

    c.bench_function("today_totals_year", |b| {
        b.iter(|| black_box(today_totals(black_box(logs.as_slice()), &now)));
    });
}

criterion_group!(
    benches,
    bench_requirements,
    bench_windowed_history,
    bench_chart_buckets,
    bench_dashboard_totals,
);
criterion_main!(benches);
