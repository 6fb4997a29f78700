// ABOUTME: Nutrition intelligence for the Calorie Mentor client
// ABOUTME: Daily requirement formulas, time-windowed log aggregation, and progress tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calorie Intelligence
//!
//! Pure functions over the core models. Nothing here performs I/O; the caller
//! supplies the clock and the time zone.
//!
//! - **`nutrition_calculator`**: Harris-Benedict BMR, TDEE, goal adjustment, macro split
//! - **`log_aggregator`**: Today/Weekly/Monthly windows and chart buckets
//! - **`progress`**: consumed-versus-target percentages for the daily summary

/// Formula constants for the requirement calculation
pub mod config;

/// Time-windowed filtering and bucketing of food logs
pub mod log_aggregator;

/// Daily requirements from body metrics
pub mod nutrition_calculator;

/// Progress of today's intake against the daily requirements
pub mod progress;

pub use config::{ConfigError, RequirementsConfig};
pub use log_aggregator::{
    aggregate_buckets, aggregate_by_bucket, history_view, select_window, sum_nutrition,
    today_totals, window_start, ChartBar, NutritionBucket, TimeWindow,
};
pub use nutrition_calculator::{
    calculate_requirements_breakdown, compute_requirements, compute_requirements_with,
    RequirementsBreakdown,
};
pub use progress::{daily_progress, MacroProgress};
