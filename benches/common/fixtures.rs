// ABOUTME: Benchmark fixtures for generating realistic food log histories
// ABOUTME: Provides deterministic data generation for reproducible performance measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for generating food log histories.

use calorie_core::models::{FoodLog, NutritionalInfo};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Predefined history sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum LogBatchSize {
    /// A week of meals
    Week,
    /// A month of meals for a regular user
    Month,
    /// A year of meals
    Year,
}

impl LogBatchSize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Week => 28,
            Self::Month => 120,
            Self::Year => 1_460,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Fixed reference instant so runs are comparable
#[must_use]
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 16, 20, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Four meals a day going back from `reference_now`
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
#[must_use]
pub fn generate_food_logs(size: LogBatchSize) -> Vec<FoodLog> {
    let now = reference_now();
    (0..size.count())
        .map(|index| {
            let hours_ago = (index / 4 * 24 + (index % 4) * 4) as i64;
            FoodLog {
                id: format!("bench-log-{index}"),
                name: format!("Meal {index}"),
                timestamp: (now - Duration::hours(hours_ago)).timestamp_millis(),
                nutrition: NutritionalInfo {
                    calories: 350.0 + ((index * 37) % 400) as f64,
                    protein: 15.0 + ((index * 7) % 30) as f64,
                    carbohydrates: 40.0 + ((index * 11) % 50) as f64,
                    fat: 10.0 + ((index * 5) % 25) as f64,
                    portion_size: "1 plate".to_owned(),
                },
                image: String::new(),
            }
        })
        .collect()
}
