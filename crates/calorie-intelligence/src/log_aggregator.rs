// ABOUTME: Time-windowed food log selection and per-day chart buckets
// ABOUTME: Today, trailing seven days, and calendar month windows in the caller's time zone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Log Aggregator Module
//!
//! Window boundaries are local midnights derived from `now` in whatever time
//! zone `now` carries. A log qualifies when its timestamp is at or after the
//! window start; there is no upper bound, so future-dated logs are included.
//!
//! Bucket sums accumulate unrounded values. Rounding happens once, in
//! [`NutritionBucket::to_chart_bar`].

use calorie_core::errors::AppError;
use calorie_core::models::{FoodLog, NutritionalInfo};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Time range used to filter and bucket food logs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Since local midnight
    #[default]
    Today,
    /// Today and the six calendar days before it
    Weekly,
    /// Since the first day of the current calendar month
    Monthly,
}

impl TimeWindow {
    /// All windows in tab order
    pub const ALL: [Self; 3] = [Self::Today, Self::Weekly, Self::Monthly];

    /// Parameter spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Whether this window produces chart buckets
    #[must_use]
    pub const fn has_chart(&self) -> bool {
        !matches!(self, Self::Today)
    }

    /// `strftime` pattern of the bucket label
    const fn label_format(self) -> Option<&'static str> {
        match self {
            Self::Today => None,
            Self::Weekly => Some("%a"),
            Self::Monthly => Some("%b %-d"),
        }
    }
}

impl FromStr for TimeWindow {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "day" | "daily" => Ok(Self::Today),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(AppError::invalid_input(format!(
                "unknown window '{other}' (expected today, weekly or monthly)"
            ))),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed nutrition of the logs sharing one chart label
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionBucket {
    /// Weekday ("Mon") or month-day ("Oct 5") label
    pub label: String,
    /// Earliest timestamp among the contributing logs
    pub first_timestamp: i64,
    /// Unrounded sums
    pub totals: NutritionalInfo,
    /// Number of contributing logs
    pub entries: usize,
}

/// One bar of the weekly or monthly chart, rounded for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartBar {
    /// Bucket label
    pub label: String,
    /// Calories (kcal)
    pub calories: i64,
    /// Protein (g)
    pub protein: i64,
    /// Carbohydrates (g)
    pub carbs: i64,
    /// Fat (g)
    pub fat: i64,
}

impl NutritionBucket {
    /// Round the sums to whole numbers
    #[must_use]
    pub fn to_chart_bar(&self) -> ChartBar {
        ChartBar {
            label: self.label.clone(),
            calories: self.totals.calories.round() as i64,
            protein: self.totals.protein.round() as i64,
            carbs: self.totals.carbohydrates.round() as i64,
            fat: self.totals.fat.round() as i64,
        }
    }
}

/// Local midnight of `date` in `tz`
///
/// When midnight does not exist (a DST gap at 00:00) the first valid instant
/// of the day is used, probed in half-hour steps.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=4)
        .filter_map(|step| midnight.checked_add_signed(Duration::minutes(30 * step)))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Start instant of `window` relative to `now`
#[must_use]
pub fn window_start<Tz: TimeZone>(window: TimeWindow, now: &DateTime<Tz>) -> DateTime<Tz> {
    let today = now.date_naive();
    let first_day = match window {
        TimeWindow::Today => today,
        TimeWindow::Weekly => today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN),
        TimeWindow::Monthly => today.with_day(1).unwrap_or(today),
    };
    local_midnight(first_day, &now.timezone())
}

/// Logs whose timestamp is at or after the window start, in stored order
#[must_use]
pub fn select_window<'a, Tz: TimeZone>(
    logs: &'a [FoodLog],
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Vec<&'a FoodLog> {
    let start_ms = window_start(window, now).timestamp_millis();
    logs.iter().filter(|log| log.timestamp >= start_ms).collect()
}

/// Window logs newest first, the order the history list shows them
#[must_use]
pub fn history_view<'a, Tz: TimeZone>(
    logs: &'a [FoodLog],
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Vec<&'a FoodLog> {
    let mut selected = select_window(logs, window, now);
    selected.sort_by_key(|log| Reverse(log.timestamp));
    selected
}

/// Field-wise sum of the logs' nutrition
#[must_use]
pub fn sum_nutrition<'a, I>(logs: I) -> NutritionalInfo
where
    I: IntoIterator<Item = &'a FoodLog>,
{
    logs.into_iter().map(|log| &log.nutrition).sum()
}

/// Totals for the Today window, independent of the chart tab
#[must_use]
pub fn today_totals<Tz: TimeZone>(logs: &[FoodLog], now: &DateTime<Tz>) -> NutritionalInfo {
    sum_nutrition(select_window(logs, TimeWindow::Today, now))
}

/// Group logs by their local-date label and sum each group
///
/// Buckets come out oldest first, ordered by each bucket's earliest timestamp.
/// Logs on different dates that share a label land in the same bucket. The
/// Today window has no chart and yields no buckets.
#[must_use]
pub fn aggregate_buckets<'a, I, Tz>(logs: I, window: TimeWindow, tz: &Tz) -> Vec<NutritionBucket>
where
    I: IntoIterator<Item = &'a FoodLog>,
    Tz: TimeZone,
{
    let Some(pattern) = window.label_format() else {
        return Vec::new();
    };

    let mut buckets: Vec<NutritionBucket> = Vec::new();
    for log in logs {
        let Some(logged_at) = log.logged_at() else {
            warn!(log_id = %log.id, timestamp = log.timestamp, "Skipping log with out-of-range timestamp");
            continue;
        };
        let label = logged_at
            .with_timezone(tz)
            .date_naive()
            .format(pattern)
            .to_string();

        match buckets.iter_mut().find(|bucket| bucket.label == label) {
            Some(bucket) => {
                bucket.totals += &log.nutrition;
                bucket.first_timestamp = bucket.first_timestamp.min(log.timestamp);
                bucket.entries += 1;
            }
            None => buckets.push(NutritionBucket {
                label,
                first_timestamp: log.timestamp,
                totals: NutritionalInfo::default() + &log.nutrition,
                entries: 1,
            }),
        }
    }

    buckets.sort_by_key(|bucket| bucket.first_timestamp);
    buckets
}

/// Rounded chart bars for the window, oldest first
#[must_use]
pub fn aggregate_by_bucket<'a, I, Tz>(logs: I, window: TimeWindow, tz: &Tz) -> Vec<ChartBar>
where
    I: IntoIterator<Item = &'a FoodLog>,
    Tz: TimeZone,
{
    aggregate_buckets(logs, window, tz)
        .iter()
        .map(NutritionBucket::to_chart_bar)
        .collect()
}
