// ABOUTME: Food log entries recorded after a confirmed meal analysis
// ABOUTME: Append-only records with generated id, millisecond timestamp, and image preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NutritionalInfo;

/// A meal the user confirmed, before it receives an id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodLog {
    /// Dish name reported by the analysis
    pub name: String,
    /// Final nutrition estimate
    pub nutrition: NutritionalInfo,
    /// `data:` URL of the analyzed image
    pub image: String,
}

/// A logged meal
///
/// Logs are never edited or removed one at a time; the whole collection is
/// cleared on profile reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Dish name
    pub name: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
    /// Nutrition of the meal
    pub nutrition: NutritionalInfo,
    /// `data:` URL of the meal photo
    pub image: String,
}

impl FoodLog {
    /// Stamp a confirmed meal with a fresh id and the given creation time
    #[must_use]
    pub fn record(entry: NewFoodLog, timestamp_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: entry.name,
            timestamp: timestamp_ms,
            nutrition: entry.nutrition,
            image: entry.image,
        }
    }

    /// Creation time as a UTC instant, if the timestamp is representable
    #[must_use]
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
