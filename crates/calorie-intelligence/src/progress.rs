// ABOUTME: Consumed-versus-target progress for the daily summary
// ABOUTME: One entry per tracked value with a percentage capped at 100
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use calorie_core::models::{DailyRequirements, NutritionalInfo};
use serde::Serialize;

/// Progress of one value against its daily target
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MacroProgress {
    /// Display label
    pub label: &'static str,
    /// Amount consumed so far
    pub consumed: f64,
    /// Daily target
    pub target: f64,
    /// Unit shown next to the numbers
    pub unit: &'static str,
    /// Share of the target consumed, between 0 and 100
    pub percentage: f64,
}

impl MacroProgress {
    fn new(label: &'static str, consumed: f64, target: f64, unit: &'static str) -> Self {
        let percentage = if target > 0.0 {
            (consumed / target * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            label,
            consumed,
            target,
            unit,
            percentage,
        }
    }

    /// Amount left before reaching the target, never negative
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.target - self.consumed).max(0.0)
    }
}

/// Calories, protein, carbs and fat consumed against the daily requirements
#[must_use]
pub fn daily_progress(consumed: &NutritionalInfo, targets: &DailyRequirements) -> Vec<MacroProgress> {
    vec![
        MacroProgress::new("Calories", consumed.calories, targets.calories, "kcal"),
        MacroProgress::new("Protein", consumed.protein, targets.protein, "g"),
        MacroProgress::new("Carbs", consumed.carbohydrates, targets.carbohydrates, "g"),
        MacroProgress::new("Fat", consumed.fat, targets.fat, "g"),
    ]
}
