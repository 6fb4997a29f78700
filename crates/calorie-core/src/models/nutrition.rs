// ABOUTME: Nutrition value types for meals and daily targets
// ABOUTME: NutritionalInfo with additive accumulation and DailyRequirements targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Calories and macronutrients of a meal, or a sum of meals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalInfo {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbohydrates: f64,
    /// Fat in grams
    pub fat: f64,
    /// Free-text portion estimate, e.g. "approx. 250g"
    pub portion_size: String,
}

impl NutritionalInfo {
    /// Name of the first numeric field that is negative or not finite
    #[must_use]
    pub fn first_invalid_field(&self) -> Option<&'static str> {
        [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbohydrates", self.carbohydrates),
            ("fat", self.fat),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(name, _)| name)
    }
}

impl AddAssign<&Self> for NutritionalInfo {
    /// Sums the numeric fields; the portion text of the accumulator is kept
    fn add_assign(&mut self, other: &Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbohydrates += other.carbohydrates;
        self.fat += other.fat;
    }
}

impl Add<&Self> for NutritionalInfo {
    type Output = Self;

    fn add(mut self, other: &Self) -> Self {
        self += other;
        self
    }
}

impl<'a> Sum<&'a Self> for NutritionalInfo {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, item| acc + item)
    }
}

/// Daily calorie and macronutrient targets derived from the profile
///
/// Values are whole numbers; `portion_size` is always empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRequirements {
    /// Target energy in kcal
    pub calories: f64,
    /// Target protein in grams
    pub protein: f64,
    /// Target carbohydrates in grams
    pub carbohydrates: f64,
    /// Target fat in grams
    pub fat: f64,
    /// Unused placeholder kept for wire compatibility
    pub portion_size: String,
}
