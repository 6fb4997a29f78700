// ABOUTME: Daily calorie and macronutrient targets from body metrics
// ABOUTME: Revised Harris-Benedict BMR, activity-scaled TDEE, goal adjustment, and 40/30/30 split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculator Module
//!
//! Every function here is pure and total over validated profiles. Checking that
//! height, weight and age are positive is the caller's job
//! (see [`UserDetails::validate`]).
//!
//! # Scientific References
//!
//! - Roza, A.M., & Shizgal, H.M. (1984). The Harris Benedict equation reevaluated.
//!   *American Journal of Clinical Nutrition*, 40(1), 168-182.
//!   <https://doi.org/10.1093/ajcn/40.1.168>

use calorie_core::constants::energy::{
    KCAL_PER_GRAM_CARBOHYDRATE, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use calorie_core::models::{ActivityLevel, DailyRequirements, Gender, Goal, UserDetails};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentConfig, MacroSplitConfig, RequirementsConfig,
};

/// Intermediate values of a requirement calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementsBreakdown {
    /// Basal Metabolic Rate (kcal/day), unrounded
    pub bmr: f64,
    /// Total Daily Energy Expenditure (kcal/day), unrounded
    pub tdee: f64,
    /// TDEE plus the goal adjustment, unrounded and clamped at zero
    pub target_calories: f64,
    /// Rounded targets
    pub requirements: DailyRequirements,
}

/// Calculate Basal Metabolic Rate using the revised Harris-Benedict equation
///
/// Formula:
/// - Men: BMR = 88.362 + (13.397 x `weight_kg`) + (4.799 x `height_cm`) - (5.677 x age)
/// - Women: BMR = 447.593 + (9.247 x `weight_kg`) + (3.098 x `height_cm`) - (4.330 x age)
///
/// # Arguments
/// * `weight_kg` - Body weight in kilograms
/// * `height_cm` - Height in centimeters
/// * `age` - Age in years
/// * `gender` - Selects the coefficient set
/// * `config` - BMR configuration with formula coefficients
///
/// # Reference
/// Roza & Shizgal (1984) DOI: 10.1093/ajcn/40.1.168
#[must_use]
pub fn calculate_harris_benedict(
    weight_kg: f64,
    height_cm: f64,
    age: f64,
    gender: Gender,
    config: &BmrConfig,
) -> f64 {
    let coefficients = match gender {
        Gender::Male => &config.male,
        Gender::Female => &config.female,
    };

    coefficients.constant + coefficients.weight_coef * weight_kg + coefficients.height_coef * height_cm
        - coefficients.age_coef * age
}

/// Calculate Total Daily Energy Expenditure (TDEE)
///
/// Formula: TDEE = BMR x Activity Factor
///
/// - Sedentary: 1.2
/// - Light: 1.375
/// - Moderate: 1.55
/// - Active: 1.725
/// - Very active: 1.9
#[must_use]
pub fn calculate_tdee(
    bmr: f64,
    activity_level: ActivityLevel,
    config: &ActivityFactorsConfig,
) -> f64 {
    let activity_factor = match activity_level {
        ActivityLevel::Sedentary => config.sedentary,
        ActivityLevel::Light => config.light,
        ActivityLevel::Moderate => config.moderate,
        ActivityLevel::Active => config.active,
        ActivityLevel::VeryActive => config.very_active,
    };

    bmr * activity_factor
}

/// Add the goal's calorie adjustment to the TDEE
///
/// A result below zero is clamped to zero so the targets stay non-negative.
#[must_use]
pub fn apply_goal_adjustment(tdee: f64, goal: Goal, config: &GoalAdjustmentConfig) -> f64 {
    let adjustment = match goal {
        Goal::Lose => config.lose,
        Goal::Maintain => config.maintain,
        Goal::Gain => config.gain,
    };

    (tdee + adjustment).max(0.0)
}

/// Split target calories into rounded gram targets
///
/// Grams are computed from the unrounded target; each output is then rounded
/// to the nearest integer independently.
#[must_use]
pub fn split_macros(target_calories: f64, config: &MacroSplitConfig) -> DailyRequirements {
    let target = target_calories.max(0.0);
    DailyRequirements {
        calories: target.round(),
        protein: (target * config.protein / KCAL_PER_GRAM_PROTEIN).round(),
        carbohydrates: (target * config.carbohydrates / KCAL_PER_GRAM_CARBOHYDRATE).round(),
        fat: (target * config.fat / KCAL_PER_GRAM_FAT).round(),
        portion_size: String::new(),
    }
}

/// Calculate the full breakdown with an explicit configuration
#[must_use]
pub fn calculate_requirements_breakdown(
    details: &UserDetails,
    config: &RequirementsConfig,
) -> RequirementsBreakdown {
    let bmr = calculate_harris_benedict(
        details.weight,
        details.height,
        details.age,
        details.gender,
        &config.bmr,
    );
    let tdee = calculate_tdee(bmr, details.activity_level, &config.activity_factors);
    let target_calories = apply_goal_adjustment(tdee, details.goal, &config.goal_adjustments);
    let requirements = split_macros(target_calories, &config.macro_split);

    debug!(
        bmr,
        tdee,
        target_calories,
        gender = %details.gender,
        activity_level = %details.activity_level,
        goal = %details.goal,
        "Computed daily requirements"
    );

    RequirementsBreakdown {
        bmr,
        tdee,
        target_calories,
        requirements,
    }
}

/// Daily requirements for a profile with an explicit configuration
#[must_use]
pub fn compute_requirements_with(
    details: &UserDetails,
    config: &RequirementsConfig,
) -> DailyRequirements {
    calculate_requirements_breakdown(details, config).requirements
}

/// Daily requirements for a profile using the global configuration
///
/// Deterministic; the same profile always yields the same targets.
#[must_use]
pub fn compute_requirements(details: &UserDetails) -> DailyRequirements {
    compute_requirements_with(details, RequirementsConfig::global())
}
