// ABOUTME: User profile model captured once at setup
// ABOUTME: Body metrics, gender, activity level, and weight goal with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AppError, AppResult};

/// Gender for BMR calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male coefficients of the Harris-Benedict equation
    Male,
    /// Female coefficients of the Harris-Benedict equation
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise and a physical job
    VeryActive,
}

/// Weight goal applied as a calorie adjustment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Weight loss (caloric deficit)
    Lose,
    /// Maintenance (caloric balance)
    Maintain,
    /// Weight gain (caloric surplus)
    Gain,
}

impl Gender {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl ActivityLevel {
    /// All levels, from least to most active
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }

    /// Human-readable description shown during setup
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary (little or no exercise)",
            Self::Light => "Lightly active (light exercise/sports 1-3 days/week)",
            Self::Moderate => "Moderately active (moderate exercise/sports 3-5 days/week)",
            Self::Active => "Very active (hard exercise/sports 6-7 days a week)",
            Self::VeryActive => "Extra active (very hard exercise/sports & physical job)",
        }
    }
}

impl Goal {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(AppError::invalid_input(format!(
                "unknown gender '{other}' (expected male or female)"
            ))),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very_active" => Ok(Self::VeryActive),
            other => Err(AppError::invalid_input(format!(
                "unknown activity level '{other}' (expected sedentary, light, moderate, active or very_active)"
            ))),
        }
    }
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lose" => Ok(Self::Lose),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            other => Err(AppError::invalid_input(format!(
                "unknown goal '{other}' (expected lose, maintain or gain)"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body metrics and preferences captured at setup
///
/// Immutable until the profile is reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Age in years
    pub age: f64,
    /// Gender for the BMR equation
    pub gender: Gender,
    /// Activity level for the TDEE multiplier
    pub activity_level: ActivityLevel,
    /// Weight goal
    pub goal: Goal,
}

impl Default for UserDetails {
    /// The values the setup form starts with
    fn default() -> Self {
        Self {
            height: 175.0,
            weight: 70.0,
            age: 30.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
        }
    }
}

impl UserDetails {
    /// Check that height, weight and age are positive numbers
    ///
    /// # Errors
    ///
    /// Returns a validation error when any of them is zero, negative, or not finite
    pub fn validate(&self) -> AppResult<()> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if positive(self.height) && positive(self.weight) && positive(self.age) {
            Ok(())
        } else {
            Err(AppError::invalid_profile())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn test_wire_format_matches_browser_storage() {
        let details = UserDetails {
            activity_level: ActivityLevel::VeryActive,
            ..UserDetails::default()
        };
        let json = serde_json::to_value(details).unwrap();
        assert_eq!(json["activityLevel"], "very_active");
        assert_eq!(json["gender"], "male");
        assert_eq!(json["goal"], "maintain");
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        assert!(UserDetails::default().validate().is_ok());
        for bad in [
            UserDetails { height: 0.0, ..UserDetails::default() },
            UserDetails { weight: -70.0, ..UserDetails::default() },
            UserDetails { age: f64::NAN, ..UserDetails::default() },
        ] {
            let error = bad.validate().unwrap_err();
            assert_eq!(error.category(), ErrorCategory::Validation);
        }
    }

    #[test]
    fn test_parse_enums_from_cli_spelling() {
        assert_eq!("very-active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert!("bulk".parse::<Goal>().is_err());
    }
}
