// ABOUTME: Formula constants for BMR, activity multipliers, goal adjustments, and macro split
// ABOUTME: Defaults follow the revised Harris-Benedict equation with a 40/30/30 split
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Requirement Calculation Configuration
//!
//! # Scientific References
//!
//! - BMR: Roza, A.M., & Shizgal, H.M. (1984). The Harris Benedict equation reevaluated.
//!   *American Journal of Clinical Nutrition*, 40(1), 168-182.
//!   <https://doi.org/10.1093/ajcn/40.1.168>
//! - Activity factors: `McArdle`, W.D., Katch, F.I., & Katch, V.L. (2010). Exercise Physiology

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A multiplier or coefficient is not a positive finite number
    #[error("{0} must be a positive finite number")]
    NotPositive(&'static str),
    /// Macro percentages do not add up to 100%
    #[error("macro split must sum to 1.0, got {0}")]
    InvalidMacroSplit(f64),
}

/// Revised Harris-Benedict coefficients for one gender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HarrisBenedictCoefficients {
    /// Constant term (kcal)
    pub constant: f64,
    /// Weight coefficient (kcal per kg)
    pub weight_coef: f64,
    /// Height coefficient (kcal per cm)
    pub height_coef: f64,
    /// Age coefficient (kcal per year, subtracted)
    pub age_coef: f64,
}

/// BMR equation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BmrConfig {
    /// Coefficients for men
    pub male: HarrisBenedictCoefficients,
    /// Coefficients for women
    pub female: HarrisBenedictCoefficients,
}

/// Activity factor multipliers for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Lightly active: 1.375
    pub light: f64,
    /// Moderately active: 1.55
    pub moderate: f64,
    /// Very active: 1.725
    pub active: f64,
    /// Extra active: 1.9
    pub very_active: f64,
}

/// Calorie adjustment per goal (kcal/day)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GoalAdjustmentConfig {
    /// Weight loss deficit: -500
    pub lose: f64,
    /// Maintenance: 0
    pub maintain: f64,
    /// Weight gain surplus: +500
    pub gain: f64,
}

/// Share of target calories per macronutrient (fractions of 1.0)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroSplitConfig {
    /// Carbohydrate share: 0.40
    pub carbohydrates: f64,
    /// Protein share: 0.30
    pub protein: f64,
    /// Fat share: 0.30
    pub fat: f64,
}

/// Everything the requirement calculation depends on
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RequirementsConfig {
    /// BMR equation
    pub bmr: BmrConfig,
    /// TDEE multipliers
    pub activity_factors: ActivityFactorsConfig,
    /// Goal adjustments
    pub goal_adjustments: GoalAdjustmentConfig,
    /// Macro split
    pub macro_split: MacroSplitConfig,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            male: HarrisBenedictCoefficients {
                constant: 88.362,
                weight_coef: 13.397,
                height_coef: 4.799,
                age_coef: 5.677,
            },
            female: HarrisBenedictCoefficients {
                constant: 447.593,
                weight_coef: 9.247,
                height_coef: 3.098,
                age_coef: 4.330,
            },
        }
    }
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            active: 1.725,
            very_active: 1.9,
        }
    }
}

impl Default for GoalAdjustmentConfig {
    fn default() -> Self {
        Self {
            lose: -500.0,
            maintain: 0.0,
            gain: 500.0,
        }
    }
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            carbohydrates: 0.40,
            protein: 0.30,
            fat: 0.30,
        }
    }
}

/// Global configuration singleton
static REQUIREMENTS_CONFIG: OnceLock<RequirementsConfig> = OnceLock::new();

impl RequirementsConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        REQUIREMENTS_CONFIG.get_or_init(Self::default)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a multiplier is not positive or the macro split does not sum to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factors = [
            ("activity_factors.sedentary", self.activity_factors.sedentary),
            ("activity_factors.light", self.activity_factors.light),
            ("activity_factors.moderate", self.activity_factors.moderate),
            ("activity_factors.active", self.activity_factors.active),
            ("activity_factors.very_active", self.activity_factors.very_active),
            ("bmr.male.weight_coef", self.bmr.male.weight_coef),
            ("bmr.male.height_coef", self.bmr.male.height_coef),
            ("bmr.female.weight_coef", self.bmr.female.weight_coef),
            ("bmr.female.height_coef", self.bmr.female.height_coef),
        ];
        if let Some((name, _)) = factors
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(ConfigError::NotPositive(name));
        }

        let split = self.macro_split;
        let total = split.carbohydrates + split.protein + split.fat;
        if (total - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidMacroSplit(total));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RequirementsConfig::default().validate(), Ok(()));
        assert_eq!(RequirementsConfig::global(), &RequirementsConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_split() {
        let mut config = RequirementsConfig::default();
        config.macro_split.fat = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMacroSplit(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_multiplier() {
        let mut config = RequirementsConfig::default();
        config.activity_factors.active = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive("activity_factors.active"))
        );
    }
}
