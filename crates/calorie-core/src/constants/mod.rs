// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Persistence keys, energy densities, and user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large list.

/// Keys used by the persistence gateway
///
/// The spellings match the browser client's local storage so a stored session
/// can be moved between the two.
pub mod storage_keys {
    /// Serialized `UserDetails`
    pub const USER_DETAILS: &str = "userDetails";
    /// Serialized `DailyRequirements`
    pub const DAILY_REQUIREMENTS: &str = "dailyRequirements";
    /// Serialized `Vec<FoodLog>`
    pub const FOOD_LOGS: &str = "foodLogs";

    /// Every key owned by a session, in the order they are cleared
    pub const ALL: [&str; 3] = [USER_DETAILS, DAILY_REQUIREMENTS, FOOD_LOGS];
}

/// Energy density of macronutrients
pub mod energy {
    /// Kilocalories per gram of carbohydrate
    pub const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;
    /// Kilocalories per gram of protein
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Kilocalories per gram of fat
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
}

/// Service identity used in logs
pub mod service_names {
    /// Service name for structured logging
    pub const CALORIE_MENTOR: &str = "calorie-mentor";
}

/// Messages shown to the user when an operation fails
pub mod messages {
    /// Profile values were not positive
    pub const INVALID_PROFILE: &str = "Please enter valid height, weight, and age.";
    /// Meal image analysis failed
    pub const MEAL_ANALYSIS_FAILED: &str = "Failed to analyze image. Please try again.";
    /// Meal refinement failed
    pub const MEAL_REFINEMENT_FAILED: &str = "Failed to refine analysis. Please try again.";
    /// Grocery analysis failed
    pub const GROCERY_ANALYSIS_FAILED: &str = "Failed to analyze item. Please try again.";
    /// AI returned something that did not match the schema
    pub const INVALID_AI_RESPONSE: &str = "Received invalid data from AI. Please try again.";
    /// Camera could not be opened
    pub const CAMERA_UNAVAILABLE: &str = "Could not access camera. Please check permissions.";
}
