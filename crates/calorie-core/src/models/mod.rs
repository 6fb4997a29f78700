// ABOUTME: Core data models shared by every crate in the workspace
// ABOUTME: Profile, nutrition, food log, and AI analysis response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain models
//!
//! All models serialize with camelCase field names so persisted state and AI
//! payloads share one wire format.

mod analysis;
mod food_log;
mod nutrition;
mod profile;

pub use analysis::{AiQuestion, GroceryAnalysis, HealthImpact, IngredientAnalysis, MealAnalysis};
pub use food_log::{FoodLog, NewFoodLog};
pub use nutrition::{DailyRequirements, NutritionalInfo};
pub use profile::{ActivityLevel, Gender, Goal, UserDetails};
