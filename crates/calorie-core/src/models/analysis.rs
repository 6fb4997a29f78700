// ABOUTME: Structured AI analysis responses for meal photos and grocery items
// ABOUTME: Field names mirror the response schemas sent to the generative model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::NutritionalInfo;

/// A multiple-choice question about how a dish was prepared
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AiQuestion {
    /// Question text, also the key of the user's answer
    pub question: String,
    /// Options offered to the user
    pub options: Vec<String>,
}

/// Result of analyzing a meal photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    /// Identified dish
    pub dish_name: String,
    /// First nutrition estimate
    pub estimated_nutrition: NutritionalInfo,
    /// Clarifying questions; empty when the estimate needs no refinement
    pub clarifying_questions: Vec<AiQuestion>,
}

impl MealAnalysis {
    /// Look up a clarifying question by its text
    #[must_use]
    pub fn question(&self, text: &str) -> Option<&AiQuestion> {
        self.clarifying_questions.iter().find(|q| q.question == text)
    }
}

/// Health rating of a single ingredient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthImpact {
    /// Beneficial ingredient
    Good,
    /// Neither beneficial nor harmful
    Neutral,
    /// Ingredient to limit
    Bad,
}

impl HealthImpact {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Bad => "bad",
        }
    }
}

/// One ingredient of a packaged product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAnalysis {
    /// Ingredient name
    pub name: String,
    /// Health rating
    pub health_impact: HealthImpact,
    /// Why the ingredient has that rating
    pub explanation: String,
}

/// Result of analyzing a photo of a packaged grocery item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroceryAnalysis {
    /// Product name
    pub item_name: String,
    /// Conversational advice on whether to buy the product
    pub health_mentor_summary: String,
    /// Key ingredients with ratings
    pub ingredients: Vec<IngredientAnalysis>,
    /// Healthier products or homemade options
    pub healthy_alternatives: Vec<String>,
}
