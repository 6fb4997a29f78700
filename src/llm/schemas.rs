// ABOUTME: JSON response schemas that constrain the model's structured output
// ABOUTME: Nutrition estimate, meal analysis with questions, and grocery evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Response schemas in the Gemini `responseSchema` dialect
//!
//! Property names match the camelCase serde names of the models in
//! `calorie_core::models`, so a conforming response deserializes directly.

use serde_json::{json, Value};

/// Schema for a single nutrition estimate
#[must_use]
pub fn nutrition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories": { "type": "NUMBER", "description": "Estimated calories in kcal." },
            "protein": { "type": "NUMBER", "description": "Estimated protein in grams." },
            "carbohydrates": { "type": "NUMBER", "description": "Estimated carbohydrates in grams." },
            "fat": { "type": "NUMBER", "description": "Estimated fat in grams." },
            "portionSize": {
                "type": "STRING",
                "description": "Estimated portion size, e.g., \"1 cup\" or \"approx. 200g\"."
            }
        },
        "required": ["calories", "protein", "carbohydrates", "fat", "portionSize"]
    })
}

/// Schema for the first pass over a meal photo
#[must_use]
pub fn meal_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dishName": { "type": "STRING", "description": "The name of the identified dish." },
            "estimatedNutrition": nutrition_schema(),
            "clarifyingQuestions": {
                "type": "ARRAY",
                "description": "2-3 simple multiple-choice questions for the user to clarify preparation methods that significantly impact nutrition (e.g., frying method, added sugar).",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["question", "options"]
                }
            }
        },
        "required": ["dishName", "estimatedNutrition", "clarifyingQuestions"]
    })
}

/// Schema for a packaged grocery item evaluation
#[must_use]
pub fn grocery_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itemName": { "type": "STRING", "description": "The name of the grocery item." },
            "healthMentorSummary": {
                "type": "STRING",
                "description": "A friendly, conversational summary about the item's healthiness and advice for the user."
            },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "healthImpact": { "type": "STRING", "enum": ["good", "neutral", "bad"] },
                        "explanation": {
                            "type": "STRING",
                            "description": "A brief explanation of why the ingredient has that health impact."
                        }
                    },
                    "required": ["name", "healthImpact", "explanation"]
                }
            },
            "healthyAlternatives": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 2-3 healthier alternative products or homemade options."
            }
        },
        "required": ["itemName", "healthMentorSummary", "ingredients", "healthyAlternatives"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_schema_embeds_nutrition_schema() {
        let schema = meal_analysis_schema();
        assert_eq!(schema["properties"]["estimatedNutrition"], nutrition_schema());
    }

    #[test]
    fn test_health_impact_enum_matches_model_spelling() {
        let schema = grocery_analysis_schema();
        let values = &schema["properties"]["ingredients"]["items"]["properties"]["healthImpact"]["enum"];
        assert_eq!(values, &json!(["good", "neutral", "bad"]));
    }
}
