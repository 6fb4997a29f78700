// ABOUTME: Analysis prompts for LLM interactions loaded at compile time
// ABOUTME: Meal photo, meal refinement, and grocery mentor instructions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.
//! The refinement prompt is a template with `{dish_name}`, `{current_estimate}`
//! and `{answers}` placeholders.

use calorie_core::models::NutritionalInfo;

use crate::errors::AppResult;

/// Instruction sent alongside a meal photo
pub const MEAL_ANALYSIS_PROMPT: &str = include_str!("meal_analysis.md");

/// Template for re-estimating a meal from clarifying answers
pub const MEAL_REFINEMENT_TEMPLATE: &str = include_str!("meal_refinement.md");

/// Instruction sent alongside a grocery product photo
pub const GROCERY_MENTOR_PROMPT: &str = include_str!("grocery_mentor.md");

/// Get the meal analysis instruction
#[must_use]
pub fn meal_analysis_prompt() -> &'static str {
    MEAL_ANALYSIS_PROMPT.trim_end()
}

/// Get the grocery mentor instruction
#[must_use]
pub fn grocery_mentor_prompt() -> &'static str {
    GROCERY_MENTOR_PROMPT.trim_end()
}

/// Render the refinement prompt
///
/// The current estimate is embedded as compact JSON and each answer becomes a
/// `- question -> answer` line, in the order given.
///
/// # Errors
///
/// Returns an error if the current estimate cannot be serialized
pub fn render_refinement_prompt(
    dish_name: &str,
    current: &NutritionalInfo,
    answers: &[(String, String)],
) -> AppResult<String> {
    let current_estimate = serde_json::to_string(current)?;
    let answer_lines = answers
        .iter()
        .map(|(question, answer)| format!("- {question} -> {answer}"))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(MEAL_REFINEMENT_TEMPLATE
        .trim_end()
        .replace("{dish_name}", dish_name)
        .replace("{current_estimate}", &current_estimate)
        .replace("{answers}", &answer_lines))
}
