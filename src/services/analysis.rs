// ABOUTME: AI analysis gateway turning images into typed nutrition and grocery analyses
// ABOUTME: Builds schema-constrained requests and strictly validates every response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # AI Analysis Gateway
//!
//! Three single-attempt operations, each sending one schema-constrained request
//! through an [`LlmProvider`]:
//!
//! - [`AnalysisGateway::analyze_meal_image`]: dish, estimate, clarifying questions
//! - [`AnalysisGateway::refine_meal_nutrition`]: final estimate from answers
//! - [`AnalysisGateway::analyze_grocery_image`]: ingredient health review
//!
//! Responses that do not parse, or parse into values no caller could use
//! (blank names, negative or non-finite nutrition), fail with
//! `InvalidAiResponse`.

use std::sync::Arc;

use calorie_core::models::{GroceryAnalysis, MealAnalysis, NutritionalInfo};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::capture::CapturedImage;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::prompts::{grocery_mentor_prompt, meal_analysis_prompt, render_refinement_prompt};
use crate::llm::schemas::{grocery_analysis_schema, meal_analysis_schema, nutrition_schema};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Gateway to the generative model
#[derive(Clone)]
pub struct AnalysisGateway {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl AnalysisGateway {
    /// Wrap a provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the provider cannot analyse images
    /// with schema-constrained output
    pub fn new(provider: Arc<dyn LlmProvider>) -> AppResult<Self> {
        let capabilities = provider.capabilities();
        let missing = if capabilities.supports_vision() {
            (!capabilities.supports_json_mode()).then_some("JSON mode")
        } else {
            Some("vision")
        };
        if let Some(missing) = missing {
            return Err(AppError::new(
                ErrorCode::ConfigError,
                format!("provider '{}' lacks {missing} support", provider.name()),
            ));
        }
        Ok(Self {
            provider,
            model: None,
        })
    }

    /// Use `model` instead of the provider default
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Provider display name
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.display_name()
    }

    /// Identify a dish in a photo and ask how it was prepared
    ///
    /// # Errors
    ///
    /// Returns an AI gateway error if the request fails or the response is invalid
    #[instrument(skip(self, image), fields(provider = self.provider.name(), mime_type = image.mime_type()))]
    pub async fn analyze_meal_image(&self, image: &CapturedImage) -> AppResult<MealAnalysis> {
        let request = self.image_request(image, meal_analysis_prompt(), meal_analysis_schema());
        let content = self.send(request).await?;
        let analysis = parse_meal_analysis(&content)?;
        info!(
            dish = %analysis.dish_name,
            calories = analysis.estimated_nutrition.calories,
            questions = analysis.clarifying_questions.len(),
            "Meal analysed"
        );
        Ok(analysis)
    }

    /// Re-estimate a dish from the user's answers
    ///
    /// `answers` pairs each question with the chosen option, in question order.
    ///
    /// # Errors
    ///
    /// Returns an AI gateway error if the request fails or the response is invalid
    #[instrument(skip(self, answers, current), fields(provider = self.provider.name(), answers = answers.len()))]
    pub async fn refine_meal_nutrition(
        &self,
        dish_name: &str,
        answers: &[(String, String)],
        current: &NutritionalInfo,
    ) -> AppResult<NutritionalInfo> {
        let prompt = render_refinement_prompt(dish_name, current, answers)?;
        let request = self.finish_request(
            ChatRequest::new(vec![ChatMessage::user(prompt)]).with_json_schema(nutrition_schema()),
        );
        let content = self.send(request).await?;
        let refined = parse_nutrition(&content)?;
        info!(
            dish = %dish_name,
            calories_before = current.calories,
            calories_after = refined.calories,
            "Meal estimate refined"
        );
        Ok(refined)
    }

    /// Review a packaged grocery product
    ///
    /// # Errors
    ///
    /// Returns an AI gateway error if the request fails or the response is invalid
    #[instrument(skip(self, image), fields(provider = self.provider.name(), mime_type = image.mime_type()))]
    pub async fn analyze_grocery_image(&self, image: &CapturedImage) -> AppResult<GroceryAnalysis> {
        let request =
            self.image_request(image, grocery_mentor_prompt(), grocery_analysis_schema());
        let content = self.send(request).await?;
        let analysis = parse_grocery_analysis(&content)?;
        info!(
            item = %analysis.item_name,
            ingredients = analysis.ingredients.len(),
            "Grocery item analysed"
        );
        Ok(analysis)
    }

    fn image_request(
        &self,
        image: &CapturedImage,
        instruction: &str,
        schema: Value,
    ) -> ChatRequest {
        let message = ChatMessage::user_with_image(image.mime_type(), image.to_base64(), instruction);
        self.finish_request(ChatRequest::new(vec![message]).with_json_schema(schema))
    }

    fn finish_request(&self, request: ChatRequest) -> ChatRequest {
        match &self.model {
            Some(model) => request.with_model(model),
            None => request,
        }
    }

    async fn send(&self, request: ChatRequest) -> AppResult<String> {
        let response = self
            .provider
            .complete(&request)
            .await
            .inspect_err(|e| warn!(error = %e, retryable = e.is_retryable(), "AI request failed"))?;
        debug!(model = %response.model, bytes = response.content.len(), "AI response received");
        Ok(response.content)
    }
}

fn parse_json<T: DeserializeOwned>(content: &str, what: &str) -> AppResult<T> {
    serde_json::from_str(content.trim()).map_err(|e| {
        warn!(error = %e, what, "AI response does not match the schema");
        AppError::invalid_ai_response(format!("{what} does not match the expected structure: {e}"))
            .with_source(e)
    })
}

fn validate_nutrition(nutrition: &NutritionalInfo) -> AppResult<()> {
    nutrition.first_invalid_field().map_or(Ok(()), |field| {
        Err(AppError::invalid_ai_response(format!(
            "nutrition field '{field}' must be a non-negative number"
        )))
    })
}

fn require_name(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::invalid_ai_response(format!("'{field}' is empty")))
    } else {
        Ok(())
    }
}

/// Parse and validate a meal analysis
///
/// Questions without text or options cannot be answered and are dropped.
///
/// # Errors
///
/// Returns `InvalidAiResponse` if the text is not a usable meal analysis
pub fn parse_meal_analysis(content: &str) -> AppResult<MealAnalysis> {
    let mut analysis: MealAnalysis = parse_json(content, "meal analysis")?;
    require_name(&analysis.dish_name, "dishName")?;
    validate_nutrition(&analysis.estimated_nutrition)?;

    let asked = analysis.clarifying_questions.len();
    analysis
        .clarifying_questions
        .retain(|q| !q.question.trim().is_empty() && !q.options.is_empty());
    if analysis.clarifying_questions.len() < asked {
        warn!(
            dropped = asked - analysis.clarifying_questions.len(),
            "Dropped unanswerable clarifying questions"
        );
    }
    Ok(analysis)
}

/// Parse and validate a nutrition estimate
///
/// # Errors
///
/// Returns `InvalidAiResponse` if the text is not a usable estimate
pub fn parse_nutrition(content: &str) -> AppResult<NutritionalInfo> {
    let nutrition: NutritionalInfo = parse_json(content, "nutrition estimate")?;
    validate_nutrition(&nutrition)?;
    Ok(nutrition)
}

/// Parse and validate a grocery analysis
///
/// # Errors
///
/// Returns `InvalidAiResponse` if the text is not a usable grocery analysis
pub fn parse_grocery_analysis(content: &str) -> AppResult<GroceryAnalysis> {
    let analysis: GroceryAnalysis = parse_json(content, "grocery analysis")?;
    require_name(&analysis.item_name, "itemName")?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_analysis_drops_optionless_questions() {
        let content = r#"{
            "dishName": "Pad Thai",
            "estimatedNutrition": {"calories": 600, "protein": 22, "carbohydrates": 80, "fat": 20, "portionSize": "1 plate"},
            "clarifyingQuestions": [
                {"question": "Was it fried in oil?", "options": ["Yes", "No"]},
                {"question": "Any extras?", "options": []}
            ]
        }"#;
        let analysis = parse_meal_analysis(content).unwrap();
        assert_eq!(analysis.clarifying_questions.len(), 1);
        assert_eq!(analysis.clarifying_questions[0].question, "Was it fried in oil?");
    }

    #[test]
    fn test_parse_nutrition_rejects_negative_values() {
        let content = r#"{"calories": 300, "protein": -1, "carbohydrates": 10, "fat": 5, "portionSize": "1 cup"}"#;
        let error = parse_nutrition(content).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidAiResponse);
        assert!(error.message.contains("protein"));
    }

    #[test]
    fn test_parse_grocery_rejects_unknown_health_impact() {
        let content = r#"{
            "itemName": "Oat Bar",
            "healthMentorSummary": "Fine in moderation.",
            "ingredients": [{"name": "Sugar", "healthImpact": "terrible", "explanation": "Added sugar."}],
            "healthyAlternatives": []
        }"#;
        let error = parse_grocery_analysis(content).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidAiResponse);
    }

    #[test]
    fn test_parse_meal_analysis_rejects_blank_dish() {
        let content = r#"{
            "dishName": "  ",
            "estimatedNutrition": {"calories": 1, "protein": 1, "carbohydrates": 1, "fat": 1, "portionSize": ""},
            "clarifyingQuestions": []
        }"#;
        assert_eq!(
            parse_meal_analysis(content).unwrap_err().code,
            ErrorCode::InvalidAiResponse
        );
    }
}
