// ABOUTME: Integration tests for the AI analysis gateway against a scripted provider
// ABOUTME: Checks request shape, strict response validation, and error propagation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use calorie_core::models::HealthImpact;
use calorie_mentor::errors::{ErrorCategory, ErrorCode};
use calorie_mentor::llm::schemas::{
    grocery_analysis_schema, meal_analysis_schema, nutrition_schema,
};
use calorie_mentor::llm::{LlmCapabilities, MessagePart};
use calorie_mentor::services::AnalysisGateway;
use common::{ScriptedProvider, ScriptedReply};

// ============================================================================
// Meal Analysis
// ============================================================================

#[tokio::test]
async fn test_meal_request_carries_image_and_schema() {
    let (gateway, provider) = common::scripted_gateway(vec![ScriptedReply::Content(
        common::meal_analysis_json("Chicken Curry", 650.0, &[]),
    )]);
    let gateway = gateway.with_model("vision-model");
    let image = common::test_image();

    let analysis = gateway.analyze_meal_image(&image).await.unwrap();
    assert_eq!(analysis.dish_name, "Chicken Curry");
    assert!((analysis.estimated_nutrition.calories - 650.0).abs() < f64::EPSILON);
    assert!(analysis.clarifying_questions.is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("vision-model"));
    assert_eq!(request.response_schema, Some(meal_analysis_schema()));
    assert!(request.has_images());
    assert_eq!(
        request.messages[0].parts[0],
        MessagePart::InlineImage {
            mime_type: "image/jpeg".to_owned(),
            data: image.to_base64(),
        }
    );
}

#[tokio::test]
async fn test_meal_questions_are_preserved_in_order() {
    let (gateway, _provider) = common::scripted_gateway(vec![ScriptedReply::Content(
        common::meal_analysis_json(
            "Fried Rice",
            700.0,
            &[
                ("How was it cooked?", &["Stir-fried", "Steamed"]),
                ("Was there egg?", &["Yes", "No"]),
            ],
        ),
    )]);

    let analysis = gateway.analyze_meal_image(&common::test_image()).await.unwrap();
    let questions: Vec<&str> = analysis
        .clarifying_questions
        .iter()
        .map(|q| q.question.as_str())
        .collect();
    assert_eq!(questions, vec!["How was it cooked?", "Was there egg?"]);
    assert_eq!(analysis.clarifying_questions[0].options, vec!["Stir-fried", "Steamed"]);
}

#[tokio::test]
async fn test_missing_calories_is_an_invalid_response() {
    let content = r#"{"dishName": "Toast", "estimatedNutrition": {"protein": 5, "carbohydrates": 30, "fat": 3, "portionSize": "2 slices"}, "clarifyingQuestions": []}"#;
    let (gateway, _provider) =
        common::scripted_gateway(vec![ScriptedReply::Content(content.to_owned())]);

    let error = gateway
        .analyze_meal_image(&common::test_image())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidAiResponse);
    assert_eq!(error.category(), ErrorCategory::AiGateway);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_non_json_and_negative_values_are_rejected() {
    let (gateway, _provider) = common::scripted_gateway(vec![
        ScriptedReply::Content("I think this is a salad.".to_owned()),
        ScriptedReply::Content(common::meal_analysis_json("Salad", -10.0, &[])),
        ScriptedReply::Content(common::meal_analysis_json("  ", 100.0, &[])),
    ]);
    let image = common::test_image();

    for _ in 0..3 {
        let error = gateway.analyze_meal_image(&image).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidAiResponse);
    }
}

#[tokio::test]
async fn test_provider_failure_propagates_unchanged() {
    let (gateway, _provider) = common::scripted_gateway(vec![ScriptedReply::Fail(
        ErrorCode::ExternalRateLimited,
        "AI service quota exceeded. Please try again in 12 seconds.".to_owned(),
    )]);

    let error = gateway
        .analyze_meal_image(&common::test_image())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert!(error.message.contains("12 seconds"));
    assert!(error.is_retryable());
}

// ============================================================================
// Refinement
// ============================================================================

#[tokio::test]
async fn test_refinement_sends_text_only_prompt_with_answers() {
    let (gateway, provider) = common::scripted_gateway(vec![ScriptedReply::Content(
        common::nutrition_json(520.0, 35.0, 48.0, 21.0),
    )]);
    let answers = vec![
        ("How was it cooked?".to_owned(), "Grilled".to_owned()),
        ("Any sauce?".to_owned(), "Yes".to_owned()),
    ];
    let current = common::nutrition(600.0, 30.0, 50.0, 25.0);

    let refined = gateway
        .refine_meal_nutrition("Chicken Wrap", &answers, &current)
        .await
        .unwrap();
    assert!((refined.calories - 520.0).abs() < f64::EPSILON);
    assert_eq!(refined.portion_size, "1 plate");

    let requests = provider.requests();
    let request = &requests[0];
    assert!(!request.has_images());
    assert_eq!(request.response_schema, Some(nutrition_schema()));
    let MessagePart::Text(prompt) = &request.messages[0].parts[0] else {
        panic!("refinement prompt should be text");
    };
    assert!(prompt.contains("\"Chicken Wrap\""));
    let cooked = prompt.find("- How was it cooked? -> Grilled").unwrap();
    let sauce = prompt.find("- Any sauce? -> Yes").unwrap();
    assert!(cooked < sauce);
}

#[tokio::test]
async fn test_refinement_rejects_missing_field() {
    let (gateway, _provider) = common::scripted_gateway(vec![ScriptedReply::Content(
        r#"{"calories": 500, "protein": 30, "fat": 20, "portionSize": "1 plate"}"#.to_owned(),
    )]);
    let error = gateway
        .refine_meal_nutrition("Wrap", &[], &common::nutrition(500.0, 30.0, 50.0, 20.0))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidAiResponse);
}

// ============================================================================
// Grocery Analysis
// ============================================================================

#[tokio::test]
async fn test_grocery_analysis_parses_ingredients() {
    let (gateway, provider) = common::scripted_gateway(vec![ScriptedReply::Content(
        common::grocery_json("Honey Granola"),
    )]);

    let analysis = gateway
        .analyze_grocery_image(&common::test_image())
        .await
        .unwrap();
    assert_eq!(analysis.item_name, "Honey Granola");
    assert_eq!(analysis.ingredients.len(), 2);
    assert_eq!(analysis.ingredients[0].health_impact, HealthImpact::Good);
    assert_eq!(analysis.ingredients[1].health_impact, HealthImpact::Bad);
    assert_eq!(analysis.healthy_alternatives.len(), 2);
    assert_eq!(
        provider.requests()[0].response_schema,
        Some(grocery_analysis_schema())
    );
}

#[tokio::test]
async fn test_grocery_unknown_impact_is_rejected() {
    let content = r#"{"itemName": "Soda", "healthMentorSummary": "Sugary.", "ingredients": [{"name": "Sugar", "healthImpact": "terrible", "explanation": "x"}], "healthyAlternatives": []}"#;
    let (gateway, _provider) =
        common::scripted_gateway(vec![ScriptedReply::Content(content.to_owned())]);
    let error = gateway
        .analyze_grocery_image(&common::test_image())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidAiResponse);
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_text_only_provider_is_rejected() {
    let provider = Arc::new(ScriptedProvider::with_capabilities(
        Vec::new(),
        LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
    ));
    let Err(error) = AnalysisGateway::new(provider) else {
        panic!("gateway should require vision support");
    };
    assert_eq!(error.code, ErrorCode::ConfigError);
    assert!(error.message.contains("vision"));
}

#[test]
fn test_provider_without_json_mode_is_rejected() {
    let provider = Arc::new(ScriptedProvider::with_capabilities(
        Vec::new(),
        LlmCapabilities::VISION,
    ));
    let Err(error) = AnalysisGateway::new(provider) else {
        panic!("gateway should require JSON mode");
    };
    assert_eq!(error.code, ErrorCode::ConfigError);
    assert!(error.message.contains("JSON mode"));
}
