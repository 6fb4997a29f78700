// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Quiet logging, profile and food log fixtures, and a scripted LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `calorie_mentor`
//!
//! This module provides common fixtures and a scripted provider so the
//! analysis gateway and flows can be tested without network access.

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use calorie_core::models::{
    ActivityLevel, FoodLog, Gender, Goal, NutritionalInfo, UserDetails,
};
use calorie_mentor::capture::CapturedImage;
use calorie_mentor::errors::{AppError, ErrorCode};
use calorie_mentor::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use calorie_mentor::services::AnalysisGateway;
use image::{Rgb, RgbImage};
use serde_json::json;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; quiet by default
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixtures
// ============================================================================

/// 175 cm, 70 kg, 30 year old male, moderately active, maintaining
pub fn male_profile() -> UserDetails {
    UserDetails {
        height: 175.0,
        weight: 70.0,
        age: 30.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::Moderate,
        goal: Goal::Maintain,
    }
}

/// 165 cm, 60 kg, 25 year old female, sedentary, maintaining
pub fn female_profile() -> UserDetails {
    UserDetails {
        height: 165.0,
        weight: 60.0,
        age: 25.0,
        gender: Gender::Female,
        activity_level: ActivityLevel::Sedentary,
        goal: Goal::Maintain,
    }
}

pub fn nutrition(calories: f64, protein: f64, carbohydrates: f64, fat: f64) -> NutritionalInfo {
    NutritionalInfo {
        calories,
        protein,
        carbohydrates,
        fat,
        portion_size: "1 serving".to_owned(),
    }
}

pub fn food_log(name: &str, timestamp: i64, nutrition: NutritionalInfo) -> FoodLog {
    FoodLog {
        id: format!("log-{name}-{timestamp}"),
        name: name.to_owned(),
        timestamp,
        nutrition,
        image: String::new(),
    }
}

/// Small JPEG standing in for a meal photo
pub fn test_image() -> CapturedImage {
    let frame = RgbImage::from_pixel(4, 4, Rgb([200, 120, 40]));
    CapturedImage::from_frame(&frame).unwrap()
}

/// Meal analysis payload with optional clarifying questions
pub fn meal_analysis_json(dish: &str, calories: f64, questions: &[(&str, &[&str])]) -> String {
    let questions: Vec<_> = questions
        .iter()
        .map(|(question, options)| json!({"question": question, "options": options}))
        .collect();
    json!({
        "dishName": dish,
        "estimatedNutrition": {
            "calories": calories,
            "protein": 30.0,
            "carbohydrates": 45.0,
            "fat": 20.0,
            "portionSize": "1 plate"
        },
        "clarifyingQuestions": questions
    })
    .to_string()
}

/// Nutrition payload
pub fn nutrition_json(calories: f64, protein: f64, carbohydrates: f64, fat: f64) -> String {
    json!({
        "calories": calories,
        "protein": protein,
        "carbohydrates": carbohydrates,
        "fat": fat,
        "portionSize": "1 plate"
    })
    .to_string()
}

/// Grocery review payload
pub fn grocery_json(item: &str) -> String {
    json!({
        "itemName": item,
        "healthMentorSummary": "A reasonable choice in moderation.",
        "ingredients": [
            {"name": "Whole oats", "healthImpact": "good", "explanation": "Fibre-rich grain."},
            {"name": "Glucose syrup", "healthImpact": "bad", "explanation": "Added sugar."}
        ],
        "healthyAlternatives": ["Plain oats with fruit", "Homemade granola"]
    })
    .to_string()
}

// ============================================================================
// Scripted Provider
// ============================================================================

/// One canned provider reply
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Successful completion with this text
    Content(String),
    /// Failure with this code and message
    Fail(ErrorCode, String),
}

/// Provider that replays canned replies and records every request
pub struct ScriptedProvider {
    capabilities: LlmCapabilities,
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self::with_capabilities(replies, LlmCapabilities::all())
    }

    pub fn with_capabilities(replies: Vec<ScriptedReply>, capabilities: LlmCapabilities) -> Self {
        Self {
            capabilities,
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Replies not consumed yet
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["scripted-model"]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Content(content)) => Ok(ChatResponse {
                content,
                model: request
                    .model
                    .clone()
                    .unwrap_or_else(|| "scripted-model".to_owned()),
                usage: None,
                finish_reason: Some("STOP".to_owned()),
            }),
            Some(ScriptedReply::Fail(code, message)) => Err(AppError::new(code, message)),
            None => Err(AppError::internal("no scripted reply left")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Gateway over a scripted provider; the provider handle inspects requests
pub fn scripted_gateway(replies: Vec<ScriptedReply>) -> (AnalysisGateway, Arc<ScriptedProvider>) {
    init_test_logging();
    let provider = Arc::new(ScriptedProvider::new(replies));
    let gateway = AnalysisGateway::new(provider.clone()).unwrap_or_else(|e| panic!("{e}"));
    (gateway, provider)
}
