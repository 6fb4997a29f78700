// ABOUTME: Google Gemini LLM provider implementation for structured image analysis
// ABOUTME: Sends inline images with a JSON response schema to the generateContent endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio. The key is sent in the `x-goog-api-key` header so it never
//! appears in URLs or transport error messages.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calorie_mentor::config::MentorConfig;
//! use calorie_mentor::errors::AppError;
//! use calorie_mentor::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = MentorConfig::from_env()?;
//!     let provider = GeminiProvider::from_settings(&config.gemini)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Name a high-protein snack.")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessagePart,
    MessageRole, TokenUsage,
};
use crate::config::GeminiSettings;
use crate::errors::{AppError, ErrorCode};

/// Environment variable for Gemini API key
const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Default model to use
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Available Gemini models
const AVAILABLE_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
];

/// MIME type requested when a response schema is set
const JSON_MIME_TYPE: &str = "application/json";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart>,
}

/// Part of request content
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline binary payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    candidate_count: u32,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

/// Content of a response candidate
#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Part of a response; only text parts are used
#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            default_model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: DEFAULT_GEMINI_API_BASE_URL.to_owned(),
        }
    }

    /// Create a provider from loaded settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings carry no API key.
    pub fn from_settings(settings: &GeminiSettings) -> Result<Self, AppError> {
        let api_key = settings.api_key.as_deref().ok_or_else(|| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!("{GEMINI_API_KEY_ENV} environment variable not set"),
            )
        })?;
        Ok(Self::new(api_key)
            .with_default_model(&settings.model)
            .with_base_url(&settings.base_url))
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at another endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Convert our message role to Gemini's role format
    const fn convert_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::System | MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }

    /// Build the API URL for a model and method
    fn build_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    fn convert_parts(message: &ChatMessage) -> Vec<RequestPart> {
        message
            .parts
            .iter()
            .map(|part| match part {
                MessagePart::Text(text) => RequestPart::Text { text: text.clone() },
                MessagePart::InlineImage { mime_type, data } => RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: data.clone(),
                    },
                },
            })
            .collect()
    }

    /// Build a Gemini API request from a `ChatRequest`
    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for message in &request.messages {
            if message.role == MessageRole::System {
                // Gemini uses separate system_instruction field
                system_instruction = Some(GeminiContent {
                    role: None,
                    parts: Self::convert_parts(message),
                });
            } else {
                contents.push(GeminiContent {
                    role: Some(Self::convert_role(message.role)),
                    parts: Self::convert_parts(message),
                });
            }
        }

        let generation_config = GenerationConfig {
            response_mime_type: request.response_schema.as_ref().map(|_| JSON_MIME_TYPE),
            response_schema: request.response_schema.clone(),
            candidate_count: 1,
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(generation_config),
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_content(response: &GeminiResponse) -> Result<String, AppError> {
        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| AppError::invalid_ai_response("No candidates in Gemini response"))?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(AppError::invalid_ai_response(format!(
                "No content in Gemini response (finish reason: {reason})"
            )));
        }
        Ok(text)
    }

    /// Convert usage metadata to our token usage format
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map API error status to appropriate error type
    ///
    /// Rate limit (429) errors carry a user-readable message derived from the
    /// retry hint Gemini includes.
    fn map_api_error(status: StatusCode, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("Gemini rejected the API key: {message}"),
            ),
            _ => AppError::external_service(
                "Gemini",
                format!("API error ({}): {message}", status.as_u16()),
            ),
        }
    }

    /// Extract a user-friendly quota/rate limit message from Gemini error
    ///
    /// Gemini phrases the hint as "Please retry in 6.406453963s."
    fn extract_quota_message(message: &str) -> String {
        let seconds = message
            .split_once("Please retry in ")
            .and_then(|(_, rest)| rest.split_once('s'))
            .and_then(|(value, _)| value.trim().parse::<f64>().ok())
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0);

        seconds.map_or_else(
            || "AI service quota exceeded. Please wait a moment and try again.".to_owned(),
            |seconds| {
                let seconds_int = seconds.ceil() as u64;
                format!("AI service quota exceeded. Please try again in {seconds_int} seconds.")
            },
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::all()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model), images = request.has_images()))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let url = self.build_url(model, "generateContent");

        let gemini_request = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed before a response arrived");
                AppError::from(e)
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(AppError::from)?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status, &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Gemini envelope");
                AppError::invalid_ai_response(format!("Failed to parse Gemini response: {e}"))
            })?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::external_service("Gemini", error.message));
        }

        let content = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.clone());

        debug!(
            total_tokens = usage.map_or(0, |u| u.total_tokens),
            "Received Gemini response"
        );

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(AppError::from)?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use serde_json::json;

    #[test]
    fn test_request_carries_inline_image_and_schema() {
        let request = ChatRequest::new(vec![ChatMessage::user_with_image(
            "image/jpeg",
            "QUJD",
            "Analyze this food image.",
        )])
        .with_json_schema(json!({"type": "OBJECT"}));

        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], "QUJD");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "Analyze this food image.");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_system_message_becomes_system_instruction() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a nutrition expert."),
            ChatMessage::user("Estimate this meal."),
        ]);
        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a nutrition expert."
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[test]
    fn test_plain_request_has_no_json_mime_type() {
        let request = ChatRequest::new(vec![ChatMessage::user("hello")]);
        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_extract_quota_message() {
        assert_eq!(
            GeminiProvider::extract_quota_message("Quota exceeded. Please retry in 6.406453963s."),
            "AI service quota exceeded. Please try again in 7 seconds."
        );
        assert_eq!(
            GeminiProvider::extract_quota_message("Resource exhausted"),
            "AI service quota exceeded. Please wait a moment and try again."
        );
    }

    #[test]
    fn test_map_api_error_codes() {
        let body = r#"{"error": {"message": "Please retry in 2s."}}"#;
        let limited = GeminiProvider::map_api_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);
        assert!(limited.message.contains("2 seconds"));

        let auth = GeminiProvider::map_api_error(StatusCode::FORBIDDEN, "denied");
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);

        let other = GeminiProvider::map_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(other.code, ErrorCode::ExternalServiceError);
        assert!(other.is_retryable());
    }

    #[test]
    fn test_extract_content_joins_text_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(GeminiProvider::extract_content(&response).unwrap(), "{\"a\":1}");

        let blocked: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        let error = GeminiProvider::extract_content(&blocked).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidAiResponse);
        assert!(error.message.contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_health_check_reports_unreachable_endpoint() {
        let provider = GeminiProvider::new("key").with_base_url("http://127.0.0.1:9/v1beta");
        match provider.health_check().await {
            Ok(healthy) => assert!(!healthy),
            Err(error) => {
                assert_eq!(error.category(), ErrorCategory::AiGateway);
                assert!(error.is_retryable());
            }
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = GeminiProvider::new("super-secret");
        assert!(!format!("{provider:?}").contains("super-secret"));
    }
}
