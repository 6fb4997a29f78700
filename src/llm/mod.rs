// ABOUTME: LLM provider abstraction layer for image and text analysis requests
// ABOUTME: Defines the provider contract, capability flags, and multimodal request types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! This module defines the contract an LLM provider must implement to serve
//! the analysis gateway.
//!
//! ## Key Concepts
//!
//! - **`LlmCapabilities`**: Bitflags describing provider features (vision, JSON mode)
//! - **`LlmProvider`**: Async trait for a single, non-streaming completion
//! - **`ChatMessage`**: Role-based message made of text and inline image parts
//! - **`ChatRequest`**: Messages plus model and structured-output settings
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use calorie_mentor::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let request = ChatRequest::new(vec![ChatMessage::user("Describe a balanced breakfast.")]);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
pub mod prompts;
pub mod schemas;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    ///
    /// The analysis gateway refuses providers that cannot take images or
    /// constrain their output to a JSON schema.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts inline image input
        const VISION = 0b0000_0001;
        /// Provider can constrain output to a JSON schema
        const JSON_MODE = 0b0000_0010;
        /// Provider supports system instructions
        const SYSTEM_MESSAGES = 0b0000_0100;
    }
}

impl LlmCapabilities {
    /// Check if vision is supported
    #[must_use]
    pub const fn supports_vision(&self) -> bool {
        self.contains(Self::VISION)
    }

    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

/// One piece of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessagePart {
    /// Plain text
    Text(String),
    /// Image sent inline as base64
    InlineImage {
        /// MIME type, e.g. `image/jpeg`
        mime_type: String,
        /// Base64-encoded bytes
        data: String,
    },
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Ordered parts of the message
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    /// Create a text-only message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![MessagePart::Text(content.into())],
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a user message carrying an image followed by an instruction
    #[must_use]
    pub fn user_with_image(
        mime_type: impl Into<String>,
        base64_data: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![
                MessagePart::InlineImage {
                    mime_type: mime_type.into(),
                    data: base64_data.into(),
                },
                MessagePart::Text(instruction.into()),
            ],
        }
    }

    /// Whether any part is an image
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, MessagePart::InlineImage { .. }))
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// JSON schema the response must follow; implies a JSON response
    pub response_schema: Option<Value>,
}

impl ChatRequest {
    /// Create a new request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            response_schema: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Request JSON output constrained to `schema`
    #[must_use]
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Whether any message carries an image
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.messages.iter().any(ChatMessage::has_image)
    }
}

/// Response from a completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (STOP, MAX_TOKENS, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for single-shot completions
///
/// Implementations make exactly one attempt per call; there is no retry or
/// timeout at this layer.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Available models for this provider
    fn available_models(&self) -> &'static [&'static str];

    /// Perform a completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check if the provider is reachable and the API key is valid
    async fn health_check(&self) -> Result<bool, AppError>;
}
