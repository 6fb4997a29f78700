// ABOUTME: Unified error handling with error codes and the client's failure taxonomy
// ABOUTME: AppError carries a code, a message, and an optional chained source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the workspace returns [`AppError`]. The
//! [`ErrorCode`] identifies the failure, and [`ErrorCode::category`] maps it onto
//! the four user-visible failure classes: validation, storage corruption, AI
//! gateway failure, and camera unavailability. None of them is fatal; each is
//! local to the operation that raised it.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use thiserror::Error;

use crate::constants::messages;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Data has an invalid format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// A value lies outside the accepted range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,
    /// An operation was requested from a state that does not allow it
    #[serde(rename = "INVALID_STATE_TRANSITION")]
    InvalidStateTransition = 3004,

    // Devices (4000-4999)
    /// The camera could not be opened
    #[serde(rename = "CAMERA_UNAVAILABLE")]
    CameraUnavailable = 4003,

    // External Services (5000-5999)
    /// The AI service returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The AI service could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// The AI service rejected our credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The AI service is rate limiting us
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// The AI service answered with data that does not match the schema
    #[serde(rename = "INVALID_AI_RESPONSE")]
    InvalidAiResponse = 5004,

    // Configuration (6000-6999)
    /// Generic configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Persisted state could not be read or written
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Persisted state exists but does not deserialize
    #[serde(rename = "STORAGE_CORRUPTED")]
    StorageCorrupted = 9003,
    /// Serialization of in-memory state failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9004,
}

/// User-visible failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// User-entered values were rejected; no state changed
    Validation,
    /// Persisted state failed to deserialize; recovered by wiping it
    StorageCorruption,
    /// Network failure or schema mismatch on an AI call; retryable
    AiGateway,
    /// Permission denied or no camera device
    CameraUnavailable,
    /// Local storage I/O failed
    Storage,
    /// Configuration or internal failure
    Internal,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidStateTransition => "The operation is not allowed in the current state",
            Self::CameraUnavailable => "The camera is unavailable",
            Self::ExternalServiceError => "The AI service encountered an error",
            Self::ExternalServiceUnavailable => "The AI service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the AI service failed",
            Self::ExternalRateLimited => "The AI service rate limit was exceeded",
            Self::InvalidAiResponse => "The AI service returned invalid data",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::StorageCorrupted => "Stored data is corrupted",
            Self::SerializationError => "Data serialization failed",
        }
    }

    /// Map this code onto the user-visible failure class
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange
            | Self::InvalidStateTransition => ErrorCategory::Validation,
            Self::CameraUnavailable => ErrorCategory::CameraUnavailable,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited
            | Self::InvalidAiResponse => ErrorCategory::AiGateway,
            Self::StorageCorrupted => ErrorCategory::StorageCorruption,
            Self::StorageError => ErrorCategory::Storage,
            Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::SerializationError => ErrorCategory::Internal,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Failure class of this error
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Whether the user can simply try the same operation again
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.code.category(), ErrorCategory::AiGateway)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid profile values entered at setup
    #[must_use]
    pub fn invalid_profile() -> Self {
        Self::new(ErrorCode::ValueOutOfRange, messages::INVALID_PROFILE)
    }

    /// Operation attempted from the wrong state
    #[must_use]
    pub fn invalid_transition(operation: &str, state: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStateTransition,
            format!("cannot {operation} while {state}"),
        )
    }

    /// AI payload did not match the expected structure
    #[must_use]
    pub fn invalid_ai_response(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAiResponse, detail)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service could not be reached
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Camera permission denied or no device present
    #[must_use]
    pub fn camera_unavailable(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::CameraUnavailable, detail)
    }

    /// Persisted value failed to deserialize
    #[must_use]
    pub fn storage_corrupted(key: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::StorageCorrupted,
            format!("stored value for '{key}' is corrupted: {detail}"),
        )
    }

    /// Storage I/O error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let code = if error.is_connect() || error.is_timeout() {
            ErrorCode::ExternalServiceUnavailable
        } else {
            ErrorCode::ExternalServiceError
        };
        Self::new(code, format!("HTTP request failed: {error}")).with_source(error)
    }
}
