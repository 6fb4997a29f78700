// ABOUTME: Environment-based configuration loading for the Calorie Mentor client
// ABOUTME: Reads the Gemini API key, model, endpoint, and the data directory from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Environment;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{DEFAULT_GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL};

/// Environment variable names
pub mod env_keys {
    /// Gemini API key, required only by the AI commands
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Model override
    pub const MODEL: &str = "CALORIE_MENTOR_MODEL";
    /// API endpoint override
    pub const API_BASE_URL: &str = "CALORIE_MENTOR_API_BASE_URL";
    /// Directory holding the persisted session
    pub const DATA_DIR: &str = "CALORIE_MENTOR_DATA_DIR";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Directory name under the platform data directory
const DATA_DIR_NAME: &str = "calorie-mentor";

/// Connection settings for the Gemini API
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// API key; `None` when unset or blank
    pub api_key: Option<String>,
    /// Model used for every analysis request
    pub model: String,
    /// Base URL of the Generative Language API
    pub base_url: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: DEFAULT_GEMINI_API_BASE_URL.to_owned(),
        }
    }
}

impl Debug for GeminiSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Directory where the session is persisted
    pub data_dir: PathBuf,
    /// Gemini connection
    pub gemini: GeminiSettings,
}

impl MentorConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `CALORIE_MENTOR_API_BASE_URL` is not an
    /// http(s) URL or `CALORIE_MENTOR_MODEL` is blank
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let environment = env::var(env_keys::ENVIRONMENT)
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let data_dir = non_empty_var(env_keys::DATA_DIR)
            .map_or_else(default_data_dir, PathBuf::from);

        let model = env::var(env_keys::MODEL).unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_owned());
        if model.trim().is_empty() {
            return Err(AppError::config(format!(
                "{} must not be empty",
                env_keys::MODEL
            )));
        }

        let base_url = non_empty_var(env_keys::API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE_URL.to_owned());
        validate_base_url(&base_url)?;

        let config = Self {
            environment,
            data_dir,
            gemini: GeminiSettings {
                api_key: non_empty_var(env_keys::GEMINI_API_KEY),
                model: model.trim().to_owned(),
                base_url: base_url.trim_end_matches('/').to_owned(),
            },
        };

        debug!(
            environment = %config.environment,
            data_dir = %config.data_dir.display(),
            model = %config.gemini.model,
            api_key_present = config.gemini.api_key.is_some(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Replace the data directory
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// The API key, or a configuration error naming the variable to set
    ///
    /// # Errors
    ///
    /// Returns a `ConfigMissing` error when no key is configured
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.gemini.api_key.as_deref().ok_or_else(|| {
            AppError::new(
                ErrorCode::ConfigMissing,
                format!(
                    "{} environment variable not set",
                    env_keys::GEMINI_API_KEY
                ),
            )
        })
    }
}

/// Read a variable, treating blank values as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// `<platform data dir>/calorie-mentor`, or `./.calorie-mentor` when the platform has none
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!(".{DATA_DIR_NAME}")),
        |dir| dir.join(DATA_DIR_NAME),
    )
}

fn validate_base_url(url: &str) -> AppResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "{} must be an http(s) URL, got '{url}'",
            env_keys::API_BASE_URL
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = GeminiSettings {
            api_key: Some("secret-key".to_owned()),
            ..GeminiSettings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://example.test/v1beta").is_ok());
        assert!(validate_base_url("ftp://example.test").is_err());
    }
}
