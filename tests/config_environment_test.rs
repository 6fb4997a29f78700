// ABOUTME: Unit tests for environment-based client configuration
// ABOUTME: Validates defaults, overrides, blank values, and URL validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use calorie_mentor::config::environment::env_keys;
use calorie_mentor::config::{Environment, GeminiSettings, MentorConfig};
use calorie_mentor::errors::ErrorCode;
use calorie_mentor::llm::{DEFAULT_GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL};
use serial_test::serial;

const ALL_KEYS: [&str; 5] = [
    env_keys::GEMINI_API_KEY,
    env_keys::MODEL,
    env_keys::API_BASE_URL,
    env_keys::DATA_DIR,
    env_keys::ENVIRONMENT,
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(
        Environment::from_str_or_default("staging"),
        Environment::Development
    ); // Default fallback
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = MentorConfig::from_env().unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
    assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_API_BASE_URL);
    assert!(config.gemini.api_key.is_none());
    assert!(config.data_dir.ends_with("calorie-mentor"));

    let error = config.require_api_key().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
    assert!(error.message.contains(env_keys::GEMINI_API_KEY));
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_env();
    env::set_var(env_keys::GEMINI_API_KEY, "  test-key  ");
    env::set_var(env_keys::MODEL, "gemini-2.5-pro");
    env::set_var(env_keys::API_BASE_URL, "http://localhost:8089/v1beta/");
    env::set_var(env_keys::DATA_DIR, "/tmp/calorie-mentor-test");
    env::set_var(env_keys::ENVIRONMENT, "testing");

    let config = MentorConfig::from_env().unwrap();
    assert_eq!(config.require_api_key().unwrap(), "test-key");
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.gemini.base_url, "http://localhost:8089/v1beta");
    assert_eq!(config.data_dir, PathBuf::from("/tmp/calorie-mentor-test"));
    assert!(config.environment.is_testing());

    clear_env();
}

#[test]
#[serial]
fn test_blank_api_key_is_treated_as_unset() {
    clear_env();
    env::set_var(env_keys::GEMINI_API_KEY, "   ");

    let config = MentorConfig::from_env().unwrap();
    assert!(config.gemini.api_key.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_invalid_base_url_is_rejected() {
    clear_env();
    env::set_var(env_keys::API_BASE_URL, "generativelanguage.googleapis.com");

    let error = MentorConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigError);
    assert!(error.message.contains(env_keys::API_BASE_URL));

    clear_env();
}

#[test]
#[serial]
fn test_blank_model_is_rejected() {
    clear_env();
    env::set_var(env_keys::MODEL, " ");

    let error = MentorConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigError);

    clear_env();
}

#[test]
#[serial]
fn test_data_dir_override_wins() {
    clear_env();
    let config = MentorConfig::from_env()
        .unwrap()
        .with_data_dir("./custom-data");
    assert_eq!(config.data_dir, PathBuf::from("./custom-data"));
}

#[test]
fn test_debug_output_redacts_key() {
    let config = MentorConfig {
        environment: Environment::Development,
        data_dir: PathBuf::from("/data"),
        gemini: GeminiSettings {
            api_key: Some("super-secret".to_owned()),
            ..GeminiSettings::default()
        },
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
}
