// ABOUTME: Configuration management module for the Calorie Mentor client
// ABOUTME: Environment-only settings for the data directory and the Gemini connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! Everything is read from environment variables; there is no config file.
//! Command-line flags of the `calorie-mentor` binary override the values read here.

/// Environment-variable configuration
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use environment::{GeminiSettings, MentorConfig};
pub use types::Environment;
