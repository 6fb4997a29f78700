// ABOUTME: Main library entry point for the Calorie Mentor nutrition tracking client
// ABOUTME: Session persistence, photo capture, AI meal and grocery analysis, and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calorie Mentor
//!
//! A personal calorie-tracking client. It derives daily calorie and macro
//! targets from a one-time profile, logs meals from photos using a generative
//! model for the nutrition estimate, reviews packaged groceries, and
//! summarises intake per day, week, and month.
//!
//! ## Architecture
//!
//! - **`calorie_core`**: models, error taxonomy, storage keys
//! - **`calorie_intelligence`**: requirement formulas and log aggregation
//! - **storage**: key-value persistence of the session
//! - **llm** / **services**: provider abstraction and the analysis gateway
//! - **capture**: image files and camera frames
//! - **session** / **flows**: the session controller and analysis state machines
//! - **formatters**: text and JSON output for the CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use calorie_core::models::UserDetails;
//! use calorie_mentor::errors::AppResult;
//! use calorie_mentor::session::SessionController;
//! use calorie_mentor::storage::FileStore;
//!
//! fn main() -> AppResult<()> {
//!     let store = FileStore::open("./calorie-data")?;
//!     let mut session = SessionController::load(store)?;
//!     let targets = session.complete_setup(UserDetails::default())?;
//!     println!("Daily target: {} kcal", targets.calories);
//!     Ok(())
//! }
//! ```

/// Photo files and camera frames ready for analysis
pub mod capture;

/// Environment-based configuration
pub mod config;

/// Error types shared with the workspace crates
pub mod errors;

/// Meal and grocery analysis state machines
pub mod flows;

/// Text and JSON rendering of command results
pub mod formatters;

/// LLM provider abstraction, Gemini client, prompts, and schemas
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Session controller
pub mod session;

/// Domain services, including the AI analysis gateway
pub mod services;

/// Key-value persistence backends
pub mod storage;
