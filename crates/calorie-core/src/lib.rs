// ABOUTME: Core types and constants for the Calorie Mentor nutrition tracker
// ABOUTME: Foundation crate with error handling, domain models, and storage keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calorie Core
//!
//! Foundation crate providing shared types and constants for the Calorie Mentor
//! client. This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the error taxonomy
//! - **models**: Profile, nutrition, food log, and AI analysis types
//! - **constants**: Persistence keys and nutrition constants

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`UserDetails`, `NutritionalInfo`, `FoodLog`, AI responses)
pub mod models;
