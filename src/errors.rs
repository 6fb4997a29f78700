// ABOUTME: Error types for the Calorie Mentor client, re-exported from calorie-core
// ABOUTME: One AppError with codes mapped onto the validation/storage/AI/camera taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The error type lives in `calorie-core` so the intelligence crate and this
//! crate share it. This module re-exports it under the path the rest of the
//! client uses.

pub use calorie_core::errors::{AppError, AppResult, ErrorCategory, ErrorCode};
