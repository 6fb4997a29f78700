// ABOUTME: Analysis flows driving photo analysis from capture to a confirmed result
// ABOUTME: Meal logging with clarifying questions and grocery item review state machines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Flows
//!
//! Each flow owns its working state as a tagged union, so data that only
//! exists in one phase (the prior analysis, the chosen answers, the final
//! estimate) is only reachable in that phase. Drivers take `&mut self` across
//! the AI call, which rules out a second request on the same flow while one
//! is in flight.
//!
//! Operations requested from the wrong phase fail with
//! `InvalidStateTransition` and leave the flow untouched. AI failures move the
//! flow to its `Error` phase with a retryable message and return the error.

/// Grocery item review
pub mod grocery;
/// Meal analysis, clarification, and confirmation
pub mod meal;

pub use grocery::{GroceryMentor, GroceryState};
pub use meal::{MealAnalysisState, MealLogger};
