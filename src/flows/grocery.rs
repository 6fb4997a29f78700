// ABOUTME: Grocery mentor state machine reviewing a packaged food photo
// ABOUTME: Idle, analyzing, and a complete ingredient review or an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use calorie_core::constants::messages;
use calorie_core::models::GroceryAnalysis;
use tracing::warn;

use crate::capture::CapturedImage;
use crate::errors::{AppError, AppResult};
use crate::services::AnalysisGateway;

/// Phase of a grocery review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroceryState {
    /// Waiting for a photo
    #[default]
    Idle,
    /// Analysis in flight
    Analyzing,
    /// Review ready
    Complete(GroceryAnalysis),
    /// The analysis failed
    Error {
        /// Message for the user
        message: &'static str,
        /// Underlying failure
        detail: String,
    },
}

impl GroceryState {
    /// Short phase name for logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Complete(_) => "complete",
            Self::Error { .. } => "in error",
        }
    }
}

/// Reviews one grocery item at a time
#[derive(Clone)]
pub struct GroceryMentor {
    gateway: AnalysisGateway,
    state: GroceryState,
}

impl GroceryMentor {
    /// Create an idle mentor
    #[must_use]
    pub fn new(gateway: AnalysisGateway) -> Self {
        Self {
            gateway,
            state: GroceryState::Idle,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn state(&self) -> &GroceryState {
        &self.state
    }

    /// Completed review, if any
    #[must_use]
    pub const fn review(&self) -> Option<&GroceryAnalysis> {
        match &self.state {
            GroceryState::Complete(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Review a product photo, replacing any previous review
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` while a review is in flight, or the AI
    /// gateway error after moving to `Error`
    pub async fn analyze(&mut self, image: &CapturedImage) -> AppResult<&GroceryState> {
        if self.state == GroceryState::Analyzing {
            return Err(AppError::invalid_transition("analyze an item", self.state.name()));
        }

        self.state = GroceryState::Analyzing;
        let result = self.gateway.analyze_grocery_image(image).await;
        match result {
            Ok(analysis) => {
                self.state = GroceryState::Complete(analysis);
                Ok(&self.state)
            }
            Err(e) => {
                warn!(error = %e, "Grocery analysis failed");
                self.state = GroceryState::Error {
                    message: messages::GROCERY_ANALYSIS_FAILED,
                    detail: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Discard the review and return to `Idle`
    pub fn reset(&mut self) {
        self.state = GroceryState::Idle;
    }
}
