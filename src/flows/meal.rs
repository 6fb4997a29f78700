// ABOUTME: Meal logging state machine from photo to a confirmed food log entry
// ABOUTME: Analyze, answer clarifying questions, refine, and confirm or reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::mem;

use calorie_core::constants::messages;
use calorie_core::models::{MealAnalysis, NewFoodLog, NutritionalInfo};
use tracing::{debug, info, warn};

use crate::capture::CapturedImage;
use crate::errors::{AppError, AppResult};
use crate::services::AnalysisGateway;

/// Phase of a meal analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MealAnalysisState {
    /// Waiting for a photo
    #[default]
    Idle,
    /// First-pass analysis in flight
    Analyzing,
    /// The model asked how the dish was prepared
    AwaitingAnswers {
        /// Photo being analysed
        image: CapturedImage,
        /// First-pass analysis with its questions
        analysis: MealAnalysis,
        /// Chosen option per question text
        answers: BTreeMap<String, String>,
    },
    /// Refinement in flight
    Refining {
        /// First-pass analysis being refined
        analysis: MealAnalysis,
        /// Answers sent with the refinement
        answers: BTreeMap<String, String>,
    },
    /// Final estimate ready for confirmation
    Complete {
        /// Photo being analysed
        image: CapturedImage,
        /// Name the log entry will carry
        dish_name: String,
        /// Final nutrition estimate
        nutrition: NutritionalInfo,
    },
    /// The last AI call failed
    Error {
        /// Message for the user
        message: &'static str,
        /// Underlying failure
        detail: String,
    },
}

impl MealAnalysisState {
    /// Short phase name for logs and errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::AwaitingAnswers { .. } => "awaiting answers",
            Self::Refining { .. } => "refining",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "in error",
        }
    }

    /// Whether an AI call is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing | Self::Refining { .. })
    }
}

/// Drives one meal from photo to food log entry
#[derive(Clone)]
pub struct MealLogger {
    gateway: AnalysisGateway,
    state: MealAnalysisState,
}

impl MealLogger {
    /// Create an idle logger
    #[must_use]
    pub fn new(gateway: AnalysisGateway) -> Self {
        Self {
            gateway,
            state: MealAnalysisState::Idle,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn state(&self) -> &MealAnalysisState {
        &self.state
    }

    /// Analyse a new photo, discarding any previous result
    ///
    /// Without clarifying questions the first estimate is final and the flow
    /// goes straight to `Complete`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` while a call is in flight, or the AI
    /// gateway error after moving to `Error`
    pub async fn analyze(&mut self, image: CapturedImage) -> AppResult<&MealAnalysisState> {
        if self.state.is_busy() {
            return Err(AppError::invalid_transition("analyze a photo", self.state.name()));
        }

        self.state = MealAnalysisState::Analyzing;
        let result = self.gateway.analyze_meal_image(&image).await;
        match result {
            Ok(analysis) if analysis.clarifying_questions.is_empty() => {
                debug!(dish = %analysis.dish_name, "No clarifying questions; estimate is final");
                self.state = MealAnalysisState::Complete {
                    image,
                    dish_name: analysis.dish_name,
                    nutrition: analysis.estimated_nutrition,
                };
            }
            Ok(analysis) => {
                self.state = MealAnalysisState::AwaitingAnswers {
                    image,
                    analysis,
                    answers: BTreeMap::new(),
                };
            }
            Err(e) => return Err(self.fail(messages::MEAL_ANALYSIS_FAILED, e)),
        }
        Ok(&self.state)
    }

    /// Choose `option` for `question`, replacing an earlier choice
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` outside `AwaitingAnswers`, or a
    /// validation error for a question or option the analysis did not offer
    pub fn select_answer(&mut self, question: &str, option: &str) -> AppResult<()> {
        let phase = self.state.name();
        let MealAnalysisState::AwaitingAnswers {
            analysis, answers, ..
        } = &mut self.state
        else {
            return Err(AppError::invalid_transition("answer a question", phase));
        };

        let asked = analysis
            .question(question)
            .ok_or_else(|| AppError::invalid_input(format!("unknown question '{question}'")))?;
        if !asked.options.iter().any(|offered| offered == option) {
            return Err(AppError::invalid_input(format!(
                "'{option}' is not an option for '{question}'"
            )));
        }

        answers.insert(question.to_owned(), option.to_owned());
        Ok(())
    }

    /// Whether every clarifying question has an answer
    #[must_use]
    pub fn all_answered(&self) -> bool {
        match &self.state {
            MealAnalysisState::AwaitingAnswers {
                analysis, answers, ..
            } => analysis
                .clarifying_questions
                .iter()
                .all(|q| answers.contains_key(&q.question)),
            _ => false,
        }
    }

    /// Re-estimate the meal from the answers chosen so far
    ///
    /// Unanswered questions are left out of the request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` outside `AwaitingAnswers`, or the AI
    /// gateway error after moving to `Error`
    pub async fn refine(&mut self) -> AppResult<&MealAnalysisState> {
        let (image, analysis, answers) = match mem::take(&mut self.state) {
            MealAnalysisState::AwaitingAnswers {
                image,
                analysis,
                answers,
            } => (image, analysis, answers),
            other => {
                let error = AppError::invalid_transition("refine the estimate", other.name());
                self.state = other;
                return Err(error);
            }
        };

        let ordered: Vec<(String, String)> = analysis
            .clarifying_questions
            .iter()
            .filter_map(|q| {
                answers
                    .get(&q.question)
                    .map(|answer| (q.question.clone(), answer.clone()))
            })
            .collect();
        if ordered.len() < analysis.clarifying_questions.len() {
            debug!(
                answered = ordered.len(),
                asked = analysis.clarifying_questions.len(),
                "Refining with partial answers"
            );
        }

        self.state = MealAnalysisState::Refining {
            analysis: analysis.clone(),
            answers,
        };
        let result = self
            .gateway
            .refine_meal_nutrition(&analysis.dish_name, &ordered, &analysis.estimated_nutrition)
            .await;
        match result {
            Ok(nutrition) => {
                self.state = MealAnalysisState::Complete {
                    image,
                    dish_name: analysis.dish_name,
                    nutrition,
                };
                Ok(&self.state)
            }
            Err(e) => Err(self.fail(messages::MEAL_REFINEMENT_FAILED, e)),
        }
    }

    /// Turn the final estimate into a food log entry and return to `Idle`
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` outside `Complete`
    pub fn confirm(&mut self) -> AppResult<NewFoodLog> {
        match mem::take(&mut self.state) {
            MealAnalysisState::Complete {
                image,
                dish_name,
                nutrition,
            } => {
                info!(dish = %dish_name, calories = nutrition.calories, "Meal confirmed");
                Ok(NewFoodLog {
                    name: dish_name,
                    nutrition,
                    image: image.data_url(),
                })
            }
            other => {
                let error = AppError::invalid_transition("confirm a meal", other.name());
                self.state = other;
                Err(error)
            }
        }
    }

    /// Discard everything and return to `Idle`
    pub fn reset(&mut self) {
        self.state = MealAnalysisState::Idle;
    }

    fn fail(&mut self, message: &'static str, error: AppError) -> AppError {
        warn!(error = %error, message, "Meal analysis failed");
        self.state = MealAnalysisState::Error {
            message,
            detail: error.to_string(),
        };
        error
    }
}
