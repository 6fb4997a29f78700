// ABOUTME: Session controller owning the profile, food logs, and their persistence
// ABOUTME: Restores or recovers stored state, runs setup, appends logs, and builds the dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Controller
//!
//! A session is either in **Setup** (no profile yet) or on the **Dashboard**
//! (profile and daily requirements known). The controller keeps the in-memory
//! [`SessionState`] and the [`KeyValueStore`] in step: every mutation is
//! written through before it becomes visible.
//!
//! Loading never fails because of bad stored data. A value that does not
//! parse wipes the whole session and starts over at Setup.

use calorie_core::constants::storage_keys;
use calorie_core::models::{
    DailyRequirements, FoodLog, NewFoodLog, NutritionalInfo, UserDetails,
};
use calorie_intelligence::{
    aggregate_by_bucket, compute_requirements, daily_progress, history_view, today_totals,
    ChartBar, MacroProgress, TimeWindow,
};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::storage::KeyValueStore;

/// Profile captured at setup with its derived targets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Body metrics and goals
    pub user_details: UserDetails,
    /// Targets computed from `user_details`
    pub daily_requirements: DailyRequirements,
}

/// Everything a session knows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// `None` until setup completes
    pub profile: Option<Profile>,
    /// Logged meals in insertion order
    pub food_logs: Vec<FoodLog>,
}

/// Screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionView {
    /// Waiting for the profile
    Setup,
    /// Profile known; logging and summaries available
    Dashboard,
}

/// How stored state was found at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A complete profile was restored
    Restored,
    /// Nothing usable was stored; setup is needed
    Fresh,
    /// A stored value was corrupted and the session was wiped
    Recovered {
        /// Key whose value failed to parse
        key: String,
    },
}

/// Dashboard data for one window
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    /// Window the history and chart cover
    pub window: TimeWindow,
    /// Daily targets
    pub requirements: &'a DailyRequirements,
    /// Consumed today, whatever the window
    pub today_totals: NutritionalInfo,
    /// Today's totals against the targets
    pub progress: Vec<MacroProgress>,
    /// Window logs, newest first
    pub history: Vec<&'a FoodLog>,
    /// Chart bars, oldest first; empty for the Today window
    pub chart: Vec<ChartBar>,
}

/// Owns the session state and its store
#[derive(Debug)]
pub struct SessionController<S: KeyValueStore> {
    store: S,
    state: SessionState,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> SessionController<S> {
    /// Restore the session held in `store`
    ///
    /// Both profile keys must be present for a restore; with only one of them
    /// the session starts at Setup and nothing is cleared. A stored value that
    /// does not parse clears every key.
    ///
    /// # Errors
    ///
    /// Returns a storage error only if the store itself cannot be read or cleared
    pub fn load(store: S) -> AppResult<Self> {
        let mut controller = Self {
            store,
            state: SessionState::default(),
            load_outcome: LoadOutcome::Fresh,
        };

        match controller.read_stored_state() {
            Ok(Some(state)) => {
                info!(food_logs = state.food_logs.len(), "Session restored");
                controller.state = state;
                controller.load_outcome = LoadOutcome::Restored;
            }
            Ok(None) => debug!("No complete profile stored; starting setup"),
            Err((key, e)) if e.code == ErrorCode::StorageCorrupted => {
                warn!(key, error = %e, "Stored session is corrupted; clearing it");
                controller.clear_store()?;
                controller.load_outcome = LoadOutcome::Recovered {
                    key: key.to_owned(),
                };
            }
            Err((_, e)) => return Err(e),
        }

        Ok(controller)
    }

    /// Read the stored session; errors carry the key being read
    ///
    /// Every present key is parsed before the profile is checked for
    /// completeness, so a corrupted value is caught even without a profile.
    fn read_stored_state(&self) -> Result<Option<SessionState>, (&'static str, AppError)> {
        let user_details: Option<UserDetails> = self
            .store
            .get_json(storage_keys::USER_DETAILS)
            .map_err(|e| (storage_keys::USER_DETAILS, e))?;
        let daily_requirements: Option<DailyRequirements> = self
            .store
            .get_json(storage_keys::DAILY_REQUIREMENTS)
            .map_err(|e| (storage_keys::DAILY_REQUIREMENTS, e))?;
        let food_logs: Option<Vec<FoodLog>> = self
            .store
            .get_json(storage_keys::FOOD_LOGS)
            .map_err(|e| (storage_keys::FOOD_LOGS, e))?;

        Ok(user_details
            .zip(daily_requirements)
            .map(|(user_details, daily_requirements)| SessionState {
                profile: Some(Profile {
                    user_details,
                    daily_requirements,
                }),
                food_logs: food_logs.unwrap_or_default(),
            }))
    }

    fn clear_store(&mut self) -> AppResult<()> {
        for key in storage_keys::ALL {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// How the stored state was found by [`Self::load`]
    #[must_use]
    pub const fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Current screen
    #[must_use]
    pub const fn view(&self) -> SessionView {
        if self.state.profile.is_some() {
            SessionView::Dashboard
        } else {
            SessionView::Setup
        }
    }

    /// Session state
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Profile, once setup has completed
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.state.profile.as_ref()
    }

    /// Logged meals in insertion order
    #[must_use]
    pub fn food_logs(&self) -> &[FoodLog] {
        &self.state.food_logs
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate the profile, derive its requirements, and save both
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if a profile already exists (it only
    /// changes through [`Self::reset`]); a validation error, leaving the
    /// session unchanged, if height, weight, or age is not positive; or a
    /// storage error if saving fails, in which case nothing stays stored
    pub fn complete_setup(&mut self, user_details: UserDetails) -> AppResult<&DailyRequirements> {
        if self.state.profile.is_some() {
            return Err(AppError::invalid_transition(
                "complete setup",
                "a profile already exists",
            ));
        }
        user_details.validate()?;
        let daily_requirements = compute_requirements(&user_details);

        self.store
            .set_json(storage_keys::USER_DETAILS, &user_details)?;
        if let Err(e) = self
            .store
            .set_json(storage_keys::DAILY_REQUIREMENTS, &daily_requirements)
        {
            if let Err(cleanup) = self.store.remove(storage_keys::USER_DETAILS) {
                warn!(error = %cleanup, "Could not roll back partially saved profile");
            }
            return Err(e);
        }

        info!(
            calories = daily_requirements.calories,
            protein = daily_requirements.protein,
            carbohydrates = daily_requirements.carbohydrates,
            fat = daily_requirements.fat,
            "Setup complete"
        );

        let profile = self.state.profile.insert(Profile {
            user_details,
            daily_requirements,
        });
        Ok(&profile.daily_requirements)
    }

    /// Record a confirmed meal at `now_ms` (epoch milliseconds)
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` before setup, or a storage error if
    /// saving fails, in which case the log is not kept
    pub fn add_food_log(&mut self, entry: NewFoodLog, now_ms: i64) -> AppResult<&FoodLog> {
        if self.state.profile.is_none() {
            return Err(AppError::invalid_transition("log a meal", "setup is incomplete"));
        }

        self.state.food_logs.push(FoodLog::record(entry, now_ms));
        if let Err(e) = self
            .store
            .set_json(storage_keys::FOOD_LOGS, &self.state.food_logs)
        {
            self.state.food_logs.pop();
            return Err(e);
        }

        let log = self
            .state
            .food_logs
            .last()
            .ok_or_else(|| AppError::internal("food log vanished after append"))?;
        info!(log_id = %log.id, name = %log.name, calories = log.nutrition.calories, "Meal logged");
        Ok(log)
    }

    /// Clear the profile and every log, returning to Setup
    ///
    /// # Errors
    ///
    /// Returns a storage error if a key cannot be removed
    pub fn reset(&mut self) -> AppResult<()> {
        self.clear_store()?;
        self.state = SessionState::default();
        info!("Session reset");
        Ok(())
    }

    /// Build the dashboard for `window` as seen at `now`
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` before setup
    pub fn dashboard<Tz: TimeZone>(
        &self,
        window: TimeWindow,
        now: &DateTime<Tz>,
    ) -> AppResult<DashboardSummary<'_>> {
        let profile = self
            .state
            .profile
            .as_ref()
            .ok_or_else(|| AppError::invalid_transition("show the dashboard", "setup is incomplete"))?;

        let logs = &self.state.food_logs;
        let today = today_totals(logs, now);
        let history = history_view(logs, window, now);
        let chart = aggregate_by_bucket(history.iter().copied(), window, &now.timezone());

        Ok(DashboardSummary {
            window,
            requirements: &profile.daily_requirements,
            progress: daily_progress(&today, &profile.daily_requirements),
            today_totals: today,
            history,
            chart,
        })
    }
}
