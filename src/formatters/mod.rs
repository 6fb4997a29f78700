// ABOUTME: Output format abstraction for rendering client results as text or JSON
// ABOUTME: Plain-text renderers for requirements, analyses, the dashboard, and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Output Format Abstraction Layer
//!
//! Every command result can be written either as human-readable text or as
//! pretty-printed JSON. Text renderers round for display only; the values
//! they receive are never modified.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use calorie_mentor::formatters::{format_json, OutputFormat};
//!
//! let format = OutputFormat::from_str_param("json");
//! let output = format_json(&requirements)?;
//! ```

use std::error::Error;
use std::fmt::{self, Write as _};

use calorie_core::models::{
    DailyRequirements, FoodLog, GroceryAnalysis, HealthImpact, MealAnalysis, NutritionalInfo,
};
use calorie_intelligence::{ChartBar, RequirementsBreakdown};
use chrono::TimeZone;
use serde::Serialize;

use crate::session::DashboardSummary;

/// Width of the longest chart bar in characters
const CHART_WIDTH: usize = 30;

/// Output serialization format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// Pretty-printed JSON for scripts
    Json,
}

impl OutputFormat {
    /// Parse format from string parameter (case-insensitive)
    /// Returns `Text` for unrecognized values
    #[must_use]
    pub fn from_str_param(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Get the format name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for formatting operations
#[derive(Debug, Clone)]
pub struct FormatError {
    /// Error message describing what went wrong
    pub message: String,
    /// The format that was being used when the error occurred
    pub format: OutputFormat,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format error ({}): {}", self.format, self.message)
    }
}

impl Error for FormatError {}

/// Serialize data as pretty-printed JSON
///
/// # Errors
///
/// Returns `FormatError` if serialization fails
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(|e| FormatError {
        message: e.to_string(),
        format: OutputFormat::Json,
    })
}

// ============================================================================
// Text Renderers
// ============================================================================

/// Daily targets, with the intermediate values when available
#[must_use]
pub fn render_requirements(
    requirements: &DailyRequirements,
    breakdown: Option<&RequirementsBreakdown>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily targets");
    if let Some(breakdown) = breakdown {
        let _ = writeln!(out, "  BMR:      {:.0} kcal", breakdown.bmr);
        let _ = writeln!(out, "  TDEE:     {:.0} kcal", breakdown.tdee);
    }
    let _ = writeln!(out, "  Calories: {:.0} kcal", requirements.calories);
    let _ = writeln!(out, "  Protein:  {:.0} g", requirements.protein);
    let _ = writeln!(out, "  Carbs:    {:.0} g", requirements.carbohydrates);
    let _ = write!(out, "  Fat:      {:.0} g", requirements.fat);
    out
}

/// One nutrition estimate
#[must_use]
pub fn render_nutrition(nutrition: &NutritionalInfo) -> String {
    let mut out = String::new();
    if !nutrition.portion_size.is_empty() {
        let _ = writeln!(out, "  Portion:  {}", nutrition.portion_size);
    }
    let _ = writeln!(out, "  Calories: {:.0} kcal", nutrition.calories);
    let _ = writeln!(out, "  Protein:  {:.1} g", nutrition.protein);
    let _ = writeln!(out, "  Carbs:    {:.1} g", nutrition.carbohydrates);
    let _ = write!(out, "  Fat:      {:.1} g", nutrition.fat);
    out
}

/// First-pass meal analysis
#[must_use]
pub fn render_meal_analysis(analysis: &MealAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", analysis.dish_name);
    let _ = write!(out, "{}", render_nutrition(&analysis.estimated_nutrition));
    out
}

/// Grocery review with color-free impact markers
#[must_use]
pub fn render_grocery(analysis: &GroceryAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", analysis.item_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", analysis.health_mentor_summary);
    if !analysis.ingredients.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Ingredients");
        for ingredient in &analysis.ingredients {
            let marker = match ingredient.health_impact {
                HealthImpact::Good => '+',
                HealthImpact::Neutral => '~',
                HealthImpact::Bad => '-',
            };
            let _ = writeln!(
                out,
                "  {marker} {} ({}): {}",
                ingredient.name,
                ingredient.health_impact.as_str(),
                ingredient.explanation
            );
        }
    }
    if !analysis.healthy_alternatives.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Healthier alternatives");
        for alternative in &analysis.healthy_alternatives {
            let _ = writeln!(out, "  * {alternative}");
        }
    }
    out.trim_end().to_owned()
}

/// One history line, with the log time shown in `tz`
#[must_use]
pub fn render_food_log<Tz>(log: &FoodLog, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let when = log.logged_at().map_or_else(
        || "unknown time".to_owned(),
        |at| at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
    );
    format!(
        "{when}  {}  C: {:.0}  P: {:.1}g  F: {:.1}g  Cb: {:.1}g",
        log.name,
        log.nutrition.calories,
        log.nutrition.protein,
        log.nutrition.fat,
        log.nutrition.carbohydrates
    )
}

/// Horizontal calorie bars scaled to the largest bucket
#[must_use]
pub fn render_chart(bars: &[ChartBar]) -> String {
    let max = bars.iter().map(|bar| bar.calories).max().unwrap_or(0).max(1);
    let label_width = bars.iter().map(|bar| bar.label.len()).max().unwrap_or(0);
    bars.iter()
        .map(|bar| {
            let filled = (bar.calories.max(0) as usize * CHART_WIDTH) / max as usize;
            format!(
                "{:<label_width$}  {:<CHART_WIDTH$}  {} kcal  P {}g  C {}g  F {}g",
                bar.label,
                "#".repeat(filled),
                bar.calories,
                bar.protein,
                bar.carbs,
                bar.fat
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Today's progress, the window's chart, and its history
#[must_use]
pub fn render_dashboard<Tz>(summary: &DashboardSummary<'_>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "Today");
    for progress in &summary.progress {
        let _ = writeln!(
            out,
            "  {:<9}{:>6.0} / {:.0} {} ({:.0}%), {:.0} {} left",
            format!("{}:", progress.label),
            progress.consumed,
            progress.target,
            progress.unit,
            progress.percentage,
            progress.remaining(),
            progress.unit
        );
    }

    if summary.window.has_chart() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} chart", summary.window);
        if summary.chart.is_empty() {
            let _ = writeln!(out, "  (no data)");
        } else {
            let _ = writeln!(out, "{}", render_chart(&summary.chart));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "History ({})", summary.window);
    if summary.history.is_empty() {
        let _ = writeln!(out, "  No meals logged for this period.");
    }
    for log in &summary.history {
        let _ = writeln!(out, "  {}", render_food_log(log, tz));
    }
    out.trim_end().to_owned()
}
