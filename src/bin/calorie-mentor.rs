// ABOUTME: Command-line client for Calorie Mentor profile setup, meal logging, and summaries
// ABOUTME: Wires configuration, the file store, the Gemini gateway, and the analysis flows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Create the profile and print the daily targets
//! calorie-mentor setup --height 175 --weight 70 --age 30 --gender male --activity moderate --goal maintain
//!
//! # Log a meal from a photo, answering the clarifying questions on stdin
//! calorie-mentor log-meal --image lunch.jpg
//!
//! # Review a packaged product
//! calorie-mentor grocery --image cereal.png
//!
//! # Today's progress, or a weekly chart
//! calorie-mentor summary --window weekly
//!
//! # Start over
//! calorie-mentor reset --yes
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use calorie_core::models::{ActivityLevel, Gender, Goal, UserDetails};
use calorie_intelligence::{calculate_requirements_breakdown, RequirementsConfig, TimeWindow};
use calorie_mentor::capture::{capture_from_camera, CapturedImage, UnavailableCamera};
use calorie_mentor::config::MentorConfig;
use calorie_mentor::errors::AppError;
use calorie_mentor::flows::{GroceryMentor, GroceryState, MealAnalysisState, MealLogger};
use calorie_mentor::formatters::{
    format_json, render_dashboard, render_food_log, render_grocery, render_meal_analysis,
    render_nutrition, render_requirements, OutputFormat,
};
use calorie_mentor::llm::GeminiProvider;
use calorie_mentor::logging::LoggingConfig;
use calorie_mentor::services::AnalysisGateway;
use calorie_mentor::session::{LoadOutcome, SessionController, SessionView};
use calorie_mentor::storage::FileStore;
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

type InputLines = Lines<BufReader<Stdin>>;

#[derive(Parser)]
#[command(
    name = "calorie-mentor",
    version,
    about = "Photo-based calorie tracking with AI nutrition estimates",
    long_about = "Track calories from meal photos. A generative model estimates the nutrition, asks how the dish was prepared, and refines the estimate from your answers."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the saved session (overrides CALORIE_MENTOR_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, global = true, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create the profile and compute daily targets
    Setup {
        /// Height in centimetres
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Age in years
        #[arg(long)]
        age: f64,
        /// male or female
        #[arg(long)]
        gender: Gender,
        /// sedentary, light, moderate, active or very_active
        #[arg(long, default_value = "moderate")]
        activity: ActivityLevel,
        /// lose, maintain or gain
        #[arg(long, default_value = "maintain")]
        goal: Goal,
    },

    /// Show the profile and its daily targets
    Profile,

    /// Analyse a meal photo and log it
    LogMeal {
        #[command(flatten)]
        source: ImageSource,
        /// Log without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Review a packaged grocery item
    Grocery {
        #[command(flatten)]
        source: ImageSource,
    },

    /// Today's progress plus the chart and history of a window
    Summary {
        /// today, weekly or monthly
        #[arg(long, short = 'w', default_value = "today")]
        window: TimeWindow,
    },

    /// Logged meals in a window, newest first
    History {
        /// today, weekly or monthly
        #[arg(long, short = 'w', default_value = "today")]
        window: TimeWindow,
    },

    /// Delete the profile and every logged meal
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args)]
struct ImageSource {
    /// Photo to analyse
    #[arg(long, required_unless_present = "camera", conflicts_with = "camera")]
    image: Option<PathBuf>,

    /// Take the photo with a camera
    #[arg(long)]
    camera: bool,
}

impl ImageSource {
    fn capture(&self) -> Result<CapturedImage> {
        if let Some(path) = &self.image {
            return Ok(CapturedImage::from_file(path)?);
        }
        capture_from_camera(&mut UnavailableCamera)
            .map_err(|e| anyhow!("{}. Use --image to upload a photo instead.", e.message))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let mut config = MentorConfig::from_env()?;
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    let format = OutputFormat::from_str_param(&cli.format);

    let store = FileStore::open(&config.data_dir)?;
    let mut session = SessionController::load(store)?;
    if let LoadOutcome::Recovered { key } = session.load_outcome() {
        eprintln!("Saved data ('{key}') was unreadable and has been cleared. Please set up your profile again.");
    }

    match cli.command {
        Command::Setup {
            height,
            weight,
            age,
            gender,
            activity,
            goal,
        } => {
            let details = UserDetails {
                height,
                weight,
                age,
                gender,
                activity_level: activity,
                goal,
            };
            setup_command(&mut session, details, format)
        }
        Command::Profile => profile_command(&session, format),
        Command::LogMeal { source, yes } => {
            let gateway = build_gateway(&config)?;
            log_meal_command(&mut session, gateway, &source, yes, format).await
        }
        Command::Grocery { source } => {
            let gateway = build_gateway(&config)?;
            grocery_command(gateway, &source, format).await
        }
        Command::Summary { window } => summary_command(&session, window, format),
        Command::History { window } => history_command(&session, window, format),
        Command::Reset { yes } => reset_command(&mut session, yes).await,
    }
}

fn build_gateway(config: &MentorConfig) -> Result<AnalysisGateway> {
    config.require_api_key()?;
    let provider = GeminiProvider::from_settings(&config.gemini)?;
    debug!(?provider, "Using Gemini provider");
    Ok(AnalysisGateway::new(Arc::new(provider))?.with_model(&config.gemini.model))
}

fn require_dashboard(session: &SessionController<FileStore>) -> Result<()> {
    if session.view() == SessionView::Setup {
        bail!("No profile yet. Run `calorie-mentor setup` first.");
    }
    Ok(())
}

fn setup_command(
    session: &mut SessionController<FileStore>,
    details: UserDetails,
    format: OutputFormat,
) -> Result<()> {
    if session.view() == SessionView::Dashboard {
        bail!("A profile already exists. Run `calorie-mentor reset` first to start over.");
    }
    let requirements = session
        .complete_setup(details)
        .map_err(|e| anyhow!(e.message))?
        .clone();

    match format {
        OutputFormat::Json => println!("{}", format_json(&requirements)?),
        OutputFormat::Text => println!("{}", render_requirements(&requirements, None)),
    }
    Ok(())
}

fn profile_command(session: &SessionController<FileStore>, format: OutputFormat) -> Result<()> {
    require_dashboard(session)?;
    let profile = session
        .profile()
        .ok_or_else(|| anyhow!("No profile yet. Run `calorie-mentor setup` first."))?;
    let breakdown =
        calculate_requirements_breakdown(&profile.user_details, RequirementsConfig::global());

    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&json!({
                "profile": profile,
                "bmr": breakdown.bmr,
                "tdee": breakdown.tdee,
            }))?
        ),
        OutputFormat::Text => {
            let details = &profile.user_details;
            println!(
                "{} cm, {} kg, {} years, {}",
                details.height, details.weight, details.age, details.gender
            );
            println!("Activity: {}", details.activity_level.description());
            println!("Goal: {}", details.goal);
            println!();
            println!(
                "{}",
                render_requirements(&profile.daily_requirements, Some(&breakdown))
            );
        }
    }
    Ok(())
}

/// Turn a failed flow step into the message its `Error` phase shows
fn flow_failure(message: &'static str, error: &AppError) -> anyhow::Error {
    warn!(error = %error, "Analysis step failed");
    anyhow!("{message} ({})", error.message)
}

async fn log_meal_command(
    session: &mut SessionController<FileStore>,
    gateway: AnalysisGateway,
    source: &ImageSource,
    yes: bool,
    format: OutputFormat,
) -> Result<()> {
    require_dashboard(session)?;
    let image = source.capture()?;
    let mut logger = MealLogger::new(gateway);
    let mut input = BufReader::new(stdin()).lines();

    eprintln!("Analyzing your meal...");
    if let Err(e) = logger.analyze(image).await {
        return Err(match logger.state() {
            MealAnalysisState::Error { message, .. } => flow_failure(*message, &e),
            _ => e.into(),
        });
    }

    if let MealAnalysisState::AwaitingAnswers { analysis, .. } = logger.state() {
        let analysis = analysis.clone();
        eprintln!("{}", render_meal_analysis(&analysis));
        eprintln!();
        eprintln!("A few questions to refine the estimate:");
        for question in &analysis.clarifying_questions {
            if let Some(option) = ask_choice(&mut input, &question.question, &question.options).await? {
                logger.select_answer(&question.question, &option)?;
            }
        }
        if !logger.all_answered() {
            eprintln!("Some questions were skipped; refining with the answers given.");
        }

        eprintln!("Refining the estimate...");
        if let Err(e) = logger.refine().await {
            return Err(match logger.state() {
                MealAnalysisState::Error { message, .. } => flow_failure(*message, &e),
                _ => e.into(),
            });
        }
    }

    if let MealAnalysisState::Complete {
        dish_name,
        nutrition,
        ..
    } = logger.state()
    {
        eprintln!();
        eprintln!("{dish_name}");
        eprintln!("{}", render_nutrition(nutrition));
    }

    if !yes && !ask_yes_no(&mut input, "Log this meal? [Y/n] ", true).await? {
        logger.reset();
        eprintln!("Meal discarded.");
        return Ok(());
    }

    let entry = logger.confirm()?;
    let log = session.add_food_log(entry, Utc::now().timestamp_millis())?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&json!({
                "id": log.id,
                "name": log.name,
                "timestamp": log.timestamp,
                "nutrition": log.nutrition,
            }))?
        ),
        OutputFormat::Text => println!("Logged: {}", render_food_log(log, &Local)),
    }
    Ok(())
}

async fn grocery_command(
    gateway: AnalysisGateway,
    source: &ImageSource,
    format: OutputFormat,
) -> Result<()> {
    let image = source.capture()?;
    let mut mentor = GroceryMentor::new(gateway);

    eprintln!("Analyzing the item...");
    if let Err(e) = mentor.analyze(&image).await {
        return Err(match mentor.state() {
            GroceryState::Error { message, .. } => flow_failure(*message, &e),
            _ => e.into(),
        });
    }

    let review = mentor
        .review()
        .ok_or_else(|| anyhow!("grocery review is missing"))?;
    match format {
        OutputFormat::Json => println!("{}", format_json(review)?),
        OutputFormat::Text => println!("{}", render_grocery(review)),
    }
    Ok(())
}

fn summary_command(
    session: &SessionController<FileStore>,
    window: TimeWindow,
    format: OutputFormat,
) -> Result<()> {
    require_dashboard(session)?;
    let now = Local::now();
    let summary = session.dashboard(window, &now)?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&summary)?),
        OutputFormat::Text => println!("{}", render_dashboard(&summary, &Local)),
    }
    Ok(())
}

fn history_command(
    session: &SessionController<FileStore>,
    window: TimeWindow,
    format: OutputFormat,
) -> Result<()> {
    require_dashboard(session)?;
    let now = Local::now();
    let summary = session.dashboard(window, &now)?;
    match format {
        OutputFormat::Json => println!("{}", format_json(&summary.history)?),
        OutputFormat::Text => {
            if summary.history.is_empty() {
                println!("No meals logged for this period.");
            }
            for log in &summary.history {
                println!("{}", render_food_log(log, &Local));
            }
        }
    }
    Ok(())
}

async fn reset_command(session: &mut SessionController<FileStore>, yes: bool) -> Result<()> {
    if !yes {
        let mut input = BufReader::new(stdin()).lines();
        if !ask_yes_no(&mut input, "Delete your profile and all logged meals? [y/N] ", false).await? {
            eprintln!("Nothing was deleted.");
            return Ok(());
        }
    }
    session.reset()?;
    eprintln!("Profile and meal history cleared.");
    Ok(())
}

/// Ask a multiple-choice question on stderr; an empty line or EOF skips it
async fn ask_choice(
    input: &mut InputLines,
    question: &str,
    options: &[String],
) -> Result<Option<String>> {
    eprintln!();
    eprintln!("{question}");
    for (index, option) in options.iter().enumerate() {
        eprintln!("  {}) {option}", index + 1);
    }

    loop {
        eprint!("Choose 1-{} (Enter to skip): ", options.len());
        let Some(line) = input.next_line().await.context("reading answer")? else {
            return Ok(None);
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if let Some(option) = line
            .parse::<usize>()
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .and_then(|index| options.get(index))
        {
            return Ok(Some(option.clone()));
        }
        if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(line)) {
            return Ok(Some(option.clone()));
        }
        eprintln!("Please enter a number between 1 and {}.", options.len());
    }
}

/// Ask a yes/no question on stderr
async fn ask_yes_no(input: &mut InputLines, prompt: &str, default: bool) -> Result<bool> {
    eprint!("{prompt}");
    let line = input.next_line().await.context("reading confirmation")?;
    if line.is_none() {
        eprintln!();
    }
    Ok(confirmation_answer(line.as_deref(), default))
}

/// An empty line takes `default`; EOF never confirms
fn confirmation_answer(line: Option<&str>, default: bool) -> bool {
    let Some(line) = line else {
        return false;
    };
    match line.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
