#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the dashboard.
//!
//! Mirrors the subcommands with `dialoguer` prompts so the stop log, the
//! overview, the query catalog and the prediction form can be used without
//! flags.

use chrono::Local;
use dialoguer::{Confirm, Input, Select};
use securecheck_analytics_models::{CatalogQuery, PredictionRequest};
use securecheck_stop_models::{DriverGender, MAX_DRIVER_AGE, StopDuration};

use crate::{QuerySource, Session, render};

/// Top-level actions available in the interactive menu.
enum Action {
    Log,
    Overview,
    Query,
    Predict,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Log,
        Self::Overview,
        Self::Query,
        Self::Predict,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Log => "Browse the stop log",
            Self::Overview => "Show dashboard overview",
            Self::Query => "Run a catalog query",
            Self::Predict => "Predict a stop outcome",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or the terminal is not interactive.
pub async fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Log => show_log(session)?,
            Action::Overview => print!("{}", render::overview(&session.overview())),
            Action::Query => run_query(session).await?,
            Action::Predict => predict(session)?,
            Action::Quit => return Ok(()),
        }
        println!();
    }
}

fn show_log(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let limit: usize = Input::new()
        .with_prompt("Rows to show (0 for all)")
        .default(50)
        .interact_text()?;

    print!(
        "{}",
        render::table(&session.log_table((limit > 0).then_some(limit)))
    );
    Ok(())
}

async fn run_query(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<String> = CatalogQuery::all().iter().map(ToString::to_string).collect();

    let idx = Select::new()
        .with_prompt("Select a query")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    let source = if Confirm::new()
        .with_prompt("Evaluate against the loaded snapshot instead of the database?")
        .default(false)
        .interact()?
    {
        QuerySource::Snapshot
    } else {
        QuerySource::Store
    };

    let outcome = session.run_query(&labels[idx], source).await?;
    print!("{}", render::outcome(&outcome));
    Ok(())
}

fn predict(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();

    let country_name = prompt_optional_text("Country name")?;

    let genders = [DriverGender::Male, DriverGender::Female];
    let gender_labels: Vec<String> = genders.iter().map(ToString::to_string).collect();
    let driver_gender = genders[Select::new()
        .with_prompt("Driver gender")
        .items(&gender_labels)
        .default(0)
        .interact()?];

    let driver_age: u8 = Input::new()
        .with_prompt(format!("Driver age (0-{MAX_DRIVER_AGE})"))
        .validate_with(|age: &u8| {
            if *age <= MAX_DRIVER_AGE {
                Ok(())
            } else {
                Err(format!("age must be at most {MAX_DRIVER_AGE}"))
            }
        })
        .interact_text()?;

    let driver_race = prompt_optional_text("Driver race")?;
    let search_conducted = Confirm::new()
        .with_prompt("Was a search conducted?")
        .default(false)
        .interact()?;
    let search_type = prompt_optional_text("Search type")?;
    let drugs_related_stop = Confirm::new()
        .with_prompt("Was it a drug-related stop?")
        .default(false)
        .interact()?;

    let durations = duration_choices(session);
    let stop_duration = durations[Select::new()
        .with_prompt("Stop duration")
        .items(&durations)
        .default(0)
        .interact()?]
    .clone();

    let vehicle_number = prompt_optional_text("Vehicle number")?;

    let report = session.predict(&PredictionRequest {
        stop_date: now.date(),
        stop_time: now.time(),
        country_name,
        driver_gender,
        driver_age,
        driver_race,
        search_conducted,
        search_type,
        drugs_related_stop,
        stop_duration,
        vehicle_number,
    });

    println!("Predicted violation: {}", report.prediction.violation);
    println!("Predicted stop outcome: {}", report.prediction.stop_outcome);
    println!();
    println!("{}", report.narrative);
    Ok(())
}

/// Duration labels seen in the snapshot, or the known buckets when the
/// snapshot has none.
fn duration_choices(session: &Session) -> Vec<String> {
    let mut labels: Vec<String> = session
        .records()
        .iter()
        .filter_map(|r| r.stop_duration.clone())
        .collect();
    labels.sort();
    labels.dedup();

    if labels.is_empty() {
        labels = StopDuration::all().iter().map(ToString::to_string).collect();
    }
    labels
}

fn prompt_optional_text(prompt: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    Ok((!input.is_empty()).then(|| input.to_string()))
}
