#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the SecureCheck stop-log dashboard.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use securecheck_analytics_models::PredictionRequest;
use securecheck_cli::{QuerySource, Session, interactive, render};
use securecheck_database::config::load_config;
use securecheck_stop_models::{DriverGender, MAX_DRIVER_AGE};

#[derive(Parser)]
#[command(name = "securecheck", about = "Traffic-stop log analytics")]
struct Cli {
    /// TOML file with the database connection settings. Environment
    /// variables (`SECURECHECK_DB_*`) override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the headline metrics and overview charts
    Overview {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the loaded stop log as a table
    Log {
        /// Show at most this many rows
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// List the query catalog
    Queries,
    /// Run a catalog query by its exact name
    Query {
        /// Catalog entry (e.g., "Top 5 Violations with Highest Arrest Rates")
        key: String,
        /// Evaluate against the loaded snapshot instead of the database
        #[arg(long)]
        in_memory: bool,
        /// Print JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Predict the violation and outcome of a new stop from matching history
    Predict {
        /// Driver gender (M or F)
        #[arg(long)]
        gender: DriverGender,
        /// Driver age in years
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DRIVER_AGE)))]
        age: u8,
        /// Stop duration label (e.g., "0-15 Min")
        #[arg(long)]
        duration: String,
        /// A search was conducted
        #[arg(long)]
        searched: bool,
        /// The stop was drug related
        #[arg(long)]
        drugs: bool,
        /// Stop date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Stop time (HH:MM:SS); defaults to now
        #[arg(long)]
        time: Option<NaiveTime>,
        /// Country name
        #[arg(long)]
        country: Option<String>,
        /// Driver race
        #[arg(long)]
        race: Option<String>,
        /// Kind of search
        #[arg(long)]
        search_type: Option<String>,
        /// Vehicle registration number
        #[arg(long)]
        vehicle: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Loads the configuration and takes the stop-log snapshot, warning on
/// stderr when the snapshot is empty or incomplete.
async fn load_session(config: Option<&Path>) -> Result<Session, Box<dyn std::error::Error>> {
    let session = Session::load(load_config(config)?).await;

    if let Some(diagnostic) = session.diagnostic() {
        eprintln!("Warning: stop log could not be loaded: {diagnostic}");
    }
    if session.skipped() > 0 {
        eprintln!(
            "Warning: {} stop row(s) were skipped while loading",
            session.skipped()
        );
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let Some(command) = cli.command else {
        let session = load_session(config).await?;
        return interactive::run(&session).await;
    };

    match command {
        // The catalog is static, so listing it never touches the store.
        Commands::Queries => print!("{}", render::catalog()),
        Commands::Log { limit, json } => {
            let table = load_session(config).await?.log_table(limit);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", render::table(&table));
            }
        }
        Commands::Overview { json } => {
            let overview = load_session(config).await?.overview();
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print!("{}", render::overview(&overview));
            }
        }
        Commands::Query {
            key,
            in_memory,
            json,
        } => {
            let source = if in_memory {
                QuerySource::Snapshot
            } else {
                QuerySource::Store
            };
            let outcome = load_session(config)
                .await?
                .run_query(&key, source)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", render::outcome(&outcome));
            }
        }
        Commands::Predict {
            gender,
            age,
            duration,
            searched,
            drugs,
            date,
            time,
            country,
            race,
            search_type,
            vehicle,
            json,
        } => {
            let session = load_session(config).await?;
            let now = Local::now().naive_local();
            let report = session.predict(&PredictionRequest {
                stop_date: date.unwrap_or_else(|| now.date()),
                stop_time: time.unwrap_or_else(|| now.time()),
                country_name: country,
                driver_gender: gender,
                driver_age: age,
                driver_race: race,
                search_conducted: searched,
                search_type,
                drugs_related_stop: drugs,
                stop_duration: duration,
                vehicle_number: vehicle,
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Predicted violation: {}", report.prediction.violation);
                println!("Predicted stop outcome: {}", report.prediction.stop_outcome);
                println!();
                println!("{}", report.narrative);
            }
        }
    }

    Ok(())
}
