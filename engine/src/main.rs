//! Crop Risk Advisory Platform - Pipeline Runner
//!
//! Reads a crop plan document, enriches every growth stage with its
//! date window and averaged weather forecast, and scores stage-wise
//! and overall agronomic risk.

use clap::Parser;
use std::io::Read as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod services;

pub use config::Config;

use crate::error::{AppError, AppResult};
use crate::external::{VisualCrossingClient, WeatherApiClient};
use crate::services::{ForecastService, RiskService};
use shared::CropPlan;

/// Command-line arguments for the risk pipeline
#[derive(Parser)]
#[command(name = "cra-cli", version, about = "Crop stage forecast and risk pipeline")]
struct Cli {
    /// Path to the crop plan JSON document; reads stdin when omitted
    plan: Option<PathBuf>,

    /// Stop after forecast enrichment and emit the enriched plan
    #[arg(long)]
    forecast_only: bool,

    /// Pretty-print the emitted document
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays a clean
    // document stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cra_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let response = err.to_response();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| err.to_string())
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Run the full pipeline for one crop plan document
async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::load().map_err(|e| AppError::Configuration(e.to_string()))?;

    tracing::info!("Starting crop risk pipeline");
    tracing::info!("Environment: {}", config.environment);

    let document = read_document(cli.plan.as_deref())?;
    let plan: CropPlan = serde_json::from_str(&document)
        .map_err(|e| AppError::InvalidDocument(format!("Failed to parse crop plan: {}", e)))?;

    let forecast_service = ForecastService::new(
        Box::new(VisualCrossingClient::new(&config.visual_crossing)?),
        Box::new(WeatherApiClient::new(&config.weather_api)?),
        &config.forecast,
    );
    let enriched = forecast_service.enrich_plan(plan).await?;

    let output = if cli.forecast_only {
        serialize(&enriched, cli.pretty)?
    } else {
        let report = RiskService::new().assess_plan(&enriched)?;
        serialize(&report, cli.pretty)?
    };
    println!("{}", output);

    Ok(())
}

fn read_document(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            AppError::InvalidDocument(format!("Cannot read {}: {}", path.display(), e))
        }),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::InvalidDocument(format!("Cannot read stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

fn serialize<T: serde::Serialize>(value: &T, pretty: bool) -> AppResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| AppError::Computation(format!("Failed to serialize output: {}", e)))
}
