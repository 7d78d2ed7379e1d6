//! Configuration management for the Crop Risk Advisory engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CRA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Forecast pipeline configuration
    pub forecast: ForecastConfig,

    /// Primary weather provider (timeline API, metric units, solar data)
    pub visual_crossing: ProviderConfig,

    /// Secondary weather provider (14-day horizon, no solar data)
    pub weather_api: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Days of forecast requested from the sowing date
    pub horizon_days: u32,

    /// Location string used when a plan carries no district/state/region
    pub default_location: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider API key
    pub api_key: String,

    /// Provider base URL
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CRA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("forecast.horizon_days", 120)?
            .set_default("forecast.default_location", "India")?
            .set_default("visual_crossing.api_key", "")?
            .set_default(
                "visual_crossing.base_url",
                "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline",
            )?
            .set_default("visual_crossing.timeout_secs", 30)?
            .set_default("weather_api.api_key", "")?
            .set_default("weather_api.base_url", "http://api.weatherapi.com/v1/forecast.json")?
            .set_default("weather_api.timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CRA_ prefix)
            .add_source(
                Environment::with_prefix("CRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.horizon_days == 0 {
            return Err(ConfigError::Message(
                "forecast.horizon_days must be at least 1".to_string(),
            ));
        }
        if self.visual_crossing.timeout_secs == 0 || self.weather_api.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "provider timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
