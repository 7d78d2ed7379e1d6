//! WeatherAPI.com forecast client (secondary forecast source)

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};
use crate::external::ForecastProvider;
use shared::{DailyWeather, DateRange};

const SOURCE_NAME: &str = "weather-api";

/// Number of forecast days WeatherAPI.com serves on the forecast
/// endpoint regardless of the requested range
const FORECAST_DAYS: u32 = 14;

/// Client for the WeatherAPI.com forecast endpoint.
///
/// The endpoint always returns its own fixed horizon, so the requested
/// range only guides logging here; the merge step drops nothing and
/// simply ends up with whatever dates came back. This source reports
/// no daily solar radiation, so that field is always absent.
pub struct WeatherApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn daily_forecast(
        &self,
        location: &str,
        range: &DateRange,
    ) -> AppResult<Vec<DailyWeather>> {
        let url = format!(
            "{}?key={}&q={}&days={}&aqi=no&alerts=no",
            self.base_url, self.api_key, location, FORECAST_DAYS
        );

        tracing::debug!(
            "Requesting WeatherAPI forecast for '{}' (requested {} to {}, provider caps at {} days)",
            location,
            range.start,
            range.end,
            FORECAST_DAYS
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::SourceUnavailable {
                provider: SOURCE_NAME.to_string(),
                reason: format!("Request failed: {}", e),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::SourceUnavailable {
                provider: SOURCE_NAME.to_string(),
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            AppError::SourceUnavailable {
                provider: SOURCE_NAME.to_string(),
                reason: format!("Failed to parse response: {}", e),
            }
        })?;

        Ok(forecast
            .forecast
            .forecastday
            .into_iter()
            .map(DailyWeather::from)
            .collect())
    }
}

// ===== Response Types =====

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecast: Forecast,
}

#[derive(Debug, Default, Deserialize)]
struct Forecast {
    #[serde(default)]
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: NaiveDate,
    day: DaySummary,
}

/// Daily aggregates from WeatherAPI.com, metric units
#[derive(Debug, Deserialize)]
struct DaySummary {
    mintemp_c: Option<f64>,
    maxtemp_c: Option<f64>,
    avghumidity: Option<f64>,
    totalprecip_mm: Option<f64>,
    maxwind_kph: Option<f64>,
}

impl From<ForecastDay> for DailyWeather {
    fn from(entry: ForecastDay) -> Self {
        DailyWeather {
            date: entry.date,
            tmin_c: to_decimal(entry.day.mintemp_c),
            tmax_c: to_decimal(entry.day.maxtemp_c),
            rh_pct: to_decimal(entry.day.avghumidity),
            rain_mm: to_decimal(entry.day.totalprecip_mm),
            wind_kmph: to_decimal(entry.day.maxwind_kph),
            solar_wm2: None,
        }
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64_retain)
}
