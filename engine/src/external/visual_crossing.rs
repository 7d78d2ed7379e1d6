//! Visual Crossing Timeline API client (primary forecast source)

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

const SOURCE_NAME: &str = "visual-crossing";

/// Client for the Visual Crossing Timeline API.
///
/// Requests metric daily aggregates for an explicit date range and
/// maps them onto canonical daily records. Solar radiation is taken
/// from the reported W/m² rate when present, otherwise derived from
/// the daily kWh/m² energy total.
pub struct VisualCrossingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl VisualCrossingClient {
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
impl ForecastProvider for VisualCrossingClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn daily_forecast(
        &self,
        location: &str,
        range: &DateRange,
    ) -> AppResult<Vec<DailyWeather>> {
        let url = format!(
            "{}/{}/{}/{}?unitGroup=metric&key={}&include=days",
            self.base_url, location, range.start, range.end, self.api_key
        );

        tracing::debug!(
            "Requesting Visual Crossing forecast for '{}' ({} to {})",
            location,
            range.start,
            range.end
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

        let timeline: TimelineResponse = response.json().await.map_err(|e| {
            AppError::SourceUnavailable {
                provider: SOURCE_NAME.to_string(),
                reason: format!("Failed to parse response: {}", e),
            }
        })?;

        Ok(timeline.days.into_iter().map(DailyWeather::from).collect())
    }
}

// ===== Response Types =====

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    days: Vec<TimelineDay>,
}

/// One daily aggregate from the Timeline API, metric units
#[derive(Debug, Deserialize)]
struct TimelineDay {
    datetime: NaiveDate,
    tempmin: Option<f64>,
    tempmax: Option<f64>,
    humidity: Option<f64>,
    precip: Option<f64>,
    windspeed: Option<f64>,
    /// Mean solar radiation rate in W/m²
    solarradiation: Option<f64>,
    /// Total solar energy for the day in kWh/m²
    solarenergy: Option<f64>,
}

impl From<TimelineDay> for DailyWeather {
    fn from(day: TimelineDay) -> Self {
        // kWh/m² summed over a day converts to a mean W/m² rate by
        // spreading the energy across 24 hours
        let solar_wm2 = match (day.solarradiation, day.solarenergy) {
            (Some(rate), _) => Some(rate),
            (None, Some(energy)) => Some(energy * 1000.0 / 24.0),
            (None, None) => None,
        };

        DailyWeather {
            date: day.datetime,
            tmin_c: to_decimal(day.tempmin),
            tmax_c: to_decimal(day.tempmax),
            rh_pct: to_decimal(day.humidity),
            rain_mm: to_decimal(day.precip),
            wind_kmph: to_decimal(day.windspeed),
            solar_wm2: to_decimal(solar_wm2),
        }
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64_retain)
}
