//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Weather parameters tracked by the forecast pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherParameter {
    TminC,
    TmaxC,
    RhPct,
    RainMm,
    WindKmph,
    SolarWm2,
}

impl WeatherParameter {
    /// All parameters carried by a daily record
    pub const ALL: [WeatherParameter; 6] = [
        WeatherParameter::TminC,
        WeatherParameter::TmaxC,
        WeatherParameter::RhPct,
        WeatherParameter::RainMm,
        WeatherParameter::WindKmph,
        WeatherParameter::SolarWm2,
    ];

    /// The five parameters consulted by the risk engine, in scoring order.
    /// Solar irradiance is carried through forecasts but never scored.
    pub const RISK_PARAMETERS: [WeatherParameter; 5] = [
        WeatherParameter::TminC,
        WeatherParameter::TmaxC,
        WeatherParameter::RhPct,
        WeatherParameter::RainMm,
        WeatherParameter::WindKmph,
    ];

    /// Canonical wire key for this parameter
    pub fn key(&self) -> &'static str {
        match self {
            WeatherParameter::TminC => "tmin_c",
            WeatherParameter::TmaxC => "tmax_c",
            WeatherParameter::RhPct => "rh_pct",
            WeatherParameter::RainMm => "rain_mm",
            WeatherParameter::WindKmph => "wind_kmph",
            WeatherParameter::SolarWm2 => "solar_wm2",
        }
    }
}

impl std::fmt::Display for WeatherParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Inclusive date range for provider queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
