//! Daily weather records and the merged forecast series

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::stage::StageWindow;
use crate::types::WeatherParameter;

/// One calendar date's weather, normalized to canonical units
/// (°C, %, mm, km/h, W/m²).
///
/// Any parameter may be absent for a given day. Adapters omit a field
/// they cannot supply in the canonical unit rather than coerce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmin_c: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax_c: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_mm: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_kmph: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_wm2: Option<Decimal>,
}

impl DailyWeather {
    pub fn value(&self, parameter: WeatherParameter) -> Option<Decimal> {
        match parameter {
            WeatherParameter::TminC => self.tmin_c,
            WeatherParameter::TmaxC => self.tmax_c,
            WeatherParameter::RhPct => self.rh_pct,
            WeatherParameter::RainMm => self.rain_mm,
            WeatherParameter::WindKmph => self.wind_kmph,
            WeatherParameter::SolarWm2 => self.solar_wm2,
        }
    }
}

/// Per-parameter weather values for one growth stage: either the
/// externally supplied ideal targets or the averaged forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmin_c: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax_c: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_mm: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_kmph: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_wm2: Option<Decimal>,
}

impl WeatherProfile {
    pub fn value(&self, parameter: WeatherParameter) -> Option<Decimal> {
        match parameter {
            WeatherParameter::TminC => self.tmin_c,
            WeatherParameter::TmaxC => self.tmax_c,
            WeatherParameter::RhPct => self.rh_pct,
            WeatherParameter::RainMm => self.rain_mm,
            WeatherParameter::WindKmph => self.wind_kmph,
            WeatherParameter::SolarWm2 => self.solar_wm2,
        }
    }

    pub fn set(&mut self, parameter: WeatherParameter, value: Decimal) {
        match parameter {
            WeatherParameter::TminC => self.tmin_c = Some(value),
            WeatherParameter::TmaxC => self.tmax_c = Some(value),
            WeatherParameter::RhPct => self.rh_pct = Some(value),
            WeatherParameter::RainMm => self.rain_mm = Some(value),
            WeatherParameter::WindKmph => self.wind_kmph = Some(value),
            WeatherParameter::SolarWm2 => self.solar_wm2 = Some(value),
        }
    }

    /// True when no parameter carries a value
    pub fn is_empty(&self) -> bool {
        WeatherParameter::ALL
            .iter()
            .all(|&parameter| self.value(parameter).is_none())
    }
}

/// Date-keyed forecast merged from all sources, one entry per date for
/// which at least one source returned data.
///
/// Built once per request; read-only afterward. Iteration order is
/// always ascending by date.
#[derive(Debug, Clone, Default)]
pub struct ForecastSeries {
    days: BTreeMap<NaiveDate, DailyWeather>,
}

impl ForecastSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records from the preferred source, overwriting any
    /// existing entry for the same date. Call before `fill_gaps`.
    pub fn seed(&mut self, records: Vec<DailyWeather>) {
        for record in records {
            self.days.insert(record.date, record);
        }
    }

    /// Insert records only for dates not already present. Lower-priority
    /// sources supply values solely through this path.
    pub fn fill_gaps(&mut self, records: Vec<DailyWeather>) {
        for record in records {
            self.days.entry(record.date).or_insert(record);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyWeather> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Arithmetic mean of each parameter across the window's dates,
    /// counting only dates with a present value for that parameter.
    ///
    /// Dates with no record are skipped, not treated as zero. A
    /// parameter with zero samples is omitted from the result. Averages
    /// are rounded to 2 decimal places.
    pub fn average_over(&self, window: &StageWindow) -> WeatherProfile {
        let mut profile = WeatherProfile::default();
        for &parameter in WeatherParameter::ALL.iter() {
            let samples: Vec<Decimal> = window
                .dates()
                .filter_map(|date| self.get(date).and_then(|record| record.value(parameter)))
                .collect();
            if !samples.is_empty() {
                let sum: Decimal = samples.iter().copied().sum();
                profile.set(parameter, (sum / Decimal::from(samples.len())).round_dp(2));
            }
        }
        profile
    }
}
