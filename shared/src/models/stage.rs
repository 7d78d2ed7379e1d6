//! Crop plan documents and stage windowing

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::weather::WeatherProfile;

/// Inclusive date window covered by one growth stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
}

impl StageWindow {
    /// Dates inside the window; yields nothing for a zero-duration stage
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days as usize)
    }
}

/// Compute consecutive stage windows from a sowing date.
///
/// A cursor starts at the sowing date and advances by each stage's
/// duration in order, so windows tile the calendar with no gap and no
/// overlap. The end date is `start + max(duration - 1, 0)` days; a
/// zero-duration stage yields an empty window (`days == 0`) and leaves
/// the cursor in place. Fails when the cumulative durations run past
/// the last date the calendar can represent.
pub fn stage_windows(
    sowing_date: NaiveDate,
    durations: &[u32],
) -> Result<Vec<StageWindow>, &'static str> {
    let mut cursor = sowing_date;
    let mut windows = Vec::with_capacity(durations.len());
    for &duration in durations {
        let end = cursor
            .checked_add_days(Days::new(u64::from(duration.saturating_sub(1))))
            .ok_or("Stage durations extend beyond the supported calendar range")?;
        windows.push(StageWindow {
            start: cursor,
            end,
            days: duration,
        });
        cursor = cursor
            .checked_add_days(Days::new(u64::from(duration)))
            .ok_or("Stage durations extend beyond the supported calendar range")?;
    }
    Ok(windows)
}

/// One growth stage inside a crop plan document.
///
/// Only the fields the pipeline consumes are typed. Everything else the
/// planner supplies is preserved untouched in `extra` and round-trips
/// through enrichment. `forecasted` and `window` are written by the
/// forecast service; `ideal` and `importance_weight` are consumed by the
/// risk engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagePlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal: Option<WeatherProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecasted: Option<WeatherProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<StageWindow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Crop plan document consumed at the forecast-enrichment boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub sw_date: NaiveDate,
    #[serde(default)]
    pub stages: Vec<StagePlan>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CropPlan {
    /// Resolve the location string passed to weather providers.
    ///
    /// Precedence: `"district, state"` when both present -> state ->
    /// district -> region -> the supplied fallback. Blank fields count
    /// as absent.
    pub fn location_query(&self, fallback: &str) -> String {
        let district = trimmed(&self.district);
        let state = trimmed(&self.state);
        match (district, state) {
            (Some(district), Some(state)) => format!("{}, {}", district, state),
            (None, Some(state)) => state.to_string(),
            (Some(district), None) => district.to_string(),
            (None, None) => trimmed(&self.region).unwrap_or(fallback).to_string(),
        }
    }
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn plan(district: Option<&str>, state: Option<&str>, region: Option<&str>) -> CropPlan {
        CropPlan {
            crop: None,
            district: district.map(String::from),
            state: state.map(String::from),
            region: region.map(String::from),
            sw_date: date("2024-06-01"),
            stages: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_windows_tile_from_sowing_date() {
        let windows = stage_windows(date("2024-06-01"), &[30, 25, 20]).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].start, date("2024-06-01"));
        assert_eq!(windows[0].end, date("2024-06-30"));
        assert_eq!(windows[0].days, 30);
        assert_eq!(windows[1].start, date("2024-07-01"));
        assert_eq!(windows[1].end, date("2024-07-25"));
        assert_eq!(windows[2].start, date("2024-07-26"));
        assert_eq!(windows[2].end, date("2024-08-14"));
    }

    #[test]
    fn test_zero_duration_stage_keeps_cursor_in_place() {
        let windows = stage_windows(date("2024-06-01"), &[10, 0, 5]).unwrap();

        assert_eq!(windows[1].start, date("2024-06-11"));
        assert_eq!(windows[1].end, date("2024-06-11"));
        assert_eq!(windows[1].days, 0);
        assert_eq!(windows[1].dates().count(), 0);
        // next stage starts where the empty one did
        assert_eq!(windows[2].start, date("2024-06-11"));
        assert_eq!(windows[2].end, date("2024-06-15"));
    }

    #[test]
    fn test_window_dates_are_inclusive() {
        let windows = stage_windows(date("2024-06-01"), &[3]).unwrap();
        let dates: Vec<NaiveDate> = windows[0].dates().collect();

        assert_eq!(
            dates,
            vec![date("2024-06-01"), date("2024-06-02"), date("2024-06-03")]
        );
    }

    #[test]
    fn test_durations_past_calendar_range_are_rejected() {
        // a century-long plan is fine
        assert!(stage_windows(date("2024-06-01"), &[36_500]).is_ok());

        // a single absurd duration must surface as an error, not a panic
        assert!(stage_windows(date("2024-06-01"), &[u32::MAX]).is_err());

        // so must durations that only overflow cumulatively
        let cumulative = [50_000_000, 50_000_000, 50_000_000];
        assert!(stage_windows(date("2024-06-01"), &cumulative).is_err());
    }

    #[test]
    fn test_location_query_precedence() {
        assert_eq!(
            plan(Some("Nashik"), Some("Maharashtra"), None).location_query("India"),
            "Nashik, Maharashtra"
        );
        assert_eq!(
            plan(None, Some("Maharashtra"), Some("West")).location_query("India"),
            "Maharashtra"
        );
        assert_eq!(plan(Some("Nashik"), None, None).location_query("India"), "Nashik");
        assert_eq!(plan(None, None, Some("West")).location_query("India"), "West");
        assert_eq!(plan(None, None, None).location_query("India"), "India");
    }

    #[test]
    fn test_location_query_ignores_blank_fields() {
        assert_eq!(plan(Some("  "), Some("Kerala"), None).location_query("India"), "Kerala");
        assert_eq!(plan(Some(""), Some(""), Some("")).location_query("India"), "India");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_consecutive_windows_never_gap_or_overlap(
            offset in 0i64..20_000,
            durations in proptest::collection::vec(0u32..120, 1..8)
        ) {
            let sowing = date("2020-01-01") + Days::new(offset as u64);
            let windows = stage_windows(sowing, &durations).unwrap();

            let mut expected_start = sowing;
            for (window, &duration) in windows.iter().zip(durations.iter()) {
                prop_assert_eq!(window.start, expected_start);
                prop_assert_eq!(window.days, duration);
                if duration > 0 {
                    // inclusive end sits one day before the next start
                    prop_assert_eq!(window.end + Days::new(1), window.start + Days::new(u64::from(duration)));
                }
                expected_start = expected_start + Days::new(u64::from(duration));
            }
        }
    }
}
