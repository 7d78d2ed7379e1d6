//! Forecast service merging weather sources and enriching crop plans

use chrono::Days;

use crate::config::ForecastConfig;
use crate::error::{AppError, AppResult};
use crate::external::ForecastProvider;
use shared::{stage_windows, CropPlan, DateRange, ForecastSeries};

/// Forecast service merging two weather sources into stage-level
/// aggregates.
///
/// The primary source seeds the merged series and the secondary source
/// only fills dates the primary missed. A source failure is logged and
/// treated as that source supplying no data, so a run with both
/// sources down still produces a (fully empty) enriched plan.
pub struct ForecastService {
    primary: Box<dyn ForecastProvider>,
    secondary: Box<dyn ForecastProvider>,
    horizon_days: u32,
    default_location: String,
}

impl ForecastService {
    /// Create a new ForecastService instance
    pub fn new(
        primary: Box<dyn ForecastProvider>,
        secondary: Box<dyn ForecastProvider>,
        config: &ForecastConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            horizon_days: config.horizon_days,
            default_location: config.default_location.clone(),
        }
    }

    /// Fetch both sources and merge them into one date-keyed series
    pub async fn merged_series(&self, location: &str, range: &DateRange) -> ForecastSeries {
        let mut series = ForecastSeries::new();

        match self.primary.daily_forecast(location, range).await {
            Ok(records) => {
                tracing::info!(
                    "Source '{}' supplied {} days",
                    self.primary.name(),
                    records.len()
                );
                series.seed(records);
            }
            Err(err) => {
                tracing::warn!("{}", err);
            }
        }

        match self.secondary.daily_forecast(location, range).await {
            Ok(records) => {
                tracing::info!(
                    "Source '{}' supplied {} days",
                    self.secondary.name(),
                    records.len()
                );
                series.fill_gaps(records);
            }
            Err(err) => {
                tracing::warn!("{}", err);
            }
        }

        tracing::info!("Merged forecast series covers {} days", series.len());
        series
    }

    /// Enrich every stage of a crop plan with its date window and the
    /// averaged forecast over that window.
    ///
    /// Stage windows tile forward from the sowing date. Every stage
    /// gets a window and a forecast profile attached even when no
    /// weather data covers it; parameters without a single sample are
    /// simply absent from the profile.
    pub async fn enrich_plan(&self, mut plan: CropPlan) -> AppResult<CropPlan> {
        let location = plan.location_query(&self.default_location);
        let start = plan.sw_date;
        let end = start
            .checked_add_days(Days::new(u64::from(self.horizon_days - 1)))
            .ok_or_else(|| {
                AppError::Computation(format!(
                    "Forecast horizon of {} days overflows the calendar from {}",
                    self.horizon_days, start
                ))
            })?;
        let range = DateRange { start, end };

        tracing::info!(
            "Fetching forecast for '{}' from {} to {}",
            location,
            range.start,
            range.end
        );
        let series = self.merged_series(&location, &range).await;
        if series.is_empty() {
            tracing::warn!("No forecast data available from any source for '{}'", location);
        }

        let durations: Vec<u32> = plan.stages.iter().map(|s| s.duration_days).collect();
        let windows = stage_windows(plan.sw_date, &durations)
            .map_err(|message| AppError::Computation(message.to_string()))?;

        for (stage, window) in plan.stages.iter_mut().zip(windows) {
            stage.forecasted = Some(series.average_over(&window));
            stage.window = Some(window);
        }

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{DailyWeather, StagePlan, WeatherParameter};

    struct FixedSource {
        name: &'static str,
        records: Vec<DailyWeather>,
    }

    #[async_trait]
    impl ForecastProvider for FixedSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn daily_forecast(
            &self,
            _location: &str,
            _range: &DateRange,
        ) -> AppResult<Vec<DailyWeather>> {
            Ok(self.records.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ForecastProvider for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn daily_forecast(
            &self,
            _location: &str,
            _range: &DateRange,
        ) -> AppResult<Vec<DailyWeather>> {
            Err(AppError::SourceUnavailable {
                provider: "failing".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn day_with_tmin(day: u32, tmin: &str) -> DailyWeather {
        DailyWeather {
            date: date(day),
            tmin_c: Some(tmin.parse().unwrap()),
            tmax_c: None,
            rh_pct: None,
            rain_mm: None,
            wind_kmph: None,
            solar_wm2: None,
        }
    }

    fn test_config() -> ForecastConfig {
        ForecastConfig {
            horizon_days: 10,
            default_location: "India".to_string(),
        }
    }

    fn empty_plan(stages: Vec<StagePlan>) -> CropPlan {
        CropPlan {
            crop: None,
            district: None,
            state: None,
            region: None,
            sw_date: date(1),
            stages,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_primary_wins_on_shared_dates_secondary_fills_gaps() {
        let primary = FixedSource {
            name: "primary",
            records: vec![day_with_tmin(1, "20.0"), day_with_tmin(3, "22.0")],
        };
        let secondary = FixedSource {
            name: "secondary",
            records: vec![day_with_tmin(1, "99.0"), day_with_tmin(2, "21.0")],
        };
        let service =
            ForecastService::new(Box::new(primary), Box::new(secondary), &test_config());

        let range = DateRange {
            start: date(1),
            end: date(10),
        };
        let series = tokio_test::block_on(service.merged_series("Nashik", &range));

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.get(date(1)).and_then(|d| d.tmin_c),
            Some(Decimal::from(20))
        );
        assert_eq!(
            series.get(date(2)).and_then(|d| d.tmin_c),
            Some(Decimal::from(21))
        );
        assert_eq!(
            series.get(date(3)).and_then(|d| d.tmin_c),
            Some(Decimal::from(22))
        );
    }

    #[test]
    fn test_both_sources_failing_yields_empty_series() {
        let service = ForecastService::new(
            Box::new(FailingSource),
            Box::new(FailingSource),
            &test_config(),
        );

        let range = DateRange {
            start: date(1),
            end: date(10),
        };
        let series = tokio_test::block_on(service.merged_series("Nashik", &range));

        assert!(series.is_empty());
    }

    #[test]
    fn test_enrich_plan_attaches_windows_and_averages() {
        let primary = FixedSource {
            name: "primary",
            records: (1..=10).map(|d| day_with_tmin(d, "20.0")).collect(),
        };
        let service = ForecastService::new(
            Box::new(primary),
            Box::new(FailingSource),
            &test_config(),
        );

        let plan = empty_plan(vec![
            StagePlan {
                name: Some("Establishment".to_string()),
                duration_days: 4,
                ..StagePlan::default()
            },
            StagePlan {
                name: Some("Vegetative".to_string()),
                duration_days: 3,
                ..StagePlan::default()
            },
        ]);

        let enriched = tokio_test::block_on(service.enrich_plan(plan)).unwrap();

        let first = enriched.stages[0].window.as_ref().unwrap();
        assert_eq!(first.start, date(1));
        assert_eq!(first.end, date(4));
        assert_eq!(first.days, 4);

        let second = enriched.stages[1].window.as_ref().unwrap();
        assert_eq!(second.start, date(5));
        assert_eq!(second.end, date(7));

        let forecasted = enriched.stages[0].forecasted.as_ref().unwrap();
        assert_eq!(
            forecasted.value(WeatherParameter::TminC),
            Some(Decimal::new(2000, 2))
        );
        assert_eq!(forecasted.value(WeatherParameter::RainMm), None);
    }

    #[test]
    fn test_enrich_plan_with_no_data_still_attaches_empty_profiles() {
        let service = ForecastService::new(
            Box::new(FailingSource),
            Box::new(FailingSource),
            &test_config(),
        );

        let plan = empty_plan(vec![StagePlan {
            name: Some("Establishment".to_string()),
            duration_days: 4,
            ..StagePlan::default()
        }]);

        let enriched = tokio_test::block_on(service.enrich_plan(plan)).unwrap();

        let forecasted = enriched.stages[0].forecasted.as_ref().unwrap();
        assert!(forecasted.is_empty());
        assert!(enriched.stages[0].window.is_some());
    }

    #[test]
    fn test_enrich_plan_rejects_durations_past_calendar_range() {
        let service = ForecastService::new(
            Box::new(FailingSource),
            Box::new(FailingSource),
            &test_config(),
        );

        // structurally valid document whose single stage runs past the
        // last representable date
        let plan = empty_plan(vec![StagePlan {
            name: Some("Establishment".to_string()),
            duration_days: u32::MAX,
            ..StagePlan::default()
        }]);

        let err = tokio_test::block_on(service.enrich_plan(plan)).unwrap_err();
        assert!(matches!(err, AppError::Computation(_)));
        assert!(!err.is_client_error());
    }
}
