//! Weather provider integrations

pub mod visual_crossing;
pub mod weather_api;

pub use visual_crossing::VisualCrossingClient;
pub use weather_api::WeatherApiClient;

use async_trait::async_trait;

use crate::error::AppResult;
use shared::{DailyWeather, DateRange};

/// A weather data source able to supply daily records for a location
/// and date range.
///
/// Implementations translate their provider's field names and units
/// into canonical daily records and nothing more; merging and
/// averaging happen downstream. A failed call surfaces as an error the
/// merge step treats as "no data from this source".
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Short provider name used in logs and error reasons
    fn name(&self) -> &'static str;

    /// Fetch daily records covering as much of the range as the
    /// provider supports
    async fn daily_forecast(
        &self,
        location: &str,
        range: &DateRange,
    ) -> AppResult<Vec<DailyWeather>>;
}
