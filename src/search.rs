//! City search pipeline
//!
//! One search runs sequentially: fetch current weather, fetch the forecast,
//! normalize it, then aggregate. Every search starts from scratch; nothing is
//! carried over from a previous one.

use chrono::{NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::data::{CurrentWeather, WeatherClient, WeatherError};
use crate::forecast::ForecastReport;

/// Request-scoped context for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// City name as typed by the user
    pub city: String,
    /// Reference instant for the chart window, on the same clock as the
    /// forecast timestamps (UTC wall clock)
    pub now: NaiveDateTime,
}

impl SearchRequest {
    /// A request for `city` anchored at the current UTC time
    pub fn new(city: impl Into<String>) -> Self {
        Self::at(city, Utc::now().naive_utc())
    }

    pub fn at(city: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            city: city.into().trim().to_string(),
            now,
        }
    }
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub current: CurrentWeather,
    pub report: ForecastReport,
}

/// Runs the full pipeline for one city
///
/// # Returns
/// * `Ok(Dashboard)` - current conditions plus the aggregated forecast
/// * `Err(WeatherError::EmptyInput)` - if the city is blank; nothing is fetched
/// * `Err(WeatherError)` - the first failure of any stage
pub async fn run_search(
    client: &WeatherClient,
    request: &SearchRequest,
) -> Result<Dashboard, WeatherError> {
    if request.city.is_empty() {
        return Err(WeatherError::EmptyInput);
    }

    let result = fetch_and_aggregate(client, request).await;
    match &result {
        Ok(dashboard) => info!(
            city = %dashboard.current.city,
            samples = dashboard.report.samples().len(),
            "search completed"
        ),
        Err(e) => warn!(city = %request.city, error = %e, "search failed"),
    }
    result
}

async fn fetch_and_aggregate(
    client: &WeatherClient,
    request: &SearchRequest,
) -> Result<Dashboard, WeatherError> {
    let current = client.fetch_current(&request.city).await?;
    let samples = client.fetch_forecast(&request.city).await?;
    let report = ForecastReport::build(samples, request.now);

    Ok(Dashboard { current, report })
}
