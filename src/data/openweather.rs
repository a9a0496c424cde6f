//! OpenWeatherMap API client
//!
//! This module fetches current conditions and the 5-day / 3-hour forecast for
//! a city name, and parses the current-weather response into [`CurrentWeather`].
//! Forecast bodies are handed to the normalizer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::normalize::normalize_forecast;
use super::{Coordinates, CurrentWeather, ForecastSample};

/// Base URL for the OpenWeatherMap 2.5 API
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Upper bound on a single request, including reading the body
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No city name was given; no request is issued
    #[error("Please enter a city name")]
    EmptyInput,

    /// HTTP request failed or timed out
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The weather service answered with a non-success status
    #[error("Weather service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The response is missing expected fields or has invalid values
    #[error("Malformed weather data: {0}")]
    MalformedRecord(String),
}

/// Client for the OpenWeatherMap current-weather and forecast endpoints
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Creates a client against the public API with a bounded request timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Points the client at a different API root (used with mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current conditions for a city
    ///
    /// # Returns
    /// * `Ok(CurrentWeather)` - Current conditions for the city
    /// * `Err(WeatherError)` - If the city is blank, the request fails, or the
    ///   response cannot be parsed
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let body = self.get("weather", city).await?;
        parse_current(&body)
    }

    /// Fetch the 3-hour forecast for a city, normalized into samples
    pub async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, WeatherError> {
        let body = self.get("forecast", city).await?;
        normalize_forecast(&body)
    }

    /// Issues a GET for `endpoint` with the city query and returns the body
    async fn get(&self, endpoint: &str, city: &str) -> Result<String, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyInput);
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, city, "requesting weather data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| warn!(endpoint, error = %e, "weather request failed"))?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "weather service rejected request");
            return Err(upstream_error(status.as_u16(), &text));
        }

        Ok(text)
    }
}

/// Error body returned by the API, e.g. `{"cod":"404","message":"city not found"}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Builds an Upstream error, preferring the API's own message
fn upstream_error(status: u16, body: &str) -> WeatherError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_string());

    let message = if message.is_empty() {
        "no details".to_string()
    } else {
        message
    };

    WeatherError::Upstream { status, message }
}

/// Parse a current-weather response body into a CurrentWeather struct
pub fn parse_current(body: &str) -> Result<CurrentWeather, WeatherError> {
    let raw: RawCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedRecord(format!("current weather: {}", e)))?;

    let condition = raw.weather.into_iter().next().ok_or_else(|| {
        WeatherError::MalformedRecord("current weather: empty weather array".to_string())
    })?;

    Ok(CurrentWeather {
        city: raw.name,
        country: raw.sys.country,
        observed_at: unix_time(raw.dt, "dt")?,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        wind_speed: raw.wind.speed,
        wind_direction: raw.wind.deg,
        sunrise: unix_time(raw.sys.sunrise, "sys.sunrise")?,
        sunset: unix_time(raw.sys.sunset, "sys.sunset")?,
        description: condition.description,
        icon: condition.icon,
        utc_offset_seconds: raw.timezone,
        coordinates: Coordinates {
            latitude: raw.coord.lat,
            longitude: raw.coord.lon,
        },
    })
}

/// Converts unix seconds to a UTC timestamp
fn unix_time(seconds: i64, field: &str) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        WeatherError::MalformedRecord(format!("current weather: {} out of range", field))
    })
}

/// Current-weather response structure
#[derive(Debug, Deserialize)]
struct RawCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    coord: RawCoord,
    main: RawCurrentMain,
    wind: RawCurrentWind,
    sys: RawSys,
    weather: Vec<RawCurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct RawCurrentWind {
    speed: f64,
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct RawSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct RawCurrentCondition {
    description: String,
    icon: String,
}
