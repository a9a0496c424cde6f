//! Forecast record normalizer
//!
//! Converts the `list` of an OpenWeatherMap `/forecast` response into typed
//! [`ForecastSample`]s. A single bad entry fails the whole forecast: a
//! partial series would skew every aggregate computed from it.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use super::{ForecastSample, WeatherError};

/// Format of the `dt_txt` field, e.g. "2024-07-15 12:00:00"
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Top-level forecast response; entries are decoded one by one
#[derive(Debug, Deserialize)]
struct RawForecastResponse {
    list: Vec<Value>,
}

/// A single 3-hour entry of the forecast list
#[derive(Debug, Deserialize)]
struct RawForecastEntry {
    dt_txt: String,
    main: RawMain,
    wind: RawWind,
    weather: Vec<RawCondition>,
    clouds: RawClouds,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: f64,
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawClouds {
    all: u8,
}

/// Normalizes a raw forecast response body into ordered samples
///
/// # Returns
/// * `Ok(Vec<ForecastSample>)` in source order
/// * `Err(WeatherError::MalformedRecord)` if the body or any entry is invalid,
///   or if timestamps are not strictly increasing
pub fn normalize_forecast(body: &str) -> Result<Vec<ForecastSample>, WeatherError> {
    let response: RawForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedRecord(format!("forecast response: {}", e)))?;

    let mut samples: Vec<ForecastSample> = Vec::with_capacity(response.list.len());

    for (index, entry) in response.list.into_iter().enumerate() {
        let sample = normalize_entry(index, entry)?;

        if let Some(previous) = samples.last() {
            if sample.timestamp <= previous.timestamp {
                return Err(WeatherError::MalformedRecord(format!(
                    "forecast entry {}: timestamp {} does not follow {}",
                    index, sample.timestamp, previous.timestamp
                )));
            }
        }

        samples.push(sample);
    }

    Ok(samples)
}

/// Converts one forecast list entry into a sample
fn normalize_entry(index: usize, entry: Value) -> Result<ForecastSample, WeatherError> {
    let malformed = |reason: String| {
        WeatherError::MalformedRecord(format!("forecast entry {}: {}", index, reason))
    };

    let raw: RawForecastEntry =
        serde_json::from_value(entry).map_err(|e| malformed(e.to_string()))?;

    let timestamp = NaiveDateTime::parse_from_str(&raw.dt_txt, DT_TXT_FORMAT)
        .map_err(|_| malformed(format!("invalid dt_txt '{}'", raw.dt_txt)))?;

    let description = raw
        .weather
        .into_iter()
        .next()
        .map(|condition| condition.description)
        .ok_or_else(|| malformed("empty weather array".to_string()))?;

    if raw.main.humidity > 100 {
        return Err(malformed(format!("humidity {} out of range", raw.main.humidity)));
    }
    if raw.clouds.all > 100 {
        return Err(malformed(format!("cloud coverage {} out of range", raw.clouds.all)));
    }

    Ok(ForecastSample {
        timestamp,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        humidity: raw.main.humidity,
        wind_speed: raw.wind.speed,
        wind_direction: raw.wind.deg,
        cloud_coverage: raw.clouds.all,
        description,
    })
}
