//! Core data models for wxdash
//!
//! This module contains the typed records produced from the OpenWeatherMap
//! responses: the current conditions for a city and the normalized 3-hour
//! forecast samples that feed the aggregation pipeline.

pub mod normalize;
pub mod openweather;

pub use normalize::normalize_forecast;
pub use openweather::{WeatherClient, WeatherError};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL for OpenWeatherMap condition icons
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Zoom level used for the OpenStreetMap location link
const MAP_ZOOM: u8 = 10;

/// One forecast sample, valid for a single 3-hour tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Forecast validity time, as delivered by the provider
    pub timestamp: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: u16,
    /// Cloud coverage percentage (0-100)
    pub cloud_coverage: u8,
    /// Short text label, e.g. "light rain"
    pub description: String,
}

/// Geographic coordinates of a city
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A labelled point handed to the location panel
#[derive(Debug, Clone, PartialEq)]
pub struct MapPin {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl MapPin {
    /// Link to the pin on OpenStreetMap
    pub fn osm_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={:.4}&mlon={:.4}#map={}/{:.4}/{:.4}",
            self.latitude, self.longitude, MAP_ZOOM, self.latitude, self.longitude
        )
    }
}

/// Current conditions for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name as resolved by the provider
    pub city: String,
    /// ISO country code
    pub country: String,
    /// Time of the observation
    pub observed_at: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: u16,
    /// Sunrise time
    pub sunrise: DateTime<Utc>,
    /// Sunset time
    pub sunset: DateTime<Utc>,
    /// Condition description, e.g. "scattered clouds"
    pub description: String,
    /// Provider icon code, e.g. "03d"
    pub icon: String,
    /// Offset of the city's clock from UTC, in seconds
    pub utc_offset_seconds: i32,
    /// City location
    pub coordinates: Coordinates,
}

impl CurrentWeather {
    /// The city's UTC offset, if the provider sent a valid one
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds)
    }

    /// Converts an instant to the city's wall clock
    pub fn location_time(&self, instant: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        self.utc_offset().map(|offset| instant.with_timezone(&offset))
    }

    /// URL of the provider's icon for the current condition
    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", ICON_BASE_URL, self.icon)
    }

    /// Location pin labelled with the city name
    pub fn map_pin(&self) -> MapPin {
        MapPin {
            latitude: self.coordinates.latitude,
            longitude: self.coordinates.longitude,
            label: format!("{}, {}", self.city, self.country),
        }
    }

    /// Description with each word capitalized, e.g. "Scattered Clouds"
    pub fn title_description(&self) -> String {
        title_case(&self.description)
    }
}

/// Capitalizes the first letter of each whitespace-separated word
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Converts an absolute Celsius temperature into this unit
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Converts a Celsius temperature difference into this unit
    ///
    /// Differences scale but do not shift.
    pub fn convert_delta(self, celsius_delta: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius_delta,
            TemperatureUnit::Fahrenheit => celsius_delta * 9.0 / 5.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    /// Parses a unit name as accepted on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Some(TemperatureUnit::Celsius),
            "f" | "fahrenheit" | "imperial" => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }
}
