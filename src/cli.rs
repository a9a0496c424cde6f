//! Command-line interface parsing for wxdash
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a `StartupConfig` for the application.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::data::TemperatureUnit;

/// Environment variable consulted when `--api-key` is not given
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// No OpenWeatherMap API key was supplied
    #[error("Missing API key: pass --api-key or set OPENWEATHER_API_KEY")]
    MissingApiKey,

    /// The specified unit is not recognized
    #[error("Invalid unit: '{0}'. Valid units: celsius, fahrenheit")]
    InvalidUnit(String),
}

/// wxdash - Weather dashboard for any city
#[derive(Parser, Debug)]
#[command(name = "wxdash")]
#[command(about = "Current weather, forecast charts and day/night statistics for any city")]
#[command(version)]
pub struct Cli {
    /// City to search at startup (defaults to the saved default city)
    ///
    /// Examples:
    ///   wxdash                 # Open with the default city, if any
    ///   wxdash London          # Search London right away
    ///   wxdash "New York"      # Quote names with spaces
    #[arg(value_name = "CITY")]
    pub city: Option<String>,

    /// OpenWeatherMap API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Temperature unit for this session, overriding the saved preference
    ///
    /// Valid units: celsius, fahrenheit
    #[arg(long, value_name = "UNIT")]
    pub units: Option<String>,

    /// Path of the preferences file
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Path of the log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// OpenWeatherMap API key
    pub api_key: String,
    /// City to search immediately
    pub initial_city: Option<String>,
    /// Unit override for this session
    pub unit_override: Option<TemperatureUnit>,
    /// Preferences file override
    pub prefs_path: Option<PathBuf>,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

/// Parses a unit string argument into a TemperatureUnit.
///
/// # Returns
/// * `Ok(TemperatureUnit)` if the string names a known unit
/// * `Err(CliError::InvalidUnit)` otherwise
pub fn parse_unit_arg(s: &str) -> Result<TemperatureUnit, CliError> {
    TemperatureUnit::from_str(s).ok_or_else(|| CliError::InvalidUnit(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the API key is missing or the unit is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        let unit_override = cli.units.as_deref().map(parse_unit_arg).transpose()?;

        let initial_city = cli
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            api_key,
            initial_city,
            unit_override,
            prefs_path: cli.prefs.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}
