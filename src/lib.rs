//! wxdash library
//!
//! This module exposes the CLI, data, forecast, preferences and search modules
//! for use in integration tests.

pub mod cli;
pub mod data;
pub mod forecast;
pub mod prefs;
pub mod search;
