//! User preferences
//!
//! A small JSON document holding the default city, the preferred temperature
//! unit and a list of favorite cities. It is read once at startup and written
//! back after every change. Only a single local process is expected to write it.

mod store;

pub use store::{PreferencesStore, PrefsError};

use serde::{Deserialize, Serialize};

use crate::data::TemperatureUnit;

/// Persisted user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// City searched at startup when none is given on the command line
    #[serde(rename = "default_location")]
    pub default_city: String,
    /// Unit used to display temperatures
    pub temp_unit: TemperatureUnit,
    /// Favorite city names, in the order they were added
    pub favorites: Vec<String>,
}

impl Preferences {
    /// Adds a favorite; blank names and duplicates are ignored
    ///
    /// Returns `true` if the list changed.
    pub fn add_favorite(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() || self.is_favorite(city) {
            return false;
        }
        self.favorites.push(city.to_string());
        true
    }

    /// Removes a favorite; returns `true` if it was present
    pub fn remove_favorite(&mut self, city: &str) -> bool {
        let before = self.favorites.len();
        self.favorites
            .retain(|favorite| !favorite.eq_ignore_ascii_case(city.trim()));
        self.favorites.len() != before
    }

    /// Adds the city if absent, removes it otherwise; returns whether it is now a favorite
    pub fn toggle_favorite(&mut self, city: &str) -> bool {
        if self.is_favorite(city) {
            self.remove_favorite(city);
            false
        } else {
            self.add_favorite(city)
        }
    }

    /// Favorites are matched case-insensitively
    pub fn is_favorite(&self, city: &str) -> bool {
        let city = city.trim();
        self.favorites
            .iter()
            .any(|favorite| favorite.eq_ignore_ascii_case(city))
    }

    pub fn set_default_city(&mut self, city: &str) {
        self.default_city = city.trim().to_string();
    }

    /// The default city, if one is set
    pub fn default_city(&self) -> Option<&str> {
        let city = self.default_city.trim();
        if city.is_empty() {
            None
        } else {
            Some(city)
        }
    }

    pub fn toggle_unit(&mut self) {
        self.temp_unit = self.temp_unit.toggled();
    }
}
