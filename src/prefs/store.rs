//! Preferences file storage
//!
//! Provides a `PreferencesStore` that loads and saves [`Preferences`] as a
//! pretty-printed JSON file in an XDG-compliant config directory.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::Preferences;

/// File name of the preferences document
const PREFERENCES_FILE: &str = "preferences.json";

/// Errors that can occur when reading or writing preferences
#[derive(Debug, Error)]
pub enum PrefsError {
    /// No home directory to derive a config path from
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Reading or writing the file failed
    #[error("Preferences file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid preferences document
    #[error("Invalid preferences file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and saves the preferences document
///
/// The file lives at `~/.config/wxdash/preferences.json` on Linux, or the
/// equivalent XDG path on other platforms.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Creates a store using the XDG-compliant config directory
    pub fn new() -> Result<Self, PrefsError> {
        let project_dirs = ProjectDirs::from("", "", "wxdash").ok_or(PrefsError::NoConfigDir)?;
        Ok(Self {
            path: project_dirs.config_dir().join(PREFERENCES_FILE),
        })
    }

    /// Creates a store backed by a specific file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the preferences
    ///
    /// # Returns
    /// * `Ok(Preferences::default())` if the file does not exist yet
    /// * `Ok(Preferences)` parsed from the file
    /// * `Err(PrefsError)` if the file cannot be read or parsed
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no preferences file, using defaults");
                return Ok(Preferences::default());
            }
            Err(source) => {
                return Err(PrefsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| PrefsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the preferences, creating parent directories as needed
    pub fn save(&self, preferences: &Preferences) -> Result<(), PrefsError> {
        let io_error = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        fs::write(&self.path, json).map_err(io_error)?;
        debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
