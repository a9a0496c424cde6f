//! Log output setup
//!
//! The terminal is owned by the dashboard, so log records go to a file
//! (`~/.cache/wxdash/wxdash.log` on Linux unless overridden). Verbosity is
//! controlled with `RUST_LOG` and defaults to `wxdash=info`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "wxdash=info";

/// Log file name inside the cache directory
const LOG_FILE: &str = "wxdash.log";

/// Default location of the log file, if a cache directory exists
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wxdash").map(|dirs| dirs.cache_dir().join(LOG_FILE))
}

/// Installs the global subscriber, appending to `path`
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
