//! wxdash - Weather dashboard for any city
//!
//! A terminal UI application that shows current conditions, a day/night
//! temperature breakdown, forecast charts and a cloud coverage heatmap for a
//! city looked up on OpenWeatherMap.

mod app;
mod cli;
mod data;
mod forecast;
mod logging;
mod prefs;
mod search;
mod ui;

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use app::App;
use cli::{Cli, StartupConfig};
use data::WeatherClient;
use prefs::PreferencesStore;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Picks the preferences store: the CLI path, else the config directory
fn preferences_store(config: &StartupConfig) -> Option<PreferencesStore> {
    match &config.prefs_path {
        Some(path) => Some(PreferencesStore::with_path(path.clone())),
        None => PreferencesStore::new()
            .inspect_err(|e| warn!(error = %e, "preferences will not be saved"))
            .ok(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Configuration errors are reported before the terminal is taken over
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("wxdash: {}", e);
            process::exit(2);
        }
    };

    // Logging is best effort; the dashboard works without it
    if let Some(log_path) = config.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("wxdash: logging disabled ({}): {}", log_path.display(), e);
        }
    }

    let weather_client = WeatherClient::new(config.api_key.clone())?;
    let mut app = App::new(weather_client, preferences_store(&config));
    app.apply_startup_config(&config);
    info!(initial_city = ?config.initial_city, "starting dashboard");

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // A queued search runs after the loading screen has been drawn
        if app.has_pending_search() {
            app.run_pending_search().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("dashboard closed");

    Ok(())
}
