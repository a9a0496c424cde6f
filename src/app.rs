//! Application state management for wxdash
//!
//! This module contains the main application state, handling keyboard input,
//! running searches, and keeping the preferences file in sync with the
//! user's actions.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::cli::StartupConfig;
use crate::data::{TemperatureUnit, WeatherClient, WeatherError};
use crate::prefs::{Preferences, PreferencesStore};
use crate::search::{run_search, Dashboard, SearchRequest};

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Nothing searched yet
    Welcome,
    /// A search for the given city is in flight
    Loading(String),
    /// Showing the most recent successful search
    Dashboard,
}

/// Whether keystrokes go to the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Dashboard tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    DayNight,
    Charts,
    Clouds,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::DayNight, Tab::Charts, Tab::Clouds];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::DayNight => "Day/Night",
            Tab::Charts => "Charts",
            Tab::Clouds => "Clouds",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One-line message shown under the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Selected dashboard tab
    pub tab: Tab,
    /// Whether the search bar has focus
    pub input_mode: InputMode,
    /// Text in the search bar
    pub search_input: String,
    /// Result of the last successful search
    pub dashboard: Option<Dashboard>,
    /// City of the last submitted search, re-run with `r`
    pub last_city: Option<String>,
    /// Message for the status line
    pub status: Option<StatusMessage>,
    /// Persisted preferences
    pub preferences: Preferences,
    /// Unit given on the command line, until the user toggles it
    pub unit_override: Option<TemperatureUnit>,
    /// Timestamp of last successful search
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Set by `x`; the next number key removes that favorite
    pub removing_favorite: bool,
    /// Search waiting to be run by the event loop
    pending_search: Option<SearchRequest>,
    /// Where preferences are saved; `None` keeps them in memory only
    prefs_store: Option<PreferencesStore>,
    /// Weather API client
    weather_client: WeatherClient,
}

impl App {
    /// Creates a new App, loading preferences from `prefs_store`
    ///
    /// An unreadable preferences file is reported on the status line and
    /// replaced by defaults.
    pub fn new(weather_client: WeatherClient, prefs_store: Option<PreferencesStore>) -> Self {
        let mut status = None;
        let preferences = match &prefs_store {
            Some(store) => store.load().unwrap_or_else(|e| {
                warn!(error = %e, "could not load preferences, using defaults");
                status = Some(StatusMessage::Error(format!("Could not read preferences: {}", e)));
                Preferences::default()
            }),
            None => Preferences::default(),
        };

        Self {
            state: AppState::Welcome,
            tab: Tab::Overview,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            dashboard: None,
            last_city: None,
            status,
            preferences,
            unit_override: None,
            last_refresh: None,
            should_quit: false,
            show_help: false,
            removing_favorite: false,
            pending_search: None,
            prefs_store,
            weather_client,
        }
    }

    /// Applies CLI arguments: the unit override and the startup search.
    ///
    /// The city given on the command line wins over the saved default city.
    ///
    /// # Arguments
    /// * `config` - The startup configuration derived from CLI arguments
    pub fn apply_startup_config(&mut self, config: &StartupConfig) {
        if let Some(unit) = config.unit_override {
            self.unit_override = Some(unit);
        }

        let initial_city = config
            .initial_city
            .clone()
            .or_else(|| self.preferences.default_city().map(str::to_string));

        if let Some(city) = initial_city {
            self.submit_search(&city);
        }
    }

    /// Unit used to display temperatures
    pub fn unit(&self) -> TemperatureUnit {
        self.unit_override.unwrap_or(self.preferences.temp_unit)
    }

    /// Name of the city currently on screen, as reported by the service
    pub fn current_city(&self) -> Option<&str> {
        self.dashboard
            .as_ref()
            .map(|dashboard| dashboard.current.city.as_str())
    }

    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Queues a search for `city`; blank input is reported and nothing is queued
    pub fn submit_search(&mut self, city: &str) {
        let request = SearchRequest::new(city);
        if request.city.is_empty() {
            self.status = Some(StatusMessage::Error(WeatherError::EmptyInput.to_string()));
            return;
        }

        self.state = AppState::Loading(request.city.clone());
        self.last_city = Some(request.city.clone());
        self.pending_search = Some(request);
    }

    /// Runs the queued search, if any, and moves to the resulting view.
    ///
    /// On failure the previous dashboard stays on screen with the error on
    /// the status line.
    pub async fn run_pending_search(&mut self) {
        let Some(request) = self.pending_search.take() else {
            return;
        };

        match run_search(&self.weather_client, &request).await {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.last_refresh = Some(Local::now());
                self.status = None;
            }
            Err(e) => {
                self.status = Some(StatusMessage::Error(e.to_string()));
            }
        }

        self.state = if self.dashboard.is_some() {
            AppState::Dashboard
        } else {
            AppState::Welcome
        };
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Key Bindings
    /// - `/`: Edit the search bar (`Enter` submits, `Esc` cancels)
    /// - `Tab`/`Right`, `Shift-Tab`/`Left`: Switch dashboard tab
    /// - `f`: Toggle the current city as a favorite
    /// - `x` then `1`-`9`: Remove that favorite from the list
    /// - `d`: Make the current city the default
    /// - `u`: Toggle between Celsius and Fahrenheit
    /// - `1`-`9`: Search a favorite
    /// - `r`: Re-run the last search
    /// - `?`: Toggle help
    /// - `q`: Quit the application
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key_event);
            return;
        }

        if self.removing_favorite {
            self.handle_removal_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.status = None;
            }
            KeyCode::Char('/') => {
                self.search_input.clear();
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Tab | KeyCode::Right if self.state == AppState::Dashboard => {
                self.tab = self.tab.next();
            }
            KeyCode::BackTab | KeyCode::Left if self.state == AppState::Dashboard => {
                self.tab = self.tab.previous();
            }
            KeyCode::Char('f') => self.toggle_favorite(),
            KeyCode::Char('x') => self.start_favorite_removal(),
            KeyCode::Char('d') => self.set_default_city(),
            KeyCode::Char('u') => self.toggle_unit(),
            KeyCode::Char(c @ '1'..='9') => self.search_favorite(favorite_index(c)),
            KeyCode::Char('r') => {
                if let Some(city) = self.last_city.clone() {
                    self.submit_search(&city);
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Completes `x`: a number key removes that favorite, anything else cancels
    fn handle_removal_key(&mut self, key_event: KeyEvent) {
        self.removing_favorite = false;

        match key_event.code {
            KeyCode::Char(c @ '1'..='9') => self.remove_favorite_at(favorite_index(c)),
            _ => {
                self.status = None;
            }
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let city = std::mem::take(&mut self.search_input);
                self.submit_search(&city);
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_input.push(c);
            }
            _ => {}
        }
    }

    fn search_favorite(&mut self, index: usize) {
        match self.preferences.favorites.get(index).cloned() {
            Some(city) => self.submit_search(&city),
            None => {
                self.status = Some(StatusMessage::Info(format!(
                    "No favorite #{}",
                    index + 1
                )));
            }
        }
    }

    fn start_favorite_removal(&mut self) {
        if self.preferences.favorites.is_empty() {
            self.status = Some(StatusMessage::Info("No favorites to remove".to_string()));
            return;
        }

        // The dashboard does not list favorites, so the prompt does
        let choices: Vec<String> = self
            .preferences
            .favorites
            .iter()
            .take(9)
            .enumerate()
            .map(|(i, city)| format!("{} {}", i + 1, city))
            .collect();

        self.removing_favorite = true;
        self.status = Some(StatusMessage::Info(format!(
            "Remove which favorite? {}  (any other key cancels)",
            choices.join("  ")
        )));
    }

    /// Removes the favorite listed at `index`, whether or not it is on screen
    fn remove_favorite_at(&mut self, index: usize) {
        let Some(city) = self.preferences.favorites.get(index).cloned() else {
            self.status = Some(StatusMessage::Info(format!("No favorite #{}", index + 1)));
            return;
        };

        self.preferences.remove_favorite(&city);
        self.status = Some(StatusMessage::Info(format!("Removed {} from favorites", city)));
        self.save_preferences();
    }

    fn toggle_favorite(&mut self) {
        let Some(city) = self.current_city().map(str::to_string) else {
            return;
        };

        let message = if self.preferences.toggle_favorite(&city) {
            format!("Added {} to favorites", city)
        } else {
            format!("Removed {} from favorites", city)
        };
        self.status = Some(StatusMessage::Info(message));
        self.save_preferences();
    }

    fn set_default_city(&mut self) {
        let Some(city) = self.current_city().map(str::to_string) else {
            return;
        };

        self.preferences.set_default_city(&city);
        self.status = Some(StatusMessage::Info(format!("{} is now the default city", city)));
        self.save_preferences();
    }

    fn toggle_unit(&mut self) {
        self.preferences.temp_unit = self.unit().toggled();
        self.unit_override = None;
        self.status = Some(StatusMessage::Info(format!(
            "Showing temperatures in {}",
            self.preferences.temp_unit.symbol()
        )));
        self.save_preferences();
    }

    /// Writes preferences back; failures go to the status line
    fn save_preferences(&mut self) {
        let Some(store) = &self.prefs_store else {
            return;
        };

        match store.save(&self.preferences) {
            Ok(()) => info!(path = %store.path().display(), "preferences saved"),
            Err(e) => {
                warn!(error = %e, "could not save preferences");
                self.status = Some(StatusMessage::Error(format!(
                    "Could not save preferences: {}",
                    e
                )));
            }
        }
    }
}

/// List index for a number key; '1' is the first favorite
fn favorite_index(c: char) -> usize {
    c as usize - '1' as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::openweather::parse_current;
    use crate::forecast::test_support::{sample_at, timestamp};
    use crate::forecast::ForecastReport;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENT_BODY: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"description": "clear sky", "icon": "01d"}],
        "main": {"temp": 24.0, "feels_like": 23.5, "pressure": 1012, "humidity": 40},
        "wind": {"speed": 2.5, "deg": 90},
        "dt": 1721044800,
        "sys": {"country": "FR", "sunrise": 1721015100, "sunset": 1721073000},
        "timezone": 7200,
        "name": "Paris"
    }"#;

    const FORECAST_BODY: &str = r#"{
        "list": [
            {
                "main": {"temp": 18.0, "feels_like": 17.0, "humidity": 70},
                "weather": [{"description": "few clouds"}],
                "clouds": {"all": 20},
                "wind": {"speed": 3.0, "deg": 200},
                "dt_txt": "2024-07-15 09:00:00"
            },
            {
                "main": {"temp": 12.0, "feels_like": 11.0, "humidity": 80},
                "weather": [{"description": "clear sky"}],
                "clouds": {"all": 0},
                "wind": {"speed": 1.0, "deg": 180},
                "dt_txt": "2024-07-15 21:00:00"
            }
        ]
    }"#;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    fn unreachable_client() -> WeatherClient {
        WeatherClient::new("test-key")
            .expect("Failed to build client")
            .with_base_url("http://127.0.0.1:9")
    }

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = PreferencesStore::with_path(temp_dir.path().join("preferences.json"));
        (App::new(unreachable_client(), Some(store)), temp_dir)
    }

    fn create_test_dashboard() -> Dashboard {
        let current = parse_current(CURRENT_BODY).expect("Failed to parse current weather");
        let samples = vec![
            sample_at("2024-07-15 09:00:00", 18.0, 70),
            sample_at("2024-07-15 21:00:00", 12.0, 80),
        ];
        Dashboard {
            current,
            report: ForecastReport::build(samples, timestamp("2024-07-15 00:00:00")),
        }
    }

    fn app_with_dashboard() -> (App, TempDir) {
        let (mut app, temp_dir) = create_test_app();
        app.dashboard = Some(create_test_dashboard());
        app.state = AppState::Dashboard;
        (app, temp_dir)
    }

    fn saved_preferences(temp_dir: &TempDir) -> Preferences {
        PreferencesStore::with_path(temp_dir.path().join("preferences.json"))
            .load()
            .expect("Preferences should load")
    }

    #[test]
    fn test_initial_state_is_welcome() {
        let (app, _temp_dir) = create_test_app();
        assert_eq!(app.state, AppState::Welcome);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.dashboard.is_none());
        assert!(!app.has_pending_search());
    }

    #[test]
    fn test_slash_starts_editing_and_enter_queues_search() {
        let (mut app, _temp_dir) = create_test_app();

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "Paris");
        assert_eq!(app.search_input, "Paris");

        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state, AppState::Loading("Paris".to_string()));
        assert!(app.has_pending_search());
        assert_eq!(app.last_city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_q_is_typed_while_editing() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));

        type_text(&mut app, "Quito");

        assert!(!app.should_quit);
        assert_eq!(app.search_input, "Quito");
    }

    #[test]
    fn test_backspace_removes_last_character() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Romee");

        app.handle_key(key_event(KeyCode::Backspace));

        assert_eq!(app.search_input, "Rome");
    }

    #[test]
    fn test_esc_cancels_editing() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "Oslo");

        app.handle_key(key_event(KeyCode::Esc));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.search_input.is_empty());
        assert!(!app.has_pending_search());
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn test_blank_search_reports_empty_input() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        type_text(&mut app, "   ");

        app.handle_key(key_event(KeyCode::Enter));

        assert!(!app.has_pending_search());
        assert_eq!(app.state, AppState::Welcome);
        let status = app.status.expect("Blank search should set a status");
        assert!(status.is_error());
        assert!(status.text().contains("city"));
    }

    #[test]
    fn test_q_quits_from_welcome() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let (mut app, _temp_dir) = create_test_app();

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Normal);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_tabs_cycle_in_both_directions() {
        let (mut app, _temp_dir) = app_with_dashboard();

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.tab, Tab::DayNight);
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.tab, Tab::Charts);
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.tab, Tab::Clouds);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Overview);
        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(app.tab, Tab::Clouds);
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.tab, Tab::Charts);
    }

    #[test]
    fn test_tabs_ignored_on_welcome() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Overview);
    }

    #[test]
    fn test_f_toggles_favorite_and_saves() {
        let (mut app, temp_dir) = app_with_dashboard();

        app.handle_key(key_event(KeyCode::Char('f')));
        assert!(app.preferences.is_favorite("Paris"));
        assert_eq!(saved_preferences(&temp_dir).favorites, vec!["Paris"]);

        app.handle_key(key_event(KeyCode::Char('f')));
        assert!(!app.preferences.is_favorite("Paris"));
        assert!(saved_preferences(&temp_dir).favorites.is_empty());
    }

    #[test]
    fn test_x_removes_favorite_that_is_not_on_screen() {
        let (mut app, temp_dir) = app_with_dashboard();
        app.preferences.add_favorite("Parys");
        app.handle_key(key_event(KeyCode::Char('f')));
        assert_eq!(app.preferences.favorites, vec!["Parys", "Paris"]);

        app.handle_key(key_event(KeyCode::Char('x')));
        assert!(app.removing_favorite);
        let prompt = app.status.clone().expect("x should prompt for a number");
        assert!(prompt.text().contains("1 Parys"));
        assert!(prompt.text().contains("2 Paris"));
        app.handle_key(key_event(KeyCode::Char('1')));

        assert!(!app.removing_favorite);
        assert_eq!(app.preferences.favorites, vec!["Paris"]);
        assert_eq!(saved_preferences(&temp_dir).favorites, vec!["Paris"]);
        assert!(!app.has_pending_search());
        assert_eq!(
            app.status,
            Some(StatusMessage::Info("Removed Parys from favorites".to_string()))
        );
    }

    #[test]
    fn test_x_works_on_welcome_screen() {
        let (mut app, temp_dir) = create_test_app();
        app.preferences.add_favorite("NYC");
        app.preferences.add_favorite("Lima");

        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Char('2')));

        assert_eq!(app.preferences.favorites, vec!["NYC"]);
        assert_eq!(saved_preferences(&temp_dir).favorites, vec!["NYC"]);
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn test_x_then_other_key_cancels() {
        let (mut app, _temp_dir) = create_test_app();
        app.preferences.add_favorite("Lima");

        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Esc));

        assert!(!app.removing_favorite);
        assert_eq!(app.preferences.favorites, vec!["Lima"]);
        assert!(app.status.is_none());

        // Number keys search again once removal is cancelled
        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.state, AppState::Loading("Lima".to_string()));
    }

    #[test]
    fn test_x_with_missing_number_keeps_list() {
        let (mut app, _temp_dir) = create_test_app();
        app.preferences.add_favorite("Lima");

        app.handle_key(key_event(KeyCode::Char('x')));
        app.handle_key(key_event(KeyCode::Char('4')));

        assert_eq!(app.preferences.favorites, vec!["Lima"]);
        assert_eq!(app.status, Some(StatusMessage::Info("No favorite #4".to_string())));
    }

    #[test]
    fn test_x_without_favorites_reports() {
        let (mut app, _temp_dir) = create_test_app();

        app.handle_key(key_event(KeyCode::Char('x')));

        assert!(!app.removing_favorite);
        assert_eq!(
            app.status,
            Some(StatusMessage::Info("No favorites to remove".to_string()))
        );
    }

    #[test]
    fn test_f_without_dashboard_does_nothing() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('f')));
        assert!(app.preferences.favorites.is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_d_sets_default_city_and_saves() {
        let (mut app, temp_dir) = app_with_dashboard();

        app.handle_key(key_event(KeyCode::Char('d')));

        assert_eq!(app.preferences.default_city(), Some("Paris"));
        assert_eq!(saved_preferences(&temp_dir).default_city(), Some("Paris"));
    }

    #[test]
    fn test_u_toggles_unit_and_saves() {
        let (mut app, temp_dir) = create_test_app();

        app.handle_key(key_event(KeyCode::Char('u')));

        assert_eq!(app.unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(saved_preferences(&temp_dir).temp_unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_u_toggles_from_override() {
        let (mut app, _temp_dir) = create_test_app();
        app.unit_override = Some(TemperatureUnit::Fahrenheit);

        app.handle_key(key_event(KeyCode::Char('u')));

        assert!(app.unit_override.is_none());
        assert_eq!(app.unit(), TemperatureUnit::Celsius);
    }

    #[test]
    fn test_number_key_searches_favorite() {
        let (mut app, _temp_dir) = create_test_app();
        app.preferences.add_favorite("Lima");
        app.preferences.add_favorite("Cairo");

        app.handle_key(key_event(KeyCode::Char('2')));

        assert_eq!(app.state, AppState::Loading("Cairo".to_string()));
        assert!(app.has_pending_search());
    }

    #[test]
    fn test_number_key_without_favorite_reports() {
        let (mut app, _temp_dir) = create_test_app();

        app.handle_key(key_event(KeyCode::Char('3')));

        assert!(!app.has_pending_search());
        assert_eq!(app.status, Some(StatusMessage::Info("No favorite #3".to_string())));
    }

    #[test]
    fn test_r_reruns_last_search() {
        let (mut app, _temp_dir) = app_with_dashboard();
        app.last_city = Some("Paris".to_string());

        app.handle_key(key_event(KeyCode::Char('r')));

        assert_eq!(app.state, AppState::Loading("Paris".to_string()));
    }

    #[test]
    fn test_r_without_previous_search_does_nothing() {
        let (mut app, _temp_dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn test_startup_city_wins_over_default() {
        let (mut app, _temp_dir) = create_test_app();
        app.preferences.set_default_city("Berlin");
        let config = StartupConfig {
            api_key: "key".to_string(),
            initial_city: Some("Madrid".to_string()),
            unit_override: Some(TemperatureUnit::Fahrenheit),
            prefs_path: None,
            log_file: None,
        };

        app.apply_startup_config(&config);

        assert_eq!(app.state, AppState::Loading("Madrid".to_string()));
        assert_eq!(app.unit(), TemperatureUnit::Fahrenheit);
        assert_eq!(app.preferences.temp_unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn test_startup_uses_default_city() {
        let (mut app, _temp_dir) = create_test_app();
        app.preferences.set_default_city("Berlin");
        let config = StartupConfig {
            api_key: "key".to_string(),
            initial_city: None,
            unit_override: None,
            prefs_path: None,
            log_file: None,
        };

        app.apply_startup_config(&config);

        assert_eq!(app.state, AppState::Loading("Berlin".to_string()));
    }

    #[test]
    fn test_startup_without_city_stays_on_welcome() {
        let (mut app, _temp_dir) = create_test_app();
        let config = StartupConfig {
            api_key: "key".to_string(),
            initial_city: None,
            unit_override: None,
            prefs_path: None,
            log_file: None,
        };

        app.apply_startup_config(&config);

        assert_eq!(app.state, AppState::Welcome);
        assert!(!app.has_pending_search());
    }

    #[test]
    fn test_malformed_preferences_fall_back_to_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let prefs_path = temp_dir.path().join("preferences.json");
        std::fs::write(&prefs_path, "not json").expect("Should write file");

        let app = App::new(unreachable_client(), Some(PreferencesStore::with_path(prefs_path)));

        assert_eq!(app.preferences, Preferences::default());
        assert!(app.status.as_ref().is_some_and(StatusMessage::is_error));
    }

    #[tokio::test]
    async fn test_successful_search_shows_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENT_BODY))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FORECAST_BODY))
            .mount(&server)
            .await;

        let client = WeatherClient::new("test-key")
            .expect("Failed to build client")
            .with_base_url(server.uri());
        let mut app = App::new(client, None);

        app.submit_search("Paris");
        app.run_pending_search().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.current_city(), Some("Paris"));
        assert!(app.last_refresh.is_some());
        assert!(app.status.is_none());
        assert!(!app.has_pending_search());
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_dashboard() {
        let (mut app, _temp_dir) = app_with_dashboard();

        app.submit_search("Atlantis");
        app.run_pending_search().await;

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.current_city(), Some("Paris"));
        assert!(app.status.as_ref().is_some_and(StatusMessage::is_error));
    }

    #[tokio::test]
    async fn test_failed_first_search_returns_to_welcome() {
        let (mut app, _temp_dir) = create_test_app();

        app.submit_search("Atlantis");
        app.run_pending_search().await;

        assert_eq!(app.state, AppState::Welcome);
        assert!(app.status.as_ref().is_some_and(StatusMessage::is_error));
    }

    #[test]
    fn test_tab_titles() {
        let titles: Vec<&str> = Tab::ALL.iter().map(|tab| tab.title()).collect();
        assert_eq!(titles, vec!["Overview", "Day/Night", "Charts", "Clouds"]);
    }
}
