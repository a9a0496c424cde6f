//! UI rendering module for wxdash
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Rendering only reads the
//! aggregates computed by the forecast module; no statistics are derived here.

pub mod charts;
pub mod clouds;
pub mod dashboard;
pub mod help_overlay;
pub mod welcome;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState, InputMode};
use crate::data::TemperatureUnit;

/// Color scheme shared by all screens
pub(crate) mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Missing values
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Key hints and the focused search bar
    pub const HIGHLIGHT: Color = Color::Yellow;
    /// Error messages
    pub const ERROR: Color = Color::Red;
    /// Informational messages
    pub const INFO: Color = Color::Green;
}

/// Text shown for an undefined average
pub const NO_DATA: &str = "no data";

/// Formats a Celsius temperature in the display unit, e.g. "21.4°C"
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.convert(celsius), unit.symbol())
}

/// Formats an optional temperature, falling back to "no data"
pub fn format_optional_temperature(celsius: Option<f64>, unit: TemperatureUnit) -> String {
    celsius
        .map(|value| format_temperature(value, unit))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Formats a temperature difference; no offset is applied when converting
pub fn format_temperature_delta(celsius_delta: Option<f64>, unit: TemperatureUnit) -> String {
    celsius_delta
        .map(|delta| format!("{:+.1}{}", unit.convert_delta(delta), unit.symbol()))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Renders the whole screen for the current application state
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_search_bar(frame, chunks[0], app);

    match &app.state {
        AppState::Welcome => welcome::render(frame, chunks[1], app),
        AppState::Loading(city) => render_loading(frame, chunks[1], city),
        AppState::Dashboard => match &app.dashboard {
            Some(dashboard) => dashboard::render(frame, chunks[1], app, dashboard),
            None => welcome::render(frame, chunks[1], app),
        },
    }

    render_status_line(frame, chunks[2], app);

    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Renders the search bar, highlighted while editing
fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;

    let content = if editing {
        Line::from(vec![
            Span::styled(app.search_input.clone(), Style::default().fg(colors::PRIMARY)),
            Span::styled("\u{2588}", Style::default().fg(colors::HIGHLIGHT)), // █ cursor
        ])
    } else {
        Line::from(Span::styled(
            "Press / to search for a city",
            Style::default().fg(colors::SECONDARY),
        ))
    };

    let mut title = vec![Span::styled(
        " wxdash ",
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(refreshed) = app.last_refresh {
        title.push(Span::styled(
            format!("Updated {} ", refreshed.format("%H:%M")),
            Style::default().fg(colors::SECONDARY),
        ));
    }

    let border_color = if editing {
        colors::HIGHLIGHT
    } else {
        colors::HEADER
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(title))
        .title_bottom(Line::from(format!(" {} ", app.unit().symbol())).right_aligned());

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders a loading message while a search runs
fn render_loading(frame: &mut Frame, area: Rect, city: &str) {
    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new(format!("Fetching weather for {}...", city))
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Renders the status message, or key hints when there is none
fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(status) => {
            let color = if status.is_error() {
                colors::ERROR
            } else {
                colors::INFO
            };
            Line::from(Span::styled(status.text().to_string(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "/ search  Tab view  f favorite  x unfavorite  d default  u unit  ? help  q quit",
            Style::default().fg(colors::UNKNOWN),
        )),
    };

    frame.render_widget(Paragraph::new(line), area);
}
