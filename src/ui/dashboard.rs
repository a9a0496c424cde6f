//! Dashboard screen UI
//!
//! Renders the tab bar and the Overview and Day/Night tabs. The Charts and
//! Clouds tabs live in their own modules.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use super::{
    charts, clouds, colors, format_optional_temperature, format_temperature,
    format_temperature_delta,
};
use crate::app::{App, Tab};
use crate::data::{CurrentWeather, TemperatureUnit};
use crate::forecast::{DayNightSummary, Period};
use crate::search::Dashboard;

/// Width of one date column in the day/night table
const COLUMN_WIDTH: usize = 10;

/// Width of the row label column in the day/night table
const LABEL_WIDTH: usize = 12;

/// Renders the dashboard for the last successful search
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `area` - Area below the search bar
/// * `app` - The application state
/// * `dashboard` - Current conditions and aggregated forecast
pub fn render(frame: &mut Frame, area: Rect, app: &App, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(app.tab.index())
        .style(Style::default().fg(colors::SECONDARY))
        .highlight_style(
            Style::default()
                .fg(colors::HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let unit = app.unit();
    let title = format!(
        " {}, {} ",
        dashboard.current.city, dashboard.current.country
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    match app.tab {
        Tab::Overview => render_overview(frame, inner, &dashboard.current, unit),
        Tab::DayNight => {
            let lines = build_day_night_lines(&dashboard.report.day_night, unit);
            frame.render_widget(Paragraph::new(lines), inner);
        }
        Tab::Charts => charts::render(frame, inner, &dashboard.report, unit),
        Tab::Clouds => clouds::render(frame, inner, &dashboard.report),
    }
}

/// Renders current conditions next to the location panel
fn render_overview(frame: &mut Frame, area: Rect, current: &CurrentWeather, unit: TemperatureUnit) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let conditions = Paragraph::new(build_conditions_lines(current, unit, Utc::now()))
        .wrap(Wrap { trim: false });
    frame.render_widget(conditions, columns[0]);

    let location = Paragraph::new(build_location_lines(current)).wrap(Wrap { trim: false });
    frame.render_widget(location, columns[1]);
}

/// Builds the lines for the current conditions section
///
/// # Arguments
/// * `current` - Current conditions
/// * `unit` - Display unit for temperatures
/// * `now` - Instant shown as "your time" and "city time"
fn build_conditions_lines(
    current: &CurrentWeather,
    unit: TemperatureUnit,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("CURRENT CONDITIONS")];

    lines.push(label_line(
        "Your time: ",
        now.with_timezone(&Local).format("%a %H:%M").to_string(),
    ));
    let city_time = match current.location_time(now) {
        Some(time) => format!("{} (UTC{})", time.format("%a %H:%M"), time.offset()),
        None => "unknown".to_string(),
    };
    lines.push(label_line("City time: ", city_time));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(
            format_temperature(current.temperature, unit),
            Style::default()
                .fg(temperature_color(current.temperature))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" (feels like {})", format_temperature(current.feels_like, unit)),
            Style::default().fg(colors::SECONDARY),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        current.title_description(),
        Style::default().fg(colors::PRIMARY),
    )));
    lines.push(label_line("Humidity: ", format!("{}%", current.humidity)));
    lines.push(label_line(
        "Wind: ",
        format!(
            "{:.1} m/s from {}° ({})",
            current.wind_speed,
            current.wind_direction,
            compass_point(current.wind_direction)
        ),
    ));
    lines.push(label_line("Pressure: ", format!("{} hPa", current.pressure)));

    let (sunrise, sunset) = match (
        current.location_time(current.sunrise),
        current.location_time(current.sunset),
    ) {
        (Some(rise), Some(set)) => (
            rise.format("%H:%M").to_string(),
            set.format("%H:%M").to_string(),
        ),
        _ => ("--:--".to_string(), "--:--".to_string()),
    };
    lines.push(Line::from(vec![
        Span::styled("Sunrise: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(sunrise, Style::default().fg(colors::PRIMARY)),
        Span::raw("  "),
        Span::styled("Sunset: ", Style::default().fg(colors::SECONDARY)),
        Span::styled(sunset, Style::default().fg(colors::PRIMARY)),
    ]));

    lines
}

/// Builds the lines for the location panel
fn build_location_lines(current: &CurrentWeather) -> Vec<Line<'static>> {
    let pin = current.map_pin();

    vec![
        section_header("LOCATION"),
        Line::from(Span::styled(pin.label.clone(), Style::default().fg(colors::PRIMARY))),
        label_line(
            "Coordinates: ",
            format!("{:.4}, {:.4}", pin.latitude, pin.longitude),
        ),
        Line::from(""),
        Line::from(Span::styled("Map:", Style::default().fg(colors::SECONDARY))),
        Line::from(Span::styled(pin.osm_url(), Style::default().fg(colors::HEADER))),
        Line::from(""),
        Line::from(Span::styled("Icon:", Style::default().fg(colors::SECONDARY))),
        Line::from(Span::styled(current.icon_url(), Style::default().fg(colors::HEADER))),
    ]
}

/// Builds the day/night table and the summary statistics
///
/// Dates are columns; Day, Night and Daily Average are rows.
fn build_day_night_lines(summary: &DayNightSummary, unit: TemperatureUnit) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("TEMPERATURE BY DAY AND PERIOD")];

    if summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "No forecast data",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    let dates = summary.dates();

    let mut header = format!("{:<width$}", "", width = LABEL_WIDTH);
    for date in &dates {
        header.push_str(&format!(
            "{:>width$}",
            date.format("%a %d").to_string(),
            width = COLUMN_WIDTH
        ));
    }
    lines.push(Line::from(Span::styled(
        header,
        Style::default()
            .fg(colors::SECONDARY)
            .add_modifier(Modifier::BOLD),
    )));

    for period in [Period::Day, Period::Night] {
        let cells = dates.iter().map(|date| {
            summary
                .get(*date, period)
                .map(|stats| stats.mean_temperature)
        });
        lines.push(table_row(period.label(), cells, unit));
    }
    lines.push(table_row(
        "Daily Avg",
        dates.iter().map(|date| summary.daily_average(*date)),
        unit,
    ));

    lines.push(Line::from(""));
    lines.push(section_header("HUMIDITY BY DAY AND PERIOD"));
    for period in [Period::Day, Period::Night] {
        let mut spans = vec![Span::styled(
            format!("{:<width$}", period.label(), width = LABEL_WIDTH),
            Style::default().fg(colors::SECONDARY),
        )];
        for date in &dates {
            let cell = summary
                .get(*date, period)
                .map(|stats| format!("{:.0}%", stats.mean_humidity))
                .unwrap_or_else(|| "-".to_string());
            spans.push(Span::styled(
                format!("{:>width$}", cell, width = COLUMN_WIDTH),
                Style::default().fg(colors::PRIMARY),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(section_header("SUMMARY"));
    lines.push(label_line(
        "Day average:   ",
        format_optional_temperature(summary.day_average(), unit),
    ));
    lines.push(label_line(
        "Night average: ",
        format_optional_temperature(summary.night_average(), unit),
    ));
    lines.push(label_line(
        "Difference:    ",
        format_temperature_delta(summary.difference(), unit),
    ));

    lines
}

/// One row of the temperature table; missing buckets show as "-"
fn table_row(
    label: &str,
    cells: impl Iterator<Item = Option<f64>>,
    unit: TemperatureUnit,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<width$}", label, width = LABEL_WIDTH),
        Style::default().fg(colors::SECONDARY),
    )];

    for cell in cells {
        let span = match cell {
            Some(celsius) => Span::styled(
                format!("{:>width$}", format_temperature(celsius, unit), width = COLUMN_WIDTH),
                Style::default().fg(temperature_color(celsius)),
            ),
            None => Span::styled(
                format!("{:>width$}", "-", width = COLUMN_WIDTH),
                Style::default().fg(colors::UNKNOWN),
            ),
        };
        spans.push(span);
    }

    Line::from(spans)
}

fn section_header(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))
}

fn label_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(colors::SECONDARY)),
        Span::styled(value, Style::default().fg(colors::PRIMARY)),
    ])
}

/// Returns the color for a Celsius temperature
pub(crate) fn temperature_color(celsius: f64) -> Color {
    if celsius >= 30.0 {
        Color::Red
    } else if celsius >= 25.0 {
        Color::LightRed
    } else if celsius >= 20.0 {
        Color::Yellow
    } else if celsius >= 15.0 {
        Color::Green
    } else if celsius >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// 16-point compass name for a wind bearing in degrees
fn compass_point(degrees: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = ((f64::from(degrees % 360) / 22.5).round() as usize) % POINTS.len();
    POINTS[index]
}
