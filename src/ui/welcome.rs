//! Welcome screen shown until the first successful search

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::colors;
use crate::app::App;
use crate::prefs::Preferences;

/// Renders the welcome screen
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(" Welcome ");

    let paragraph = Paragraph::new(build_welcome_lines(&app.preferences))
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Builds the welcome text, listing favorites with their shortcut keys
fn build_welcome_lines(preferences: &Preferences) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Weather dashboard",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Search for a city to see current conditions, a day/night breakdown,",
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(Span::styled(
            "7-day charts and a cloud coverage heatmap.",
            Style::default().fg(colors::PRIMARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("/", Style::default().fg(colors::HIGHLIGHT)),
            Span::raw(" to type a city name, then "),
            Span::styled("Enter", Style::default().fg(colors::HIGHLIGHT)),
            Span::raw("."),
        ]),
        Line::from(""),
    ];

    if let Some(city) = preferences.default_city() {
        lines.push(Line::from(vec![
            Span::styled("Default city: ", Style::default().fg(colors::SECONDARY)),
            Span::styled(city.to_string(), Style::default().fg(colors::PRIMARY)),
        ]));
        lines.push(Line::from(""));
    }

    if preferences.favorites.is_empty() {
        lines.push(Line::from(Span::styled(
            "No favorites yet. Press f on a dashboard to add one.",
            Style::default().fg(colors::UNKNOWN),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "FAVORITES",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )));
        // Only the first nine have number keys
        for (i, city) in preferences.favorites.iter().take(9).enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", i + 1), Style::default().fg(colors::HIGHLIGHT)),
                Span::raw(city.clone()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("x", Style::default().fg(colors::HIGHLIGHT)),
            Span::raw(" then a number to remove a favorite."),
        ]));
    }

    lines
}
