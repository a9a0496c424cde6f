//! Clouds tab UI
//!
//! Renders the mean coverage with its band, and a heatmap grid of dates (rows)
//! against hours of the day (columns) with the coverage in each cell.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{colors, NO_DATA};
use crate::forecast::{CloudBand, CloudPivot, CloudSummary, ForecastReport};

/// Width of one hour column, e.g. " 75 "
const CELL_WIDTH: usize = 5;

/// Width of the date column, e.g. "Mon 15 "
const DATE_WIDTH: usize = 8;

/// Returns the cell colors for a coverage percentage, light to dark blue
fn coverage_colors(coverage: f64) -> (Color, Color) {
    let background = match coverage.round() as u32 {
        0..=19 => Color::Rgb(222, 235, 247),
        20..=39 => Color::Rgb(158, 202, 225),
        40..=59 => Color::Rgb(107, 174, 214),
        60..=79 => Color::Rgb(49, 130, 189),
        _ => Color::Rgb(8, 81, 156),
    };
    // Dark text on the light shades
    let foreground = if coverage < 40.0 {
        Color::Black
    } else {
        Color::White
    };
    (foreground, background)
}

fn band_color(band: CloudBand) -> Color {
    match band {
        CloudBand::Low => Color::Yellow,
        CloudBand::Moderate => Color::LightBlue,
        CloudBand::High => Color::Gray,
    }
}

/// Renders the clouds tab
pub fn render(frame: &mut Frame, area: Rect, report: &ForecastReport) {
    let mut lines = build_summary_lines(report.clouds.as_ref());
    lines.push(Line::from(""));
    lines.extend(build_heatmap_lines(&report.cloud_pivot));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds the mean coverage and outlook lines
fn build_summary_lines(summary: Option<&CloudSummary>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "CLOUD COVERAGE",
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))];

    match summary {
        Some(summary) => {
            lines.push(Line::from(vec![
                Span::styled("Mean: ", Style::default().fg(colors::SECONDARY)),
                Span::styled(
                    format!("{:.0}%", summary.mean_coverage),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    summary.band.label(),
                    Style::default().fg(band_color(summary.band)),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                summary.band.outlook(),
                Style::default().fg(colors::PRIMARY),
            )));
        }
        None => {
            lines.push(Line::from(vec![
                Span::styled("Mean: ", Style::default().fg(colors::SECONDARY)),
                Span::styled(NO_DATA, Style::default().fg(colors::UNKNOWN)),
            ]));
        }
    }

    lines
}

/// Builds the heatmap grid; hours without a value show as a dot
fn build_heatmap_lines(pivot: &CloudPivot) -> Vec<Line<'static>> {
    if pivot.is_empty() {
        return vec![Line::from(Span::styled(
            "No forecast data",
            Style::default().fg(colors::UNKNOWN),
        ))];
    }

    let hours = pivot.hours();

    let mut header = " ".repeat(DATE_WIDTH);
    for hour in &hours {
        header.push_str(&format!("{:^width$}", format!("{:02}h", hour), width = CELL_WIDTH));
    }
    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default().fg(colors::SECONDARY),
    ))];

    for date in pivot.dates() {
        let mut spans = vec![Span::styled(
            format!("{:<width$}", date.format("%a %d").to_string(), width = DATE_WIDTH),
            Style::default().fg(colors::SECONDARY),
        )];

        for hour in &hours {
            let span = match pivot.get(date, *hour) {
                Some(coverage) => {
                    let (foreground, background) = coverage_colors(coverage);
                    Span::styled(
                        format!("{:^width$}", format!("{:.0}", coverage), width = CELL_WIDTH),
                        Style::default().fg(foreground).bg(background),
                    )
                }
                None => Span::styled(
                    format!("{:^width$}", "\u{00B7}", width = CELL_WIDTH), // ·
                    Style::default().fg(colors::UNKNOWN),
                ),
            };
            spans.push(span);
        }

        lines.push(Line::from(spans));
    }

    lines
}
