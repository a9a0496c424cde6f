//! Charts tab UI
//!
//! Draws temperature against feels-like as a box-drawing line chart, with
//! humidity and wind speed sparklines underneath. All three cover the same
//! seven-day window.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::colors;
use super::widgets::SeriesSparkline;
use crate::data::{ForecastSample, TemperatureUnit};
use crate::forecast::ForecastReport;

/// Rows in the line chart
const CHART_ROWS: usize = 9;

/// Width reserved for the y-axis labels, e.g. " 21.4 ┤"
const Y_AXIS_WIDTH: usize = 7;

/// Narrowest plot area
const MIN_CHART_WIDTH: usize = 20;

/// Temperature series color
const TEMPERATURE_COLOR: Color = Color::LightRed;

/// Feels-like series color
const FEELS_LIKE_COLOR: Color = Color::Cyan;

/// Humidity sparkline color
const HUMIDITY_COLOR: Color = Color::Blue;

/// Wind sparkline color
const WIND_COLOR: Color = Color::Green;

/// Renders the charts tab
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `area` - Area inside the dashboard border
/// * `report` - Aggregated forecast; only its chart window is drawn
/// * `unit` - Display unit for temperatures
pub fn render(frame: &mut Frame, area: Rect, report: &ForecastReport, unit: TemperatureUnit) {
    let samples = report.chart_samples();
    let (start, end) = report.chart_range();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                     // Window
            Constraint::Length(CHART_ROWS as u16 + 4), // Line chart
            Constraint::Length(1),                     // Humidity label
            Constraint::Length(1),                     // Humidity sparkline
            Constraint::Length(1),                     // Wind label
            Constraint::Length(1),                     // Wind sparkline
            Constraint::Min(0),
        ])
        .split(area);

    let window_line = Line::from(Span::styled(
        format!(
            "{} to {} (UTC)",
            start.format("%a %d %b %H:%M"),
            end.format("%a %d %b %H:%M")
        ),
        Style::default().fg(colors::SECONDARY),
    ));
    frame.render_widget(Paragraph::new(window_line), chunks[0]);

    let chart = build_temperature_chart(samples, unit, area.width as usize);
    frame.render_widget(Paragraph::new(chart), chunks[1]);

    if samples.is_empty() {
        return;
    }

    let width = (area.width as usize).saturating_sub(Y_AXIS_WIDTH).max(1);
    let indent = Rect {
        x: chunks[3].x + Y_AXIS_WIDTH as u16,
        width: chunks[3].width.saturating_sub(Y_AXIS_WIDTH as u16),
        ..chunks[3]
    };

    let humidity: Vec<f64> = samples.iter().map(|s| f64::from(s.humidity)).collect();
    let humidity = interpolate_values(&humidity, width);
    frame.render_widget(
        Paragraph::new(series_label("Humidity", &humidity_range(samples))),
        chunks[2],
    );
    frame.render_widget(
        SeriesSparkline::new(&humidity, 0.0, 100.0).style(Style::default().fg(HUMIDITY_COLOR)),
        indent,
    );

    let wind: Vec<f64> = samples.iter().map(|s| s.wind_speed).collect();
    let max_wind = wind.iter().copied().fold(0.0_f64, f64::max);
    let wind = interpolate_values(&wind, width);
    let mut wind_sparkline =
        SeriesSparkline::new(&wind, 0.0, max_wind).style(Style::default().fg(WIND_COLOR));
    if let Some(peak) = peak_index(&wind) {
        wind_sparkline = wind_sparkline.marker(peak);
    }
    frame.render_widget(
        Paragraph::new(series_label("Wind", &format!("up to {:.1} m/s", max_wind))),
        chunks[4],
    );
    frame.render_widget(wind_sparkline, Rect { y: chunks[5].y, ..indent });
}

/// Builds the temperature vs. feels-like chart with y-axis labels, both
/// curves, and date markers along the x-axis.
///
/// Where the curves overlap the temperature curve is drawn on top.
fn build_temperature_chart(
    samples: &[ForecastSample],
    unit: TemperatureUnit,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("TEMPERATURE ({})  ", unit.symbol()),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("── temperature", Style::default().fg(TEMPERATURE_COLOR)),
        Span::raw("  "),
        Span::styled("── feels like", Style::default().fg(FEELS_LIKE_COLOR)),
    ])];

    if samples.is_empty() {
        lines.push(Line::from(Span::styled(
            "No forecast data in the next 7 days",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    let temperatures: Vec<f64> = samples.iter().map(|s| unit.convert(s.temperature)).collect();
    let feels_like: Vec<f64> = samples.iter().map(|s| unit.convert(s.feels_like)).collect();
    let (min, max) = value_range(temperatures.iter().chain(feels_like.iter()).copied());

    let chart_width = width.saturating_sub(Y_AXIS_WIDTH).max(MIN_CHART_WIDTH);
    let temperature_rows = to_rows(&interpolate_values(&temperatures, chart_width), min, max);
    let feels_like_rows = to_rows(&interpolate_values(&feels_like, chart_width), min, max);

    for row in 0..CHART_ROWS {
        // Label the top, middle and bottom rows
        let label = if row == 0 {
            format!("{:>5.1}", max)
        } else if row == CHART_ROWS - 1 {
            format!("{:>5.1}", min)
        } else if row == CHART_ROWS / 2 {
            format!("{:>5.1}", (min + max) / 2.0)
        } else {
            " ".repeat(5)
        };

        let mut spans = vec![Span::styled(
            format!("{} \u{2524}", label), // ┤
            Style::default().fg(colors::SECONDARY),
        )];

        let mut run = String::new();
        let mut run_color = colors::PRIMARY;
        for col in 0..chart_width {
            let (ch, color) = match curve_character(row, col, &temperature_rows) {
                ' ' => (curve_character(row, col, &feels_like_rows), FEELS_LIKE_COLOR),
                ch => (ch, TEMPERATURE_COLOR),
            };
            if color != run_color && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(run_color)));
            }
            run_color = color;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, Style::default().fg(run_color)));
        }

        lines.push(Line::from(spans));
    }

    // X-axis bottom border
    lines.push(Line::from(Span::styled(
        format!("{}\u{2514}{}", " ".repeat(Y_AXIS_WIDTH - 1), "\u{2500}".repeat(chart_width)),
        Style::default().fg(colors::SECONDARY),
    )));

    let dates: Vec<NaiveDate> = samples.iter().map(|s| s.timestamp.date()).collect();
    lines.push(Line::from(Span::styled(
        format!("{}{}", " ".repeat(Y_AXIS_WIDTH), build_date_labels(&dates, chart_width)),
        Style::default().fg(colors::SECONDARY),
    )));

    lines
}

/// Lowest and highest value, padded so a flat series still has a range
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < 1.0 {
        let mid = (min + max) / 2.0;
        return (mid - 0.5, mid + 0.5);
    }
    (min, max)
}

/// Maps values onto chart rows; row 0 is the top (highest value)
fn to_rows(values: &[f64], min: f64, max: f64) -> Vec<usize> {
    values
        .iter()
        .map(|value| {
            let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
            let row = ((1.0 - normalized) * (CHART_ROWS - 1) as f64).round() as usize;
            row.min(CHART_ROWS - 1)
        })
        .collect()
}

/// Character drawn at (`row`, `col`) for a step curve through `rows`.
///
/// Each column holds the curve at its own row. A change of row between
/// neighbouring columns is drawn as a vertical segment in the later column.
fn curve_character(row: usize, col: usize, rows: &[usize]) -> char {
    let Some(&current) = rows.get(col) else {
        return ' ';
    };
    let previous = if col == 0 { current } else { rows[col - 1] };

    if previous == current {
        return if row == current { '\u{2500}' } else { ' ' }; // ─
    }

    let (top, bottom) = (previous.min(current), previous.max(current));
    if row < top || row > bottom {
        return ' ';
    }

    let rising = current < previous;
    match (row == previous, row == current) {
        (true, _) if rising => '\u{256F}',  // ╯
        (true, _) => '\u{256E}',            // ╮
        (_, true) if rising => '\u{256D}',  // ╭
        (_, true) => '\u{2570}',            // ╰
        _ => '\u{2502}',                    // │
    }
}

/// Places a short day label at the first column of each date
fn build_date_labels(dates: &[NaiveDate], width: usize) -> String {
    if dates.is_empty() || width == 0 {
        return String::new();
    }
    let mut result = vec![' '; width];

    let last = dates.len().saturating_sub(1).max(1);
    let mut next_free = 0;
    for (i, date) in dates.iter().enumerate() {
        if i > 0 && dates[i - 1] == *date {
            continue;
        }
        let col = (i * (width - 1)) / last;
        let label: Vec<char> = date.format("%a %d").to_string().chars().collect();
        // Skip labels that would overlap the previous one or run off the end
        if col < next_free || col + label.len() > width {
            continue;
        }
        for (offset, ch) in label.iter().enumerate() {
            result[col + offset] = *ch;
        }
        next_free = col + label.len() + 1;
    }

    result.iter().collect::<String>().trim_end().to_string()
}

/// Resamples values to `target_width` points by linear interpolation
fn interpolate_values(values: &[f64], target_width: usize) -> Vec<f64> {
    if target_width == 0 {
        return Vec::new();
    }
    if values.is_empty() {
        return vec![0.0; target_width];
    }
    if values.len() == 1 {
        return vec![values[0]; target_width];
    }
    if target_width <= values.len() {
        // Downsample by picking evenly spaced points
        return (0..target_width)
            .map(|i| values[i * (values.len() - 1) / (target_width - 1).max(1)])
            .collect();
    }

    let source_len = values.len();
    (0..target_width)
        .map(|i| {
            let source_pos = (i as f64 * (source_len - 1) as f64) / (target_width - 1) as f64;
            let lower = source_pos.floor() as usize;
            let upper = (lower + 1).min(source_len - 1);
            let fraction = source_pos - lower as f64;
            values[lower] * (1.0 - fraction) + values[upper] * fraction
        })
        .collect()
}

/// Index of the largest value, if any
fn peak_index(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

fn humidity_range(samples: &[ForecastSample]) -> String {
    let low = samples.iter().map(|s| s.humidity).min().unwrap_or(0);
    let high = samples.iter().map(|s| s.humidity).max().unwrap_or(0);
    format!("{}% to {}%", low, high)
}

fn series_label(name: &'static str, detail: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", name.to_uppercase(), width = Y_AXIS_WIDTH + 2),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(detail.to_string(), Style::default().fg(colors::SECONDARY)),
    ])
}
