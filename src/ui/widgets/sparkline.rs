//! Sparkline widget for one forecast series

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for the value levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A single-row sparkline of values scaled between a floor and a ceiling
pub struct SeriesSparkline<'a> {
    /// One value per column
    values: &'a [f64],
    /// Value drawn as the lowest block
    floor: f64,
    /// Value drawn as the full block
    ceiling: f64,
    /// Column to highlight, e.g. the peak
    marker: Option<usize>,
    /// Style for the sparkline
    style: Style,
    /// Style for the marker
    marker_style: Style,
}

impl<'a> SeriesSparkline<'a> {
    pub fn new(values: &'a [f64], floor: f64, ceiling: f64) -> Self {
        Self {
            values,
            floor,
            ceiling,
            marker: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn marker(mut self, index: usize) -> Self {
        self.marker = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        let span = self.ceiling - self.floor;
        if span <= 0.0 {
            return BLOCKS[0];
        }
        let normalized = ((value - self.floor) / span).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for SeriesSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, value) in self.values.iter().take(width).enumerate() {
            let block = self.value_to_block(*value);
            let x = area.x + i as u16;
            let y = area.y;

            let style = if self.marker == Some(i) {
                self.marker_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
