//! Header overlaid on the top of the calendar: current month and weekdays

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::grid;
use crate::services::settings::{CellMetrics, LayoutMetrics};
use crate::tui::theme::Theme;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Rows the header covers, rounded up so it hides the padding band entirely
pub fn header_rows(metrics: &LayoutMetrics, cell: CellMetrics) -> u16 {
    (metrics.viewport_padding_top / cell.height).ceil().max(0.0) as u16
}

pub struct Header<'a> {
    label: &'a str,
    metrics: &'a LayoutMetrics,
    cell: CellMetrics,
    theme: Theme,
}

impl<'a> Header<'a> {
    pub fn new(label: &'a str, metrics: &'a LayoutMetrics, cell: CellMetrics, theme: Theme) -> Self {
        Self {
            label,
            metrics,
            cell,
            theme,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = header_rows(self.metrics, self.cell).min(area.height);
        if rows == 0 {
            return;
        }
        let band = Rect::new(area.x, area.y, area.width, rows);
        let background = self.theme.color(self.theme.background(), None);
        for y in band.top()..band.bottom() {
            for x in band.left()..band.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_bg(background);
                }
            }
        }

        // Current month, centered on the first line below the top edge
        let label_row = band.y + (rows / 2).saturating_sub(1).min(rows - 1);
        let x = band.x + band.width.saturating_sub(self.label.chars().count() as u16) / 2;
        buf.set_string(
            x,
            label_row,
            self.label,
            Style::default()
                .fg(self.theme.accent())
                .bg(background)
                .add_modifier(Modifier::BOLD),
        );

        // Weekday labels over their columns on the last header row
        let width_px = f64::from(area.width) * self.cell.width;
        let m = self.metrics;
        let day_width = grid::day_width(width_px, m.padding_x, m.day_gap_x, grid::DAYS_PER_WEEK);
        let row = band.bottom() - 1;
        for (column, name) in WEEKDAY_LABELS.iter().enumerate() {
            let center_px =
                m.padding_x + column as f64 * (day_width + m.day_gap_x) + day_width / 2.0;
            let start = (center_px / self.cell.width - name.len() as f64 / 2.0).round();
            if start < 0.0 || start + name.len() as f64 > f64::from(area.width) {
                continue;
            }
            buf.set_string(
                area.x + start as u16,
                row,
                name,
                Style::default().fg(self.theme.muted()).bg(background),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_header_rows_round_up() {
        let m = LayoutMetrics::default();
        assert_eq!(header_rows(&m, CellMetrics::default()), 5);
    }

    #[test]
    fn test_renders_label_and_weekdays() {
        let m = LayoutMetrics::default();
        let area = Rect::new(0, 0, 56, 20);
        let mut buf = Buffer::empty(area);
        Header::new("Mar, 2024", &m, CellMetrics::default(), Theme::Dark).render(area, &mut buf);

        let all: String = (0..5).map(|y| row_text(&buf, y)).collect();
        assert!(all.contains("Mar, 2024"));
        let weekdays = row_text(&buf, 4);
        for name in WEEKDAY_LABELS {
            assert!(weekdays.contains(name), "missing {name}");
        }
        let sun = weekdays.find("Sun").unwrap();
        let sat = weekdays.find("Sat").unwrap();
        assert!(sun < sat);
        // below the header nothing is touched
        assert_eq!(row_text(&buf, 5).trim(), "");
    }

    #[test]
    fn test_narrow_terminal_skips_clipped_labels() {
        let m = LayoutMetrics::default();
        let area = Rect::new(0, 0, 10, 6);
        let mut buf = Buffer::empty(area);
        Header::new("Mar, 2024", &m, CellMetrics::default(), Theme::Light).render(area, &mut buf);
        assert!(row_text(&buf, 1).contains("Mar, 2024"));
    }
}
