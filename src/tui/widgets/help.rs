//! Help popup listing keyboard and mouse controls

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 44;
const POPUP_HEIGHT: u16 = 18;

/// Column the description starts at, relative to the key
const KEY_COLUMN: usize = 16;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: [Section; 2] = [
    (
        "Scrolling",
        &[
            ("Up/Down or j/k", "Scroll one step"),
            ("PgUp / PgDn", "Scroll one screen"),
            ("Mouse wheel", "Scroll"),
            ("Left drag", "Pan, release to fling"),
            ("t", "Jump to today"),
        ],
    ),
    ("General", &[("q / Esc", "Quit"), ("?", "Toggle help")]),
];

pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Popup rect centered in `area`, clamped to fit
    pub fn centered_area(area: Rect) -> Rect {
        let width = POPUP_WIDTH.min(area.width);
        let height = POPUP_HEIGHT.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.heading())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted());
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.text());

        let mut lines = Vec::new();
        for (title, bindings) in SECTIONS {
            lines.push(Line::default());
            lines.push(Line::styled(title, heading));
            lines.push(Line::styled("─".repeat(usize::from(width)), muted));
            lines.extend(bindings.iter().map(|(k, d)| {
                Line::from(vec![
                    Span::styled(format!("  {:<width$}", k, width = KEY_COLUMN), key),
                    Span::styled(*d, desc),
                ])
            }));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Press ? to close", muted).alignment(Alignment::Center));
        lines
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" calscroll v{} ", VERSION))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner.width)).render(inner, buf);
    }
}
