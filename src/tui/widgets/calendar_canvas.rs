//! Rasterizes the calendar scene onto terminal cells
//!
//! Scene coordinates are pixels; one cell covers `cell.width` x
//! `cell.height` pixels. Shapes are sampled at cell centers, lines become
//! box-drawing runs and text is laid out one glyph per cell.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::calendar::hover::HoverTarget;
use crate::calendar::palette::{ColorRole, Rgba};
use crate::calendar::scene::{FontWeight, LineNode, RectNode, Scene, Shape, TextNode};
use crate::services::settings::CellMetrics;
use crate::tui::theme::Theme;
use crate::types::{Bounds, Point, Size};

/// Pixel size of a cell area
pub fn viewport_size(area: Rect, cell: CellMetrics) -> Size {
    Size::new(
        f64::from(area.width) * cell.width,
        f64::from(area.height) * cell.height,
    )
}

/// Pixel position of the center of cell (`column`, `row`) relative to `area`
pub fn cell_center(area: Rect, column: u16, row: u16, cell: CellMetrics) -> Point {
    Point::new(
        (f64::from(column.saturating_sub(area.x)) + 0.5) * cell.width,
        (f64::from(row.saturating_sub(area.y)) + 0.5) * cell.height,
    )
}

/// Cells overlapped by the pixel span `[from, to)`, clipped to `0..limit`
fn cell_span(from: f64, to: f64, size: f64, limit: u16) -> (u16, u16) {
    let limit = f64::from(limit);
    let lo = (from / size).floor().clamp(0.0, limit);
    let hi = (to / size).ceil().clamp(lo, limit);
    (lo as u16, hi as u16)
}

/// Whether `p` falls inside a rounded rectangle
fn rounded_contains(bounds: Bounds, radius: f64, p: Point) -> bool {
    if !bounds.contains(p) {
        return false;
    }
    let r = radius.min(bounds.width / 2.0).min(bounds.height / 2.0).max(0.0);
    let cx = p.x.clamp(bounds.x + r, bounds.right() - r);
    let cy = p.y.clamp(bounds.y + r, bounds.bottom() - r);
    let (dx, dy) = (p.x - cx, p.y - cy);
    dx * dx + dy * dy <= r * r
}

pub struct CalendarCanvas<'a> {
    scene: &'a Scene,
    hover: Option<&'a HoverTarget>,
    cell: CellMetrics,
    theme: Theme,
}

impl<'a> CalendarCanvas<'a> {
    pub fn new(scene: &'a Scene, cell: CellMetrics, theme: Theme) -> Self {
        Self {
            scene,
            hover: None,
            cell,
            theme,
        }
    }

    pub fn with_hover(mut self, hover: Option<&'a HoverTarget>) -> Self {
        self.hover = hover;
        self
    }

    fn fill_rounded(&self, area: Rect, buf: &mut Buffer, rect: &RectNode, fill: Rgba) {
        let b = rect.bounds;
        let (c0, c1) = cell_span(b.x, b.right(), self.cell.width, area.width);
        let (r0, r1) = cell_span(b.y, b.bottom(), self.cell.height, area.height);
        let background = self.theme.background();
        for row in r0..r1 {
            for col in c0..c1 {
                let x = area.x + col;
                let y = area.y + row;
                if !rounded_contains(b, rect.corner_radius, cell_center(area, x, y, self.cell)) {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(self.theme.color(fill, Some(background)));
                }
            }
        }
    }

    fn draw_line(&self, area: Rect, buf: &mut Buffer, line: &LineNode) {
        let row_px = (line.from.y / self.cell.height).floor();
        if row_px < 0.0 || row_px >= f64::from(area.height) {
            return;
        }
        let y = area.y + row_px as u16;
        let (c0, c1) = cell_span(
            line.from.x.min(line.to.x),
            line.from.x.max(line.to.x),
            self.cell.width,
            area.width,
        );
        let fg = self.theme.color(line.stroke, None);
        for col in c0..c1 {
            if let Some(cell) = buf.cell_mut((area.x + col, y)) {
                if cell.symbol() == " " {
                    cell.set_symbol("─").set_fg(fg);
                }
            }
        }
    }

    fn draw_text(&self, area: Rect, buf: &mut Buffer, text: &TextNode) {
        let row = (text.center.y / self.cell.height).floor();
        if row < 0.0 || row >= f64::from(area.height) {
            return;
        }
        let glyphs = text.text.chars().count() as f64;
        let first = (text.center.x / self.cell.width - glyphs / 2.0).round();
        let mut style = Style::default().fg(self.theme.color(text.fill, None));
        if text.weight == FontWeight::Bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        for (i, ch) in text.text.chars().enumerate() {
            let col = first + i as f64;
            if col < 0.0 || col >= f64::from(area.width) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + col as u16, area.y + row as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}

impl Widget for CalendarCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = self.theme.color(self.theme.background(), None);
        buf.set_style(area, Style::default().bg(background));
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                }
            }
        }

        if let Some(hover) = self.hover {
            let rect = RectNode {
                bounds: hover.bounds,
                corner_radius: hover.corner_radius,
                fill: None,
            };
            self.fill_rounded(area, buf, &rect, ColorRole::Hover.resolve(self.theme.is_dark()));
        }

        for node in self.scene.nodes() {
            match &node.shape {
                Shape::Rect(rect) => {
                    if let Some(fill) = rect.fill {
                        self.fill_rounded(area, buf, rect, fill);
                    }
                }
                Shape::Line(line) => self.draw_line(area, buf, line),
                Shape::Text(text) => self.draw_text(area, buf, text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> CellMetrics {
        CellMetrics {
            width: 8.0,
            height: 16.0,
        }
    }

    fn render(scene: &Scene, hover: Option<&HoverTarget>) -> Buffer {
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        CalendarCanvas::new(scene, cell(), Theme::Light)
            .with_hover(hover)
            .render(area, &mut buf);
        buf
    }

    #[test]
    fn test_viewport_size_in_pixels() {
        assert_eq!(viewport_size(Rect::new(0, 0, 50, 40), cell()), Size::new(400.0, 640.0));
    }

    #[test]
    fn test_cell_center() {
        let p = cell_center(Rect::new(2, 1, 10, 10), 3, 2, cell());
        assert_eq!(p, Point::new(12.0, 24.0));
    }

    #[test]
    fn test_text_centered_on_cells() {
        let mut scene = Scene::new();
        scene.add(Shape::Text(TextNode {
            center: Point::new(80.0, 24.0),
            text: "15".into(),
            font_size: 14.0,
            weight: FontWeight::Bold,
            fill: Rgba::BLACK,
        }));
        let buf = render(&scene, None);
        assert_eq!(buf[(9, 1)].symbol(), "1");
        assert_eq!(buf[(10, 1)].symbol(), "5");
        assert!(buf[(9, 1)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_line_becomes_box_drawing_run() {
        let mut scene = Scene::new();
        scene.add(Shape::Line(LineNode {
            from: Point::new(16.0, 40.0),
            to: Point::new(64.0, 40.0),
            stroke: Rgba::rgba(100, 100, 100, 0.2),
            width: 0.5,
        }));
        let buf = render(&scene, None);
        assert_eq!(buf[(1, 2)].symbol(), " ");
        assert_eq!(buf[(2, 2)].symbol(), "─");
        assert_eq!(buf[(7, 2)].symbol(), "─");
        assert_eq!(buf[(8, 2)].symbol(), " ");
    }

    #[test]
    fn test_filled_rect_sets_background() {
        let mut scene = Scene::new();
        scene.add(Shape::Rect(RectNode {
            bounds: Bounds::new(0.0, 0.0, 40.0, 40.0),
            corner_radius: 0.0,
            fill: Some(Rgba::rgb(0xee, 0x33, 0x33)),
        }));
        let buf = render(&scene, None);
        assert_eq!(buf[(0, 0)].bg, ratatui::style::Color::Rgb(0xee, 0x33, 0x33));
        assert_ne!(buf[(6, 0)].bg, ratatui::style::Color::Rgb(0xee, 0x33, 0x33));
    }

    #[test]
    fn test_hover_tints_cells() {
        let scene = Scene::new();
        let hover = HoverTarget {
            day: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            bounds: Bounds::new(0.0, 0.0, 40.0, 32.0),
            corner_radius: 8.0,
        };
        let plain = render(&scene, None);
        let hovered = render(&scene, Some(&hover));
        assert_ne!(plain[(2, 1)].bg, hovered[(2, 1)].bg);
        assert_eq!(plain[(10, 4)].bg, hovered[(10, 4)].bg);
    }

    #[test]
    fn test_rounded_corners_excluded() {
        let b = Bounds::new(0.0, 0.0, 40.0, 40.0);
        assert!(rounded_contains(b, 20.0, Point::new(20.0, 20.0)));
        assert!(!rounded_contains(b, 20.0, Point::new(2.0, 2.0)));
        assert!(rounded_contains(b, 0.0, Point::new(2.0, 2.0)));
    }
}
