//! Draws the visible months into the scene

use chrono::NaiveDate;

use crate::calendar::palette::ColorRole;
use crate::calendar::scene::{FontWeight, LineNode, RectNode, Scene, Shape, TextNode};
use crate::services::grid;
use crate::services::layout_cache::MonthLayoutCache;
use crate::services::settings::LayoutMetrics;
use crate::services::virtual_range::{VirtualRangeResolver, VisibleRange};
use crate::types::{Bounds, Month, Point, Size};

/// Per-draw inputs that are not layout metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawContext {
    pub viewport: Size,
    pub dark: bool,
    pub today: NaiveDate,
}

/// What one draw produced
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOutcome {
    pub range: VisibleRange,
    /// First day of the month the header shows
    pub displayed_month: Option<NaiveDate>,
    /// Header text, e.g. `Mar, 2024`
    pub label: String,
    pub months_drawn: usize,
    pub days_drawn: usize,
}

/// Header text for a month
pub fn current_month_label(month: NaiveDate) -> String {
    month.format("%b, %Y").to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct CanvasRenderer {
    metrics: LayoutMetrics,
    resolver: VirtualRangeResolver,
}

impl CanvasRenderer {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            resolver: VirtualRangeResolver::from_metrics(&metrics),
        }
    }

    /// Clear the scene and rebuild it for `scroll_offset`
    pub fn draw(
        &self,
        scene: &mut Scene,
        cache: &mut MonthLayoutCache,
        scroll_offset: f64,
        ctx: &DrawContext,
    ) -> DrawOutcome {
        scene.destroy_children();
        let range = self.resolver.resolve(cache, scroll_offset, ctx.viewport.height);
        let m = &self.metrics;
        let day_width = grid::day_width(ctx.viewport.width, m.padding_x, m.day_gap_x, grid::DAYS_PER_WEEK);

        let mut months_drawn = 0;
        let mut days_drawn = 0;
        for placement in &range.placements {
            if !placement.intersects(ctx.viewport.height) {
                continue;
            }
            let Some(month) = cache.months().get(placement.index) else {
                continue;
            };
            days_drawn += self.draw_month(scene, month, placement.top, day_width, ctx);
            months_drawn += 1;
        }

        let displayed_month = cache
            .months()
            .get(range.displayed_index())
            .map(|month| month.first);
        let label = displayed_month.map(current_month_label).unwrap_or_default();

        scene.batch_draw();
        DrawOutcome {
            range,
            displayed_month,
            label,
            months_drawn,
            days_drawn,
        }
    }

    /// Emit one month block whose top edge sits at `top`; returns days drawn
    fn draw_month(
        &self,
        scene: &mut Scene,
        month: &Month,
        top: f64,
        day_width: f64,
        ctx: &DrawContext,
    ) -> usize {
        let m = &self.metrics;
        let width = ctx.viewport.width;
        let rows_top = top + m.month_label_height;

        // Label over the column of the first day
        let first_column = f64::from(grid::weekday_index(month.first));
        scene.add(Shape::Text(TextNode {
            center: Point::new(
                m.padding_x + first_column * (day_width + m.day_gap_x) + day_width / 2.0,
                top + m.month_label_padding_top + m.month_label_height / 2.0,
            ),
            text: month.first.format("%b").to_string(),
            font_size: m.month_font_size,
            weight: FontWeight::Bold,
            fill: ColorRole::MonthText.resolve(ctx.dark),
        }));

        let divider = ColorRole::Divider.resolve(ctx.dark);
        for week in grid::week_rows(month.first) {
            let x1 = if week.starts_week() {
                0.0
            } else {
                grid::day_x(week.first, m.padding_x, m.day_gap_x, day_width)
            };
            let x2 = if week.ends_week() {
                width
            } else {
                grid::day_x(week.last, m.padding_x, m.day_gap_x, day_width) + day_width
            };
            let y = grid::day_y(week.first, month.first, rows_top, m.day_height, m.day_gap_y)
                - m.day_gap_y / 2.0;
            scene.add(Shape::Line(LineNode {
                from: Point::new(x1, y),
                to: Point::new(x2, y),
                stroke: divider,
                width: m.divider_width,
            }));
        }

        let mut drawn = 0;
        for day in grid::month_days(month.first) {
            let y = grid::day_y(day, month.first, rows_top, m.day_height, m.day_gap_y);
            if y + m.day_height < 0.0 || y > ctx.viewport.height {
                continue;
            }
            let x = grid::day_x(day, m.padding_x, m.day_gap_x, day_width);
            let is_today = day == ctx.today;

            scene.add_interactive(
                Shape::Rect(RectNode {
                    bounds: Bounds::new(
                        x + day_width / 2.0 - m.day_height / 2.0,
                        y,
                        m.day_height,
                        m.day_height,
                    ),
                    corner_radius: m.day_height / 2.0,
                    fill: is_today.then(|| ColorRole::DayActiveBg.resolve(ctx.dark)),
                }),
                day,
            );

            let (weight, role) = if is_today {
                (FontWeight::Bold, ColorRole::DayActiveText)
            } else {
                (FontWeight::Normal, ColorRole::DayText)
            };
            scene.add(Shape::Text(TextNode {
                center: Point::new(x + day_width / 2.0, y + m.day_height / 2.0),
                text: day.format("%-d").to_string(),
                font_size: m.day_font_size,
                weight,
                fill: role.resolve(ctx.dark),
            }));
            drawn += 1;
        }
        drawn
    }
}
