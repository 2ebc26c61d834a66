//! Visible month range resolution
//!
//! Finds the months that intersect the viewport widened by the preload
//! margin, extending the layout cache first when the range runs into its
//! tail.

use crate::services::layout_cache::MonthLayoutCache;
use crate::services::settings::LayoutMetrics;

/// Resolving this close to the cache tail triggers an extension
pub const TAIL_SLACK: usize = 2;

/// The "currently displayed" month is this many months past the first
/// resolved month. Month `i` is shown from `offset(i) - padding - preload`
/// until `offset(i + 1) - padding - preload`, so the label flips to the
/// next month `padding + preload` pixels before that month reaches the
/// header. Requires `viewport_padding_top + preload_height` to be shorter
/// than any month (enforced by `Settings::validate`).
pub const DISPLAYED_MONTH_LEAD: usize = 1;

/// A month's draw-space placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthPlacement {
    pub index: usize,
    /// Top edge in surface pixels
    pub top: f64,
    pub height: f64,
}

impl MonthPlacement {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether any part of the month lies within `[0, viewport_height]`
    pub fn intersects(&self, viewport_height: f64) -> bool {
        !(self.bottom() < 0.0 || self.top > viewport_height)
    }
}

/// Inclusive month range to draw
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
    pub placements: Vec<MonthPlacement>,
}

impl VisibleRange {
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Month the header label shows
    pub fn displayed_index(&self) -> usize {
        (self.start + DISPLAYED_MONTH_LEAD).min(self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualRangeResolver {
    preload_margin: f64,
    viewport_padding_top: f64,
}

impl VirtualRangeResolver {
    pub fn new(preload_margin: f64, viewport_padding_top: f64) -> Self {
        Self {
            preload_margin: preload_margin.max(0.0),
            viewport_padding_top,
        }
    }

    pub fn from_metrics(metrics: &LayoutMetrics) -> Self {
        Self::new(metrics.preload_height, metrics.viewport_padding_top)
    }

    /// Resolve `[start, end]` for a viewport scrolled to `scroll_offset`
    pub fn resolve(
        &self,
        cache: &mut MonthLayoutCache,
        scroll_offset: f64,
        viewport_height: f64,
    ) -> VisibleRange {
        // Content y that lands at draw y = 0 (under the header)
        let origin = scroll_offset - self.viewport_padding_top;
        let low = origin - self.preload_margin;
        let high = origin + viewport_height.max(0.0) + self.preload_margin;

        let (start, end) = loop {
            let (start, end) = bounds(cache.accumulated(), low, high);
            if end + TAIL_SLACK >= cache.len() && cache.extend_batch() > 0 {
                continue;
            }
            break (start, end);
        };

        let acc = cache.accumulated();
        let placements = (start..=end)
            .map(|index| MonthPlacement {
                index,
                top: acc[index] - origin,
                height: acc[index + 1] - acc[index],
            })
            .collect();

        VisibleRange {
            start,
            end,
            placements,
        }
    }
}

/// Bisect `acc` for the first month ending past `low` and the first month
/// starting past `high` (or the last month when none does)
fn bounds(acc: &[f64], low: f64, high: f64) -> (usize, usize) {
    let months = acc.len().saturating_sub(1);
    if months == 0 {
        return (0, 0);
    }
    let last = months - 1;
    let start = acc[1..].partition_point(|&end| end <= low).min(last);
    let end = acc[..months].partition_point(|&top| top <= high);
    let end = if end >= months { last } else { end.max(start) };
    (start, end)
}
