//! Cumulative month height cache
//!
//! `acc[i]` is the vertical offset of month `i` from the epoch origin, so
//! `acc` is a strictly increasing prefix sum with `acc.len() == months.len() + 1`.
//! The cache only grows, by appending whole batches from the tail.

use chrono::NaiveDate;

use crate::services::grid;
use crate::services::range_cover::find_max_le;
use crate::services::settings::LayoutMetrics;
use crate::types::Month;

/// Months realized at construction so the first draw never waits on extension
pub const INIT_MONTHS: usize = 200;

/// Months appended per extension
pub const EXTEND_BATCH: usize = 50;

pub struct MonthLayoutCache {
    metrics: LayoutMetrics,
    months: Vec<Month>,
    acc: Vec<f64>,
}

impl MonthLayoutCache {
    /// Seed the cache with [`INIT_MONTHS`] months from the epoch
    pub fn new(metrics: LayoutMetrics) -> Self {
        let mut cache = Self {
            metrics,
            months: Vec::with_capacity(INIT_MONTHS),
            acc: Vec::with_capacity(INIT_MONTHS + 1),
        };
        cache.acc.push(0.0);
        cache.append(INIT_MONTHS);
        cache
    }

    /// Number of realized months
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Cumulative offsets, one longer than [`Self::months`]
    pub fn accumulated(&self) -> &[f64] {
        &self.acc
    }

    /// Total height of all realized months
    pub fn total_height(&self) -> f64 {
        self.acc.last().copied().unwrap_or(0.0)
    }

    /// Append one batch of [`EXTEND_BATCH`] months
    pub fn extend_batch(&mut self) -> usize {
        self.append(EXTEND_BATCH)
    }

    /// Guarantee an entry for `index`, extending in whole batches.
    /// Returns false only past the end of the representable calendar.
    pub fn ensure(&mut self, index: usize) -> bool {
        while self.months.len() <= index {
            if self.extend_batch() == 0 {
                return false;
            }
        }
        true
    }

    /// Vertical offset of month `index`
    pub fn offset_of(&mut self, index: usize) -> f64 {
        if self.ensure(index) {
            self.acc[index]
        } else {
            self.total_height()
        }
    }

    /// Pixel height of month `index`
    pub fn height_of(&mut self, index: usize) -> f64 {
        if self.ensure(index) {
            self.acc[index + 1] - self.acc[index]
        } else {
            0.0
        }
    }

    pub fn month(&mut self, index: usize) -> Option<&Month> {
        self.ensure(index);
        self.months.get(index)
    }

    /// Month whose `[offset, offset + height)` interval contains `y`.
    /// Negative offsets map to month 0; offsets past the tail extend first.
    pub fn index_at_offset(&mut self, y: f64) -> usize {
        if y.is_nan() || y <= 0.0 {
            return 0;
        }
        while self.total_height() <= y {
            if self.extend_batch() == 0 {
                return self.months.len().saturating_sub(1);
            }
        }
        // acc[..len] are month start offsets; the greatest start <= y wins
        let starts = &self.acc[..self.months.len()];
        find_max_le(starts, &y, |a, b| a.total_cmp(b)).unwrap_or(0)
    }

    /// Cache index of the month containing `date`
    pub fn index_of_date(&self, date: NaiveDate) -> usize {
        grid::month_index_of(date)
    }

    fn append(&mut self, count: usize) -> usize {
        let mut acc = self.total_height();
        let mut added = 0;
        for _ in 0..count {
            let index = self.months.len();
            let Some(month) = grid::month_record(&self.metrics, index) else {
                tracing::warn!(index, "calendar range exhausted, cache not extended");
                break;
            };
            acc += month.height;
            self.months.push(month);
            self.acc.push(acc);
            added += 1;
        }
        if added > 0 {
            tracing::debug!(added, len = self.months.len(), "extended month layout cache");
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MonthLayoutCache {
        MonthLayoutCache::new(LayoutMetrics::default())
    }

    #[test]
    fn test_seeded_with_init_months() {
        let c = cache();
        assert_eq!(c.len(), INIT_MONTHS);
        assert_eq!(c.accumulated().len(), c.len() + 1);
        assert_eq!(c.accumulated()[0], 0.0);
        assert_eq!(c.months()[0].first, grid::epoch());
    }

    #[test]
    fn test_heights_match_formula_and_increase() {
        let mut c = cache();
        c.ensure(1500);
        let m = LayoutMetrics::default();
        let acc = c.accumulated().to_vec();
        for (i, month) in c.months().iter().enumerate() {
            let rows = f64::from(grid::month_row_count(month.first));
            let expected = m.month_label_height
                + rows * m.day_height
                + (rows - 1.0) * m.day_gap_y
                + m.month_gap_y;
            assert_eq!(acc[i + 1] - acc[i], expected, "month {i}");
            assert!(acc[i + 1] > acc[i]);
        }
    }

    #[test]
    fn test_ensure_extends_in_batches() {
        let mut c = cache();
        assert!(c.ensure(INIT_MONTHS));
        assert_eq!(c.len(), INIT_MONTHS + EXTEND_BATCH);
        assert!(c.ensure(INIT_MONTHS + EXTEND_BATCH * 2 + 3));
        assert_eq!(c.len(), INIT_MONTHS + EXTEND_BATCH * 3);
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut c = cache();
        c.ensure(420);
        let len = c.len();
        let acc = c.accumulated().to_vec();
        c.ensure(420);
        c.ensure(10);
        assert_eq!(c.len(), len);
        assert_eq!(c.accumulated(), acc.as_slice());
    }

    #[test]
    fn test_extension_preserves_prefix() {
        let mut c = cache();
        let before = c.accumulated().to_vec();
        c.extend_batch();
        assert_eq!(&c.accumulated()[..before.len()], before.as_slice());
    }

    #[test]
    fn test_offset_and_height_beyond_tail_extend() {
        let mut c = cache();
        let h = c.height_of(1000);
        assert!(c.len() > 1000);
        assert_eq!(c.offset_of(1001) - c.offset_of(1000), h);
    }

    #[test]
    fn test_index_at_offset_round_trip() {
        let mut c = cache();
        c.ensure(1600);
        for i in 0..c.len() {
            let offset = c.accumulated()[i];
            assert_eq!(c.index_at_offset(offset), i);
        }
    }

    #[test]
    fn test_index_at_offset_inside_interval() {
        let mut c = cache();
        let start = c.offset_of(300);
        let height = c.height_of(300);
        assert_eq!(c.index_at_offset(start + height / 2.0), 300);
        assert_eq!(c.index_at_offset(start + height - 0.01), 300);
        assert_eq!(c.index_at_offset(start + height), 301);
    }

    #[test]
    fn test_index_at_negative_offset_is_zero() {
        let mut c = cache();
        assert_eq!(c.index_at_offset(-50.0), 0);
        assert_eq!(c.index_at_offset(f64::NAN), 0);
    }

    #[test]
    fn test_index_at_offset_past_tail_extends() {
        let mut c = cache();
        let beyond = c.total_height() + 10_000.0;
        let idx = c.index_at_offset(beyond);
        assert!(idx >= INIT_MONTHS);
        assert!(c.accumulated()[idx] <= beyond);
        assert!(c.accumulated()[idx + 1] > beyond);
    }

    #[test]
    fn test_index_of_date() {
        let c = cache();
        let march_2024 = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(c.index_of_date(march_2024), 1490);
    }
}
