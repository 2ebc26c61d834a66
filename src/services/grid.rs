//! Month grid math: column/row placement of days and month heights
//!
//! Pure functions over `chrono` dates and [`LayoutMetrics`]. Weeks start on
//! Sunday (column 0). Row indices use floor division so placement is pixel
//! exact and matches the row count produced by [`month_row_count`].

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::services::settings::LayoutMetrics;
use crate::types::{Day, Month};

/// Epoch month: index 0 of the layout cache
pub const EPOCH_YEAR: i32 = 1900;
pub const EPOCH_MONTH: u32 = 1;

pub const DAYS_PER_WEEK: u32 = 7;
pub const MIN_ROW_COUNT: u32 = 4;
pub const MAX_ROW_COUNT: u32 = 6;

/// First day of the epoch month
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(EPOCH_YEAR, EPOCH_MONTH, 1).unwrap_or(NaiveDate::MIN)
}

/// Column width of one day. Degenerate (possibly negative) for narrow
/// surfaces; callers guard render sizes.
pub fn day_width(total_width: f64, padding_x: f64, gap_x: f64, columns: u32) -> f64 {
    let columns = f64::from(columns.max(1));
    (total_width - padding_x * 2.0 - gap_x * (columns - 1.0)) / columns
}

/// Weekday column, Sunday = 0
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn day_x(day: NaiveDate, padding_x: f64, gap_x: f64, width: f64) -> f64 {
    f64::from(weekday_index(day)) * (width + gap_x) + padding_x
}

/// Week row of `day` within `month` (any date inside the month)
pub fn day_row(day: NaiveDate, month: NaiveDate) -> u32 {
    let first = start_of_month(month);
    let diff = day.signed_duration_since(first).num_days().max(0) as u32;
    (weekday_index(first) + diff) / DAYS_PER_WEEK
}

pub fn day_y(
    day: NaiveDate,
    month: NaiveDate,
    month_start_y: f64,
    day_height: f64,
    gap_y: f64,
) -> f64 {
    month_start_y + f64::from(day_row(day, month)) * (day_height + gap_y)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Length of the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = start_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // only December of chrono's last year has no successor
        None => 31,
    }
}

/// Week rows needed to show `month` (4, 5 or 6)
pub fn month_row_count(month: NaiveDate) -> u32 {
    let first = start_of_month(month);
    (weekday_index(first) + days_in_month(first)).div_ceil(DAYS_PER_WEEK)
}

/// Full pixel height of a month block with `row_count` week rows
pub fn month_height(metrics: &LayoutMetrics, row_count: u32) -> f64 {
    let rows = f64::from(row_count);
    metrics.month_label_height
        + rows * metrics.day_height
        + (rows - 1.0) * metrics.day_gap_y
        + metrics.month_gap_y
}

/// Every date of the month, first to last, ascending
pub fn month_days(month: NaiveDate) -> MonthDays {
    let first = start_of_month(month);
    let last = first + Days::new(u64::from(days_in_month(first) - 1));
    MonthDays {
        next: Some(first),
        last,
    }
}

/// Iterator returned by [`month_days`]
#[derive(Debug, Clone)]
pub struct MonthDays {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for MonthDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.last {
            current.succ_opt()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(d) => (self.last.signed_duration_since(d).num_days() + 1).max(0) as usize,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthDays {}

/// One week row of a month: its first and last in-month dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRow {
    pub row: u32,
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl WeekRow {
    /// Row starts on Sunday (not trimmed on the left)
    pub fn starts_week(&self) -> bool {
        weekday_index(self.first) == 0
    }

    /// Row ends on Saturday (not trimmed on the right)
    pub fn ends_week(&self) -> bool {
        weekday_index(self.last) == DAYS_PER_WEEK - 1
    }
}

/// Week rows of `month` in order
pub fn week_rows(month: NaiveDate) -> Vec<WeekRow> {
    let first = start_of_month(month);
    let mut rows: Vec<WeekRow> = Vec::with_capacity(MAX_ROW_COUNT as usize);
    for date in month_days(first) {
        let row = day_row(date, first);
        match rows.last_mut() {
            Some(current) if current.row == row => current.last = date,
            _ => rows.push(WeekRow {
                row,
                first: date,
                last: date,
            }),
        }
    }
    rows
}

/// Month index of `date` relative to the epoch; dates before it clamp to 0
pub fn month_index_of(date: NaiveDate) -> usize {
    let months =
        (date.year() - EPOCH_YEAR) as i64 * 12 + (date.month() as i64 - EPOCH_MONTH as i64);
    months.max(0) as usize
}

/// First day of the month at `index`, or `None` past chrono's date range
pub fn month_at_index(index: usize) -> Option<NaiveDate> {
    let months = u32::try_from(index).ok()?;
    epoch().checked_add_months(Months::new(months))
}

/// Realize the [`Month`] record for `index`
pub fn month_record(metrics: &LayoutMetrics, index: usize) -> Option<Month> {
    let first = month_at_index(index)?;
    let row_count = month_row_count(first);
    Some(Month {
        index,
        first,
        row_count,
        height: month_height(metrics, row_count),
    })
}

/// Place `date` on the grid of `month`
pub fn day_of(month: &Month, date: NaiveDate) -> Day {
    Day {
        date,
        month_index: month.index,
        row: day_row(date, month.first),
        column: weekday_index(date),
    }
}
