//! Month and day records produced by the grid math

use chrono::NaiveDate;
use serde::Serialize;

/// A realized month in the layout cache.
/// Immutable once computed; `index` counts months from the epoch month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Month {
    pub index: usize,
    /// First calendar day of the month
    pub first: NaiveDate,
    /// Week rows needed to display the month (4-6)
    pub row_count: u32,
    /// Full pixel height: label, rows, row gaps and trailing month gap
    pub height: f64,
}

/// A calendar day placed on the month grid. Derived on demand, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Day {
    pub date: NaiveDate,
    pub month_index: usize,
    /// Week row within the month, 0-based
    pub row: u32,
    /// Weekday column, Sunday = 0
    pub column: u32,
}
