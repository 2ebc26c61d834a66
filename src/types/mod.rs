//! Type definitions for calscroll

mod error;
mod geometry;
mod month;

pub use error::*;
pub use geometry::*;
pub use month::*;
