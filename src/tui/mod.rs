//! Terminal host for the calendar surface

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::{run, App, TuiOptions};
pub use theme::Theme;
