//! TUI widgets

pub mod calendar_canvas;
pub mod header;
pub mod help;
