//! Infinitely scrollable month calendar: layout engine, scroll physics and
//! a terminal host.

pub mod calendar;
pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
