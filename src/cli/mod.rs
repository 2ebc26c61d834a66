use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use directories::BaseDirs;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::calendar::parse_initial_date;
use crate::services::grid;
use crate::services::layout_cache::MonthLayoutCache;
use crate::services::settings::{Settings, ThemePreference};
use crate::tui::{self, Theme, TuiOptions};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CALSCROLL_LOG";

/// Upper bound for `months --count` (a thousand years)
pub const MAX_MONTH_COUNT: u32 = 12_000;

/// Infinitely scrollable month calendar for the terminal
#[derive(Parser)]
#[command(name = "calscroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive calendar (default)
    Tui {
        /// Date to open at (YYYY-MM-DD, YYYY/MM/DD, RFC 3339 or epoch ms)
        #[arg(long)]
        date: Option<String>,

        /// Color theme, overriding the config file
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Settings file (default: ~/.calscroll/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print month layout records
    Months {
        /// First month to print (any date inside it); defaults to this month
        #[arg(long)]
        from: Option<String>,

        /// Number of months
        #[arg(
            long,
            default_value_t = 12,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MONTH_COUNT))
        )]
        count: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Settings file (default: ~/.calscroll/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => ThemePreference::Auto,
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    /// `~/.calscroll/calscroll.log`; the terminal belongs to the TUI
    File,
    Stderr,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            None => run_tui(None, None, None),
            Some(Commands::Tui {
                date,
                theme,
                config,
            }) => run_tui(date.as_deref(), theme, config.as_deref()),
            Some(Commands::Months {
                from,
                count,
                json,
                config,
            }) => {
                init_logging(LogTarget::Stderr);
                let settings = load_settings(config.as_deref())?;
                let from = match from {
                    Some(input) => parse_initial_date(&input)?,
                    None => Local::now().date_naive(),
                };
                let rows = month_rows(&settings, from, count as usize);
                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    for row in &rows {
                        println!("{}", row);
                    }
                }
                Ok(())
            }
        }
    }
}

fn run_tui(
    date: Option<&str>,
    theme: Option<ThemeArg>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    init_logging(LogTarget::File);
    let mut settings = load_settings(config)?;
    if let Some(theme) = theme {
        settings.theme = theme.into();
    }
    let date = date.map(parse_initial_date).transpose()?;
    // Detection must happen before raw mode
    let theme = Theme::from_preference(settings.theme);
    tui::run(TuiOptions {
        settings,
        theme,
        date,
    })
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    settings.context("failed to load settings")
}

fn init_logging(target: LogTarget) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let Some(path) = log_path() else {
                return;
            };
            if let Some(dir) = path.parent() {
                if fs::create_dir_all(dir).is_err() {
                    return;
                }
            }
            let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
                return;
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
}

fn log_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".calscroll").join("calscroll.log"))
}

/// One month of the layout cache, as printed by `months`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub index: usize,
    pub first_day: NaiveDate,
    pub row_count: u32,
    pub offset: f64,
    pub height: f64,
}

impl std::fmt::Display for MonthRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>6}  {}  {} rows  offset {:>12.1}  height {:>6.1}",
            self.index,
            self.first_day.format("%Y-%m"),
            self.row_count,
            self.offset,
            self.height
        )
    }
}

/// Layout records for `count` months starting at the month of `from`
pub fn month_rows(settings: &Settings, from: NaiveDate, count: usize) -> Vec<MonthRow> {
    let mut cache = MonthLayoutCache::new(settings.layout);
    let start = grid::month_index_of(from);
    let mut rows = Vec::with_capacity(count.min(MAX_MONTH_COUNT as usize));
    for index in start..start.saturating_add(count) {
        let offset = cache.offset_of(index);
        let Some(month) = cache.month(index).copied() else {
            break;
        };
        rows.push(MonthRow {
            index,
            first_day: month.first,
            row_count: month.row_count,
            offset,
            height: month.height,
        });
    }
    rows
}
