//! User settings: layout metrics, scroll physics and host options
//!
//! Settings are read from `~/.calscroll/config.json`. Every field has a
//! default, so a partial file only overrides what it names and a missing
//! file means "all defaults".

use crate::services::grid;
use crate::types::{CalendarError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Pixel constants for the month grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Height of the header overlaid on the top of the surface
    pub viewport_padding_top: f64,
    /// Extra distance beyond the viewport still resolved as visible
    pub preload_height: f64,
    pub padding_x: f64,
    pub day_gap_x: f64,
    pub day_gap_y: f64,
    pub month_gap_y: f64,
    pub day_height: f64,
    pub month_label_height: f64,
    pub month_label_padding_top: f64,
    pub divider_width: f64,
    pub month_font_size: f64,
    pub day_font_size: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            viewport_padding_top: 75.0,
            preload_height: 75.0,
            padding_x: 8.0,
            day_gap_x: 4.0,
            day_gap_y: 4.0,
            month_gap_y: 12.0,
            day_height: 40.0,
            month_label_height: 50.0,
            month_label_padding_top: 10.0,
            divider_width: 0.5,
            month_font_size: 20.0,
            day_font_size: 14.0,
        }
    }
}

/// Drag/fling physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaSettings {
    /// Velocity retained per 16 ms reference frame
    pub friction: f64,
}

impl Default for InertiaSettings {
    fn default() -> Self {
        Self { friction: 0.92 }
    }
}

/// Pixel size of one terminal cell, used to rasterize the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

/// Color scheme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Detect from the terminal background
    #[default]
    Auto,
    Light,
    Dark,
}

/// All user-tunable settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutMetrics,
    pub inertia: InertiaSettings,
    /// Pixels scrolled per wheel notch
    pub wheel_step: f64,
    pub cell: CellMetrics,
    pub theme: ThemePreference,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            inertia: InertiaSettings::default(),
            wheel_step: 48.0,
            cell: CellMetrics::default(),
            theme: ThemePreference::default(),
        }
    }
}

impl Settings {
    /// Default location: `~/.calscroll/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| CalendarError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".calscroll").join("config.json"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load and validate settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject settings the layout core cannot work with
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        let positive = [
            ("day_height", l.day_height),
            ("month_label_height", l.month_label_height),
            ("wheel_step", self.wheel_step),
            ("cell.width", self.cell.width),
            ("cell.height", self.cell.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalendarError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("viewport_padding_top", l.viewport_padding_top),
            ("preload_height", l.preload_height),
            ("padding_x", l.padding_x),
            ("day_gap_x", l.day_gap_x),
            ("day_gap_y", l.day_gap_y),
            ("month_gap_y", l.month_gap_y),
            ("month_label_padding_top", l.month_label_padding_top),
            ("divider_width", l.divider_width),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalendarError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        let friction = self.inertia.friction;
        if !(friction > 0.0 && friction < 1.0) {
            return Err(CalendarError::Config(format!(
                "friction must be in (0, 1), got {}",
                friction
            )));
        }

        // The displayed-month label reads the month one past the first
        // resolved month. That only lands on the top visible month while the
        // header plus preload band is shorter than the shortest month.
        let reach = l.viewport_padding_top + l.preload_height;
        let shortest = grid::month_height(l, grid::MIN_ROW_COUNT);
        if reach >= shortest {
            return Err(CalendarError::Config(format!(
                "viewport_padding_top + preload_height ({}) must be less than the shortest month height ({})",
                reach, shortest
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_default_layout_constants() {
        let l = LayoutMetrics::default();
        assert_eq!(l.viewport_padding_top, 75.0);
        assert_eq!(l.preload_height, 75.0);
        assert_eq!(l.day_height, 40.0);
        assert_eq!(l.month_label_height, 50.0);
        assert_eq!(l.month_gap_y, 12.0);
        assert_eq!(Settings::default().inertia.friction, 0.92);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_overrides_named_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"layout": {{"day_height": 32}}, "inertia": {{"friction": 0.9}}, "theme": "dark"}}"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.layout.day_height, 32.0);
        assert_eq!(settings.layout.month_label_height, 50.0);
        assert_eq!(settings.inertia.friction, 0.9);
        assert_eq!(settings.theme, ThemePreference::Dark);
        assert_eq!(settings.wheel_step, 48.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(CalendarError::Json(_))
        ));
    }

    #[test]
    fn test_friction_out_of_range_rejected() {
        let mut s = Settings::default();
        s.inertia.friction = 1.0;
        assert!(matches!(s.validate(), Err(CalendarError::Config(_))));
        s.inertia.friction = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_non_positive_day_height_rejected() {
        let mut s = Settings::default();
        s.layout.day_height = 0.0;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("day_height"));
    }

    #[test]
    fn test_preload_reaching_past_shortest_month_rejected() {
        let mut s = Settings::default();
        // shortest month with defaults: 50 + 4*40 + 3*4 + 12 = 234
        s.layout.preload_height = 160.0;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("shortest month"));
    }
}
