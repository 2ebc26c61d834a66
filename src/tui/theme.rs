//! Terminal theme detection and color mapping

use ratatui::style::Color;

use crate::calendar::palette::{ColorRole, Rgba};
use crate::services::settings::ThemePreference;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Resolve a configured preference, detecting only for `Auto`
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Auto => Self::detect(),
            ThemePreference::Light => Self::Light,
            ThemePreference::Dark => Self::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Surface background
    pub fn background(self) -> Rgba {
        ColorRole::Background.resolve(self.is_dark())
    }

    /// Map a scene color onto the terminal, compositing translucent colors
    /// over `under` (or the background)
    pub fn color(self, rgba: Rgba, under: Option<Rgba>) -> Color {
        let solid = if rgba.is_opaque() {
            rgba
        } else {
            rgba.over(under.unwrap_or_else(|| self.background()))
        };
        Color::Rgb(solid.r, solid.g, solid.b)
    }

    /// Primary text color (header, help text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Accent color (current month, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, weekday labels, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Section header color in popups
    pub fn heading(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        let t = Theme::Dark;
        assert_eq!(t.text(), Color::White);
        assert_eq!(t.accent(), Color::Cyan);
        assert_eq!(t.muted(), Color::DarkGray);
        assert_eq!(t.heading(), Color::Yellow);
    }

    #[test]
    fn test_light_theme_colors() {
        let t = Theme::Light;
        assert_eq!(t.text(), Color::Black);
        assert_eq!(t.accent(), Color::Indexed(25));
        assert_eq!(t.muted(), Color::Gray);
        assert_eq!(t.heading(), Color::Indexed(130));
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_explicit_preference_skips_detection() {
        assert_eq!(Theme::from_preference(ThemePreference::Light), Theme::Light);
        assert_eq!(Theme::from_preference(ThemePreference::Dark), Theme::Dark);
    }

    #[test]
    fn test_opaque_color_maps_directly() {
        let c = Theme::Light.color(Rgba::rgb(0xee, 0x33, 0x33), None);
        assert_eq!(c, Color::Rgb(0xee, 0x33, 0x33));
    }

    #[test]
    fn test_translucent_color_composited() {
        // divider over the white light background
        let c = Theme::Light.color(ColorRole::Divider.resolve(false), None);
        assert_eq!(c, Color::Rgb(224, 224, 224));
    }
}
