//! Theme-aware colors for calendar roles

use serde::Serialize;

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Composite over an opaque background
    pub fn over(self, background: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (f64::from(fg) * a + f64::from(bg) * (1.0 - a)).round() as u8;
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

/// A light/dark color pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemedColor {
    pub light: Rgba,
    pub dark: Rgba,
}

impl ThemedColor {
    pub const fn new(light: Rgba, dark: Rgba) -> Self {
        Self { light, dark }
    }

    /// Same color in both themes
    pub const fn uniform(color: Rgba) -> Self {
        Self::new(color, color)
    }

    pub fn resolve(&self, dark: bool) -> Rgba {
        if dark {
            self.dark
        } else {
            self.light
        }
    }
}

/// Semantic color roles used by the renderer and the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Divider,
    DayText,
    DayActiveText,
    DayActiveBg,
    MonthText,
    Hover,
    Background,
}

impl ColorRole {
    pub fn themed(self) -> ThemedColor {
        match self {
            Self::Divider => ThemedColor::uniform(Rgba::rgba(100, 100, 100, 0.2)),
            Self::DayText => ThemedColor::new(Rgba::rgb(0x11, 0x11, 0x11), Rgba::rgb(0xcc, 0xcc, 0xcc)),
            Self::DayActiveText => ThemedColor::uniform(Rgba::WHITE),
            Self::DayActiveBg => ThemedColor::uniform(Rgba::rgb(0xee, 0x33, 0x33)),
            Self::MonthText => ThemedColor::new(Rgba::rgb(0x11, 0x11, 0x11), Rgba::rgb(0xcc, 0xcc, 0xcc)),
            Self::Hover => ThemedColor::new(Rgba::rgba(0, 0, 0, 0.08), Rgba::rgba(255, 255, 255, 0.12)),
            Self::Background => ThemedColor::new(Rgba::WHITE, Rgba::rgb(0x12, 0x12, 0x12)),
        }
    }

    pub fn resolve(self, dark: bool) -> Rgba {
        self.themed().resolve(dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_theme() {
        assert_eq!(ColorRole::DayText.resolve(false), Rgba::rgb(0x11, 0x11, 0x11));
        assert_eq!(ColorRole::DayText.resolve(true), Rgba::rgb(0xcc, 0xcc, 0xcc));
    }

    #[test]
    fn test_divider_same_in_both_themes() {
        let t = ColorRole::Divider.themed();
        assert_eq!(t.light, t.dark);
        assert_eq!(t.light.a, 0.2);
    }

    #[test]
    fn test_active_background() {
        assert_eq!(ColorRole::DayActiveBg.resolve(true), Rgba::rgb(0xee, 0x33, 0x33));
        assert_eq!(ColorRole::DayActiveText.resolve(false), Rgba::WHITE);
    }

    #[test]
    fn test_over_blends_alpha() {
        let half = Rgba::rgba(200, 100, 0, 0.5);
        assert_eq!(half.over(Rgba::BLACK), Rgba::rgb(100, 50, 0));
        assert_eq!(Rgba::rgb(1, 2, 3).over(Rgba::WHITE), Rgba::rgb(1, 2, 3));
    }
}
