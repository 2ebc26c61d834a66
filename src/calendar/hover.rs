//! Hover indicator drawn outside the scene
//!
//! The overlay is not part of the scene graph, so redraws never disturb
//! it. It follows the day under the pointer and is hidden on pointer leave
//! and on every scroll-offset change.

use chrono::NaiveDate;

use crate::types::Bounds;

pub const HOVER_CORNER_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTarget {
    pub day: NaiveDate,
    pub bounds: Bounds,
    pub corner_radius: f64,
}

#[derive(Debug, Default)]
pub struct HoverOverlay {
    target: Option<HoverTarget>,
}

impl HoverOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the overlay onto a day shape
    pub fn show(&mut self, day: NaiveDate, bounds: Bounds) {
        self.target = Some(HoverTarget {
            day,
            bounds,
            corner_radius: HOVER_CORNER_RADIUS,
        });
    }

    pub fn hide(&mut self) {
        self.target = None;
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&HoverTarget> {
        self.target.as_ref()
    }
}
