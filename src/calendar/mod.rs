//! The calendar surface and everything it draws

pub mod hover;
pub mod palette;
pub mod renderer;
pub mod scene;
pub mod surface;

pub use hover::HoverOverlay;
pub use palette::{ColorRole, Rgba};
pub use renderer::{CanvasRenderer, DrawContext, DrawOutcome};
pub use scene::{Scene, Shape};
pub use surface::{parse_initial_date, CalendarSurface, GestureSource, SurfaceTask};
