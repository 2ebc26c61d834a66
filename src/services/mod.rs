//! Layout, scheduling and gesture services behind the calendar surface

pub mod grid;
pub mod inertia;
pub mod layout_cache;
pub mod range_cover;
pub mod resize;
pub mod scheduler;
pub mod settings;
pub mod virtual_range;

pub use inertia::{GestureState, InertiaScrollEngine};
pub use layout_cache::MonthLayoutCache;
pub use range_cover::{find_max_le, find_min_ge, min_range_cover};
pub use resize::{observe_resize, ResizeGuard, SurfaceId};
pub use scheduler::{FrameHandle, FrameQueue};
pub use settings::{LayoutMetrics, Settings};
pub use virtual_range::{VirtualRangeResolver, VisibleRange};
