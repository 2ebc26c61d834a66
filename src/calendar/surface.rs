//! A mounted calendar: scroll state, gestures, frames and the scene
//!
//! Everything a calendar instance needs is owned here. Input methods only
//! mutate state and schedule work; drawing happens in [`CalendarSurface::run_frame`],
//! so any number of inputs within one frame produce a single draw.

use std::sync::mpsc::{self, Receiver};

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::calendar::hover::HoverOverlay;
use crate::calendar::renderer::{CanvasRenderer, DrawContext, DrawOutcome};
use crate::calendar::scene::Scene;
use crate::services::grid;
use crate::services::inertia::InertiaScrollEngine;
use crate::services::layout_cache::MonthLayoutCache;
use crate::services::resize::{self, ResizeGuard, SurfaceId};
use crate::services::scheduler::FrameQueue;
use crate::services::settings::Settings;
use crate::services::virtual_range::VisibleRange;
use crate::types::{Axis, CalendarError, Point, Result, Size};

/// Input device driving a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSource {
    Mouse,
    Touch,
}

/// Work a surface runs on the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTask {
    Redraw,
    Inertia(GestureSource),
}

pub struct CalendarSurface {
    id: SurfaceId,
    settings: Settings,
    cache: MonthLayoutCache,
    renderer: CanvasRenderer,
    scene: Scene,
    hover: HoverOverlay,
    frames: FrameQueue<SurfaceTask>,
    mouse: InertiaScrollEngine,
    touch: InertiaScrollEngine,
    scroll_offset: f64,
    viewport: Size,
    dark: bool,
    today: NaiveDate,
    last_draw: Option<DrawOutcome>,
    draw_count: u64,
    resize: Option<(ResizeGuard, Receiver<Size>)>,
    mounted: bool,
}

impl CalendarSurface {
    pub fn new(settings: Settings) -> Self {
        let friction = settings.inertia.friction;
        Self {
            id: SurfaceId::next(),
            cache: MonthLayoutCache::new(settings.layout),
            renderer: CanvasRenderer::new(settings.layout),
            settings,
            scene: Scene::new(),
            hover: HoverOverlay::new(),
            frames: FrameQueue::new(),
            mouse: InertiaScrollEngine::new(Axis::Vertical, friction),
            touch: InertiaScrollEngine::new(Axis::Vertical, friction),
            scroll_offset: 0.0,
            viewport: Size::default(),
            dark: false,
            today: Local::now().date_naive(),
            last_draw: None,
            draw_count: 0,
            resize: None,
            mounted: false,
        }
    }

    /// Attach to a viewport and show the month containing `initial`
    pub fn mount(&mut self, initial: NaiveDate, viewport: Size) {
        self.viewport = viewport;
        self.mounted = true;
        tracing::info!(
            surface = ?self.id,
            %initial,
            width = viewport.width,
            height = viewport.height,
            "calendar mounted"
        );
        self.scroll_to_date(initial);
    }

    /// Scroll so the month of `date` starts under the header, and draw now
    pub fn scroll_to_date(&mut self, date: NaiveDate) {
        let index = grid::month_index_of(date);
        self.cache.ensure(index + 1);
        let offset = self.cache.offset_of(index);
        tracing::info!(%date, index, offset, "scroll to date");
        self.set_scroll_offset(offset);
        self.frames.take(SurfaceTask::Redraw);
        self.draw();
    }

    /// Set the scroll position; negative and non-finite values clamp to 0.
    /// Hides hover.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        self.hover.hide();
    }

    /// Scroll by `delta` pixels and redraw on the next frame
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.scroll_offset + delta);
        self.request_redraw();
    }

    /// Vertical wheel input, positive scrolls forward in time
    pub fn wheel(&mut self, delta_y: f64) {
        self.scroll_by(delta_y);
    }

    pub fn resize(&mut self, size: Size) {
        if self.viewport != size {
            tracing::debug!(width = size.width, height = size.height, "surface resized");
        }
        self.viewport = size;
        self.request_redraw();
    }

    /// Receive sizes from the thread's resize registry
    pub fn observe_resize(&mut self) {
        let (tx, rx) = mpsc::channel();
        let guard = resize::observe_resize(self.id, move |size| {
            let _ = tx.send(size);
        });
        self.resize = Some((guard, rx));
    }

    /// Apply sizes delivered since the last call; returns whether any arrived
    pub fn poll_resize(&mut self) -> bool {
        let latest = match &self.resize {
            Some((_, rx)) => rx.try_iter().last(),
            None => None,
        };
        match latest {
            Some(size) => {
                self.resize(size);
                true
            }
            None => false,
        }
    }

    pub fn set_dark(&mut self, dark: bool) {
        if self.dark != dark {
            self.dark = dark;
            self.request_redraw();
        }
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today != today {
            self.today = today;
            self.request_redraw();
        }
    }

    // ========== Gestures ==========

    fn engine_mut(&mut self, source: GestureSource) -> &mut InertiaScrollEngine {
        match source {
            GestureSource::Mouse => &mut self.mouse,
            GestureSource::Touch => &mut self.touch,
        }
    }

    /// Pointer down. Stops every running fling before tracking starts.
    pub fn gesture_start(&mut self, source: GestureSource, position: Point, now: f64) {
        self.mouse.cancel(&mut self.frames);
        self.touch.cancel(&mut self.frames);
        let engine = match source {
            GestureSource::Mouse => &mut self.mouse,
            GestureSource::Touch => &mut self.touch,
        };
        engine.start(position, now, &mut self.frames);
    }

    /// Pointer moved while down; content follows the pointer
    pub fn gesture_move(&mut self, source: GestureSource, position: Point, now: f64) {
        if let Some(delta) = self.engine_mut(source).move_to(position, now) {
            self.scroll_by(-delta);
        }
    }

    /// Pointer released; may start a fling
    pub fn gesture_end(&mut self, source: GestureSource, now: f64) {
        let engine = match source {
            GestureSource::Mouse => &mut self.mouse,
            GestureSource::Touch => &mut self.touch,
        };
        engine.end(now, &mut self.frames, SurfaceTask::Inertia(source));
    }

    pub fn is_dragging(&self) -> bool {
        self.mouse.is_tracking() || self.touch.is_tracking()
    }

    pub fn is_animating(&self) -> bool {
        self.mouse.is_inertial() || self.touch.is_inertial()
    }

    // ========== Hover ==========

    /// Pointer moved without a button; returns the hovered day
    pub fn pointer_hover(&mut self, position: Point) -> Option<NaiveDate> {
        let hit = self
            .scene
            .hit_test(position)
            .and_then(|node| node.day.map(|day| (day, node.shape.bounds())));
        match hit {
            Some((day, bounds)) => {
                self.hover.show(day, bounds);
                Some(day)
            }
            None => {
                self.hover.hide();
                None
            }
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hover.hide();
    }

    // ========== Frames ==========

    pub fn request_redraw(&mut self) {
        self.frames.schedule_once(SurfaceTask::Redraw);
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    /// Run one display frame at time `now` (ms). Fling steps run first so
    /// their movement lands in this frame's draw. Returns whether it drew.
    pub fn run_frame(&mut self, now: f64) -> bool {
        self.poll_resize();
        let mut redraw = false;
        for (handle, task) in self.frames.begin_frame() {
            match task {
                SurfaceTask::Redraw => redraw = true,
                SurfaceTask::Inertia(source) => {
                    let engine = match source {
                        GestureSource::Mouse => &mut self.mouse,
                        GestureSource::Touch => &mut self.touch,
                    };
                    if let Some(delta) = engine.tick(handle, now, &mut self.frames, task) {
                        self.set_scroll_offset(self.scroll_offset - delta);
                        redraw = true;
                    }
                }
            }
        }
        redraw && self.draw()
    }

    fn draw(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let ctx = DrawContext {
            viewport: self.viewport,
            dark: self.dark,
            today: self.today,
        };
        let outcome = self
            .renderer
            .draw(&mut self.scene, &mut self.cache, self.scroll_offset, &ctx);
        tracing::trace!(
            start = outcome.range.start,
            end = outcome.range.end,
            nodes = self.scene.len(),
            "calendar drawn"
        );
        self.draw_count += 1;
        self.last_draw = Some(outcome);
        true
    }

    /// Stop all animation, drop scheduled work and the scene
    pub fn destroy(&mut self) {
        if !self.mounted && self.resize.is_none() {
            return;
        }
        self.mouse.destroy(&mut self.frames);
        self.touch.destroy(&mut self.frames);
        self.frames.clear();
        self.scene.destroy_children();
        self.hover.hide();
        self.resize = None;
        self.mounted = false;
        tracing::debug!(surface = ?self.id, "calendar destroyed");
    }

    // ========== Accessors ==========

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn hover(&self) -> &HoverOverlay {
        &self.hover
    }

    pub fn cache(&self) -> &MonthLayoutCache {
        &self.cache
    }

    pub fn visible_range(&self) -> Option<&VisibleRange> {
        self.last_draw.as_ref().map(|d| &d.range)
    }

    /// Header text of the month currently displayed
    pub fn current_label(&self) -> &str {
        self.last_draw.as_ref().map_or("", |d| d.label.as_str())
    }

    pub fn displayed_month(&self) -> Option<NaiveDate> {
        self.last_draw.as_ref().and_then(|d| d.displayed_month)
    }

    /// Draws performed since construction
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }
}

impl Drop for CalendarSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Interpret an initial date: `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339, or
/// Unix epoch milliseconds (local date)
pub fn parse_initial_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.date_naive());
    }
    if let Ok(millis) = input.parse::<i64>() {
        return date_from_epoch_millis(millis);
    }
    Err(CalendarError::InvalidDate(input.to_string()))
}

/// Local calendar date of a Unix timestamp in milliseconds
pub fn date_from_epoch_millis(millis: i64) -> Result<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
        .ok_or_else(|| CalendarError::InvalidDate(millis.to_string()))
}
