//! Drag tracking and fling (inertial) scrolling
//!
//! Pointer samples are turned into signed single-axis scroll deltas. On
//! release the last measured velocity keeps scrolling, decaying by
//! `friction` per 16 ms so the feel is independent of the frame rate.

use crate::services::scheduler::{FrameHandle, FrameQueue};
use crate::types::{Axis, Point};

/// Below this speed (px/ms) motion stops
pub const STOP_VELOCITY: f64 = 0.01;

/// Friction is expressed per reference frame of this length
pub const REFERENCE_FRAME_MS: f64 = 16.0;

pub const DEFAULT_FRICTION: f64 = 0.92;

/// Gesture lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Tracking {
        start: Point,
        last: Point,
        last_time: f64,
        /// px/ms on both axes
        velocity: Point,
    },
    Inertial {
        velocity: f64,
        last_frame: f64,
        handle: FrameHandle,
    },
}

#[derive(Debug)]
pub struct InertiaScrollEngine {
    axis: Axis,
    friction: f64,
    state: GestureState,
}

impl InertiaScrollEngine {
    pub fn new(axis: Axis, friction: f64) -> Self {
        let friction = if friction > 0.0 && friction < 1.0 {
            friction
        } else {
            DEFAULT_FRICTION
        };
        Self {
            axis,
            friction,
            state: GestureState::Idle,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking { .. })
    }

    pub fn is_inertial(&self) -> bool {
        matches!(self.state, GestureState::Inertial { .. })
    }

    /// Begin tracking at `position`, stopping any running fling
    pub fn start<T: Copy + PartialEq>(
        &mut self,
        position: Point,
        now: f64,
        frames: &mut FrameQueue<T>,
    ) {
        self.cancel(frames);
        self.state = GestureState::Tracking {
            start: position,
            last: position,
            last_time: now,
            velocity: Point::default(),
        };
    }

    /// Record a pointer sample; returns the positional delta along the axis
    pub fn move_to(&mut self, position: Point, now: f64) -> Option<f64> {
        let GestureState::Tracking {
            last,
            last_time,
            velocity,
            ..
        } = &mut self.state
        else {
            return None;
        };

        let elapsed = now - *last_time;
        if elapsed > 0.0 {
            *velocity = Point::new(
                (position.x - last.x) / elapsed,
                (position.y - last.y) / elapsed,
            );
        }
        let delta = position.along(self.axis) - last.along(self.axis);
        *last = position;
        *last_time = now;
        Some(delta)
    }

    /// Release the pointer. Starts a fling scheduled as `task` when the
    /// release velocity is large enough; returns whether it did.
    pub fn end<T: Copy + PartialEq>(
        &mut self,
        now: f64,
        frames: &mut FrameQueue<T>,
        task: T,
    ) -> bool {
        let GestureState::Tracking { velocity, .. } = self.state else {
            return false;
        };
        let velocity = velocity.along(self.axis);
        if velocity.abs() < STOP_VELOCITY {
            self.state = GestureState::Idle;
            return false;
        }
        let handle = frames.schedule_once(task);
        tracing::trace!(velocity, "fling started");
        self.state = GestureState::Inertial {
            velocity,
            last_frame: now,
            handle,
        };
        true
    }

    /// Advance the fling for the frame task `handle`. Stale handles
    /// (cancelled or superseded) are ignored.
    pub fn tick<T: Copy + PartialEq>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        frames: &mut FrameQueue<T>,
        task: T,
    ) -> Option<f64> {
        let GestureState::Inertial {
            velocity,
            last_frame,
            handle: current,
        } = self.state
        else {
            return None;
        };
        if current != handle {
            return None;
        }

        let elapsed = (now - last_frame).max(0.0);
        let velocity = velocity * self.friction.powf(elapsed / REFERENCE_FRAME_MS);
        let delta = velocity * elapsed;

        if velocity.abs() < STOP_VELOCITY {
            tracing::trace!("fling settled");
            self.state = GestureState::Idle;
        } else {
            self.state = GestureState::Inertial {
                velocity,
                last_frame: now,
                handle: frames.schedule_once(task),
            };
        }
        Some(delta)
    }

    /// Stop a running fling; its pending frame task is cancelled
    pub fn cancel<T: Copy + PartialEq>(&mut self, frames: &mut FrameQueue<T>) {
        if let GestureState::Inertial { handle, .. } = self.state {
            frames.cancel(handle);
            tracing::trace!("fling cancelled");
            self.state = GestureState::Idle;
        }
    }

    /// Tear down: cancel any fling and forget an active drag
    pub fn destroy<T: Copy + PartialEq>(&mut self, frames: &mut FrameQueue<T>) {
        self.cancel(frames);
        self.state = GestureState::Idle;
    }
}
