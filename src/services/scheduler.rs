//! Next-frame task scheduling
//!
//! Hosts call [`FrameQueue::begin_frame`] once per display refresh and run
//! whatever it hands back. Scheduling a task that is already pending
//! returns the pending handle, which is how many redraw requests within one
//! frame collapse into a single draw.

/// Identifies one scheduled task; stale after it runs or is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug)]
pub struct FrameQueue<T> {
    pending: Vec<(FrameHandle, T)>,
    next_handle: u64,
    frames: u64,
}

impl<T: Copy + PartialEq> FrameQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_handle: 0,
            frames: 0,
        }
    }

    /// Run `task` on the next frame; an identical pending task is reused
    pub fn schedule_once(&mut self, task: T) -> FrameHandle {
        if let Some((handle, _)) = self.pending.iter().find(|(_, t)| *t == task) {
            return *handle;
        }
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push((handle, task));
        handle
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    /// Remove a pending task by value, reporting whether it was pending
    pub fn take(&mut self, task: T) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, t)| *t != task);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Start a frame: hand over everything scheduled so far, in order.
    /// Tasks scheduled while these run wait for the following frame.
    pub fn begin_frame(&mut self) -> Vec<(FrameHandle, T)> {
        self.frames += 1;
        std::mem::take(&mut self.pending)
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T: Copy + PartialEq> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
