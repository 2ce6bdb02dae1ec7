//! The per-frame driver: poll events, follow the window size, draw, present.
//!
//! One iteration of [`FrameLoop::iterate`] is:
//!
//!   1. drain every pending event, forwarding each to [`FrameHooks::on_event`]
//!      and remembering whether a quit event went by
//!   2. compare the live window size with the cached one; on change issue one
//!      `reset` and one `set_view_rect` for [`CLEAR_VIEW`], then update the cache
//!   3. unless quit was seen: set the view rect, touch the clear view, let the
//!      hooks submit content, and present exactly once
//!
//! The driver never talks to winit or wgpu directly, so the same code runs
//! against the real window/backend and against recording mocks in tests.

use crate::debug_text::DebugText;
use crate::view::{
    ClearParams, DebugFlags, Extent, FrameStats, ResetFlags, ViewId, ViewRect, CLEAR_VIEW,
};

/// Source of window events and the live window size.
pub trait Windowing {
    type Event;

    /// Next pending event, or `None` once the queue is drained.
    fn poll_event(&mut self) -> Option<Self::Event>;

    /// Whether `event` asks the application to terminate.
    fn is_quit(&self, event: &Self::Event) -> bool;

    /// Current inner size of the window in physical pixels.
    fn live_size(&self) -> Extent;
}

/// Command surface of the rendering backend.
pub trait RenderBackend {
    /// Reconfigure the backbuffer for a new size and presentation mode.
    fn reset(&mut self, size: Extent, flags: ResetFlags);
    fn set_debug(&mut self, flags: DebugFlags);
    fn set_view_clear(&mut self, view: ViewId, clear: ClearParams);
    fn set_view_rect(&mut self, view: ViewId, rect: ViewRect);
    /// Submit an empty draw so the view's clear runs even with no other work.
    fn touch(&mut self, view: ViewId);
    fn debug_text_mut(&mut self) -> &mut DebugText;
    fn stats(&self) -> FrameStats;
    /// Flush queued work and present. Returns the new frame number.
    fn frame(&mut self) -> u64;
}

/// Application callbacks invoked by the loop.
pub trait FrameHooks<E, R> {
    /// Called for every drained event, quit events included.
    fn on_event(&mut self, _event: &E) {}

    /// Submit this frame's content. The clear view has already been touched;
    /// `frame()` is called by the loop afterwards.
    fn draw(&mut self, backend: &mut R, size: Extent);
}

/// What the caller should do after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Cached loop state: the last known window size and the quit latch.
#[derive(Debug)]
pub struct FrameLoop {
    size: Extent,
    reset_flags: ResetFlags,
    quit: bool,
    iterations: u64,
}

impl FrameLoop {
    /// `initial` must be the size the backend was initialized with.
    pub fn new(initial: Extent, reset_flags: ResetFlags) -> Self {
        Self {
            size: initial,
            reset_flags,
            quit: false,
            iterations: 0,
        }
    }

    pub fn size(&self) -> Extent {
        self.size
    }

    /// True while the cached size is zero-area and no quit is pending. Nothing
    /// is drawn or presented in this state, so the caller should block on
    /// events instead of polling.
    pub fn is_idle(&self) -> bool {
        self.size.is_empty() && !self.quit
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run one poll / resize / draw iteration.
    pub fn iterate<W, R, H>(
        &mut self,
        window: &mut W,
        backend: &mut R,
        hooks: &mut H,
    ) -> LoopControl
    where
        W: Windowing,
        R: RenderBackend,
        H: FrameHooks<W::Event, R>,
    {
        if self.quit {
            return LoopControl::Exit;
        }
        self.iterations += 1;

        while let Some(event) = window.poll_event() {
            hooks.on_event(&event);
            if window.is_quit(&event) {
                self.quit = true;
            }
        }

        let live = window.live_size();
        if live != self.size {
            log::info!("Resized {} -> {}", self.size, live);
            backend.reset(live, self.reset_flags);
            backend.set_view_rect(CLEAR_VIEW, ViewRect::full(live));
            self.size = live;
        }

        if self.quit {
            log::info!("Quit requested after {} iterations", self.iterations);
            return LoopControl::Exit;
        }

        if !self.size.is_empty() {
            self.draw::<R, W::Event, H>(backend, hooks);
        }
        LoopControl::Continue
    }

    /// Iterate until a quit event is observed.
    pub fn run<W, R, H>(&mut self, window: &mut W, backend: &mut R, hooks: &mut H)
    where
        W: Windowing,
        R: RenderBackend,
        H: FrameHooks<W::Event, R>,
    {
        while self.iterate(window, backend, hooks) == LoopControl::Continue {}
    }

    fn draw<R, E, H>(&mut self, backend: &mut R, hooks: &mut H)
    where
        R: RenderBackend,
        H: FrameHooks<E, R>,
    {
        backend.set_view_rect(CLEAR_VIEW, ViewRect::full(self.size));
        backend.touch(CLEAR_VIEW);
        hooks.draw(backend, self.size);
        backend.frame();
    }
}
