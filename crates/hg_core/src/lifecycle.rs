//! Initialize → Run → Cleanup sequencing and the process exit status.
//!
//! The winit event loop owns control flow, so startup happens inside a
//! callback and cleanup after `run_app` returns. [`Lifecycle`] keeps the
//! resource bundle between those points and guarantees cleanup runs at most
//! once, and only if startup succeeded.

use crate::error::StartupError;
use crate::frame_loop::LoopControl;

/// Release a resource. Consuming `self` makes a second release impossible.
pub trait Shutdown {
    fn shutdown(self);
}

// Tuples list resources in acquisition order and release them back to front.
impl<A: Shutdown, B: Shutdown> Shutdown for (A, B) {
    fn shutdown(self) {
        let (a, b) = self;
        b.shutdown();
        a.shutdown();
    }
}

impl<A: Shutdown, B: Shutdown, C: Shutdown> Shutdown for (A, B, C) {
    fn shutdown(self) {
        let (a, b, c) = self;
        c.shutdown();
        b.shutdown();
        a.shutdown();
    }
}

/// Process outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    StartupFailure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::StartupFailure => 1,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Holds the application's resources from startup until cleanup.
pub struct Lifecycle<P> {
    /// `None` until `start` has run `init`.
    outcome: Option<Result<P, StartupError>>,
}

impl<P: Shutdown> Lifecycle<P> {
    pub fn new() -> Self {
        Self { outcome: None }
    }

    /// Run `init` on the first call. Later calls return the outcome of the
    /// first one without running `init` again.
    pub fn start<F>(&mut self, init: F) -> Result<&mut P, &StartupError>
    where
        F: FnOnce() -> Result<P, StartupError>,
    {
        let outcome = self.outcome.get_or_insert_with(|| {
            init().inspect_err(|err| log::error!("Startup failed: {err}"))
        });
        outcome.as_mut().map_err(|err| &*err)
    }

    pub fn running_mut(&mut self) -> Option<&mut P> {
        self.outcome.as_mut()?.as_mut().ok()
    }

    pub fn failure(&self) -> Option<&StartupError> {
        self.outcome.as_ref()?.as_ref().err()
    }

    /// Release everything acquired by `start` and report the exit status.
    pub fn finish(self) -> ExitStatus {
        match self.outcome {
            Some(Ok(parts)) => {
                log::info!("Shutting down");
                parts.shutdown();
                ExitStatus::Success
            }
            Some(Err(_)) => ExitStatus::StartupFailure,
            None => {
                log::warn!("Event loop ended before startup ran");
                ExitStatus::Success
            }
        }
    }
}

impl<P: Shutdown> Default for Lifecycle<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking driver for callers that own their loop: initialize, call `step`
/// until it returns [`LoopControl::Exit`], then clean up.
pub fn run_to_completion<P, I, S>(init: I, mut step: S) -> ExitStatus
where
    P: Shutdown,
    I: FnOnce() -> Result<P, StartupError>,
    S: FnMut(&mut P) -> LoopControl,
{
    let mut lifecycle = Lifecycle::new();
    if let Ok(parts) = lifecycle.start(init) {
        while step(&mut *parts) == LoopControl::Continue {}
    }
    lifecycle.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_loop::tests::{CountingHooks, Ev, RecordingBackend, ScriptedWindow};
    use crate::frame_loop::FrameLoop;
    use crate::view::{Extent, ResetFlags};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<&'static str>>>;

    struct Tracked {
        name: &'static str,
        journal: Journal,
    }

    impl Shutdown for Tracked {
        fn shutdown(self) {
            self.journal.borrow_mut().push(self.name);
        }
    }

    fn tracked(name: &'static str, journal: &Journal) -> Tracked {
        journal.borrow_mut().push(name);
        Tracked {
            name,
            journal: journal.clone(),
        }
    }

    fn acquire_all(journal: &Journal) -> (Tracked, Tracked, Tracked) {
        (
            tracked("window", journal),
            tracked("backend", journal),
            tracked("ui", journal),
        )
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::StartupFailure.code(), 1);
    }

    #[test]
    fn cleanup_releases_in_reverse_acquisition_order() {
        let journal: Journal = Rc::default();
        let status = run_to_completion(|| Ok(acquire_all(&journal)), |_| LoopControl::Exit);

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(
            *journal.borrow(),
            vec!["window", "backend", "ui", "ui", "backend", "window"]
        );
    }

    #[test]
    fn startup_failure_skips_run_and_cleanup() {
        let journal: Journal = Rc::default();
        let mut steps = 0;
        let status = run_to_completion(
            || -> Result<(Tracked, Tracked, Tracked), StartupError> {
                Err(StartupError::Device("forced".into()))
            },
            |_| {
                steps += 1;
                LoopControl::Continue
            },
        );

        assert_eq!(status, ExitStatus::StartupFailure);
        assert_eq!(steps, 0);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn start_runs_init_only_once() {
        let journal: Journal = Rc::default();
        let mut lifecycle = Lifecycle::new();
        let mut inits = 0;
        for _ in 0..3 {
            let started = lifecycle.start(|| {
                inits += 1;
                Ok(acquire_all(&journal))
            });
            assert!(started.is_ok());
        }
        assert_eq!(inits, 1);
        assert!(lifecycle.running_mut().is_some());
        assert_eq!(lifecycle.finish(), ExitStatus::Success);
        assert_eq!(journal.borrow().len(), 6);
    }

    #[test]
    fn failed_start_is_remembered() {
        let mut lifecycle: Lifecycle<Tracked> = Lifecycle::new();
        assert!(lifecycle
            .start(|| Err(StartupError::Window("no display".into())))
            .is_err());
        assert!(lifecycle.start(|| unreachable!()).is_err());
        assert!(lifecycle.running_mut().is_none());
        assert!(lifecycle.failure().is_some());
        assert_eq!(lifecycle.finish(), ExitStatus::StartupFailure);
    }

    #[test]
    fn nothing_is_running_or_failed_before_start() {
        let mut lifecycle: Lifecycle<Tracked> = Lifecycle::new();
        assert!(lifecycle.running_mut().is_none());
        assert!(lifecycle.failure().is_none());

        let journal: Journal = Rc::default();
        let started = lifecycle.start(|| Ok(tracked("window", &journal)));
        assert_eq!(started.map(|parts| parts.name).ok(), Some("window"));
        assert!(lifecycle.failure().is_none());
    }

    #[test]
    fn finish_without_start_is_success() {
        let lifecycle: Lifecycle<Tracked> = Lifecycle::new();
        assert_eq!(lifecycle.finish(), ExitStatus::Success);
    }

    struct LoopParts {
        frame_loop: FrameLoop,
        window: ScriptedWindow,
        backend: RecordingBackend,
        hooks: CountingHooks,
        cleanups: Rc<RefCell<u32>>,
    }

    impl Shutdown for LoopParts {
        fn shutdown(self) {
            *self.cleanups.borrow_mut() += 1;
        }
    }

    #[test]
    fn five_frames_then_quit_exits_cleanly_with_one_cleanup() {
        let size = Extent::new(1024, 768);
        let cleanups = Rc::new(RefCell::new(0));
        let presents = Rc::new(RefCell::new(0));
        let resets = Rc::new(RefCell::new(0));

        let status = run_to_completion(
            || {
                let mut batches = vec![Vec::new(); 5];
                batches.push(vec![Ev::Quit]);
                Ok(LoopParts {
                    frame_loop: FrameLoop::new(size, ResetFlags::VSYNC),
                    window: ScriptedWindow::new(size, batches),
                    backend: RecordingBackend::default(),
                    hooks: CountingHooks::default(),
                    cleanups: cleanups.clone(),
                })
            },
            |parts: &mut LoopParts| {
                let control = parts.frame_loop.iterate(
                    &mut parts.window,
                    &mut parts.backend,
                    &mut parts.hooks,
                );
                *presents.borrow_mut() = parts.backend.presents();
                *resets.borrow_mut() = parts.backend.resets().len();
                control
            },
        );

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(*presents.borrow(), 5);
        assert_eq!(*resets.borrow(), 0);
        assert_eq!(*cleanups.borrow(), 1);
    }
}
