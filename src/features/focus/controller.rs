//! Drives a [`FocusTimer`] from a [`Scheduler`].
//!
//! The timer lives behind one mutex. User operations and the tick task
//! both take it, so a tick can never interleave with `start`, `pause`,
//! `reset` or `switch_mode`. The tick task re-checks its cancellation
//! flag while holding the lock: once `pause` returns, no further tick
//! reaches the timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::ledger::SessionLedger;
use super::phase::TimerPhase;
use super::scheduler::{Scheduler, TickHandle};
use super::timer::{Completion, FocusTimer, TimerState};
use crate::config::TimerSettings;

/// Cadence of the tick source.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A focus timer wired to a tick source.
pub struct FocusController<S: Scheduler> {
    timer: Arc<Mutex<FocusTimer>>,
    scheduler: S,
    tick_source: Option<TickHandle>,
}

impl<S: Scheduler> FocusController<S> {
    /// Wrap `timer`, ticking it through `scheduler` while it runs.
    pub fn new(timer: FocusTimer, scheduler: S) -> Self {
        Self {
            timer: Arc::new(Mutex::new(timer)),
            scheduler,
            tick_source: None,
        }
    }

    /// Start or resume the countdown and make sure a tick source is active.
    pub fn start(&mut self) {
        lock(&self.timer).start();

        if self.tick_source.as_ref().is_some_and(|h| !h.is_cancelled()) {
            return;
        }

        let timer = Arc::clone(&self.timer);
        let handle = self.scheduler.schedule(
            TICK_PERIOD,
            Box::new(move |handle: &TickHandle| {
                let mut timer = lock(&timer);
                if handle.is_cancelled() {
                    return;
                }
                timer.tick();
                if !timer.is_running() {
                    handle.cancel();
                }
            }),
        );
        debug!("tick source scheduled");
        self.tick_source = Some(handle);
    }

    /// Pause the countdown and stop the tick source.
    pub fn pause(&mut self) {
        let mut timer = lock(&self.timer);
        timer.pause();
        Self::cancel_tick_source(&mut self.tick_source);
    }

    /// Start if paused, pause if running.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and refill the current phase.
    pub fn reset(&mut self) {
        let mut timer = lock(&self.timer);
        timer.reset();
        Self::cancel_tick_source(&mut self.tick_source);
    }

    /// Jump to `phase`, stopped and full.
    pub fn switch_mode(&mut self, phase: TimerPhase) {
        let mut timer = lock(&self.timer);
        timer.switch_mode(phase);
        Self::cancel_tick_source(&mut self.tick_source);
    }

    /// Set the label for the current work phase.
    pub fn set_task_label(&self, label: impl Into<String>) {
        lock(&self.timer).set_task_label(label);
    }

    /// Replace the timer settings.
    pub fn update_settings(&self, settings: TimerSettings) {
        lock(&self.timer).update_settings(settings);
    }

    /// Start a fresh cycle, keeping the ledger.
    pub fn reinitialize(&mut self) {
        let mut timer = lock(&self.timer);
        timer.reinitialize();
        Self::cancel_tick_source(&mut self.tick_source);
    }

    fn cancel_tick_source(tick_source: &mut Option<TickHandle>) {
        if let Some(handle) = tick_source.take() {
            handle.cancel();
            debug!("tick source cancelled");
        }
    }

    /// Check whether the countdown is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.timer).is_running()
    }

    /// Check whether a tick source is currently scheduled.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.tick_source.as_ref().is_some_and(|h| !h.is_cancelled())
    }

    /// Snapshot of the timer state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        lock(&self.timer).state()
    }

    /// Drain completions since the last call.
    pub fn take_completions(&self) -> Vec<Completion> {
        lock(&self.timer).take_completions()
    }

    /// Read the ledger under the lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&SessionLedger) -> R) -> R {
        f(lock(&self.timer).ledger())
    }

    /// The scheduler driving this controller.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: Scheduler> Drop for FocusController<S> {
    fn drop(&mut self) {
        Self::cancel_tick_source(&mut self.tick_source);
    }
}

fn lock(timer: &Mutex<FocusTimer>) -> MutexGuard<'_, FocusTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}
