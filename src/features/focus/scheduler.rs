//! Tick sources for the focus timer.
//!
//! A [`Scheduler`] runs a task at a fixed period until the returned
//! [`TickHandle`] is cancelled. Two implementations:
//! - [`ThreadScheduler`] fires from a background thread in real time.
//! - [`ManualScheduler`] fires only when the owner calls
//!   [`ManualScheduler::advance`], so an event loop (or a test) decides
//!   when time passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

/// Shortest period a scheduler accepts.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Task run on every tick. It receives its own handle so it can stop itself.
pub type TickTask = Box<dyn FnMut(&TickHandle) + Send>;

/// Cancellation handle for a scheduled task.
///
/// Clones share the same flag. Once cancelled, the task is never run again.
#[derive(Debug, Clone, Default)]
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    /// Create a live handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop future runs of the task.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether the task has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Something that can run a task at a fixed period.
pub trait Scheduler {
    /// Run `task` every `period` until the returned handle is cancelled.
    fn schedule(&self, period: Duration, task: TickTask) -> TickHandle;
}

/// Real-time scheduler backed by one thread per scheduled task.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl ThreadScheduler {
    /// Create a scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, period: Duration, mut task: TickTask) -> TickHandle {
        let period = period.max(MIN_PERIOD);
        let handle = TickHandle::new();
        let thread_handle = handle.clone();

        let spawned = thread::Builder::new()
            .name("focusdeck-tick".to_string())
            .spawn(move || {
                let mut next = Instant::now() + period;
                loop {
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    }
                    if thread_handle.is_cancelled() {
                        break;
                    }
                    task(&thread_handle);
                    next += period;
                }
                debug!("tick thread stopped");
            });

        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn tick thread");
            handle.cancel();
        }

        handle
    }
}

struct ScheduledTask {
    period: Duration,
    next_due: Duration,
    handle: TickHandle,
    task: TickTask,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    tasks: Vec<ScheduledTask>,
}

/// Scheduler driven by explicit calls to [`advance`](Self::advance).
///
/// Clones share the same clock and task list, so one clone can be handed
/// to a controller while the event loop keeps another to step time.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("active", &self.active())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler at time zero with no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this scheduler's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks that haven't been cancelled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.lock()
            .tasks
            .iter()
            .filter(|t| !t.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward, running every task that comes due, in order.
    ///
    /// Returns the number of task runs. Tasks run without the internal lock
    /// held, so they may schedule or cancel other tasks.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut fired = 0;

        loop {
            let mut due = {
                let mut clock = self.lock();
                clock.tasks.retain(|t| !t.handle.is_cancelled());
                let next = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.next_due <= target)
                    .min_by_key(|(_, t)| t.next_due)
                    .map(|(i, _)| i);
                let Some(index) = next else {
                    clock.now = target;
                    break;
                };
                let task = clock.tasks.swap_remove(index);
                clock.now = task.next_due;
                task
            };

            if !due.handle.is_cancelled() {
                (due.task)(&due.handle);
                fired += 1;
            }
            due.next_due += due.period;

            if !due.handle.is_cancelled() {
                self.lock().tasks.push(due);
            }
        }

        fired
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, period: Duration, task: TickTask) -> TickHandle {
        let period = period.max(MIN_PERIOD);
        let handle = TickHandle::new();
        let mut clock = self.lock();
        let next_due = clock.now + period;
        clock.tasks.push(ScheduledTask {
            period,
            next_due,
            handle: handle.clone(),
            task,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(count: &Arc<AtomicUsize>) -> TickTask {
        let count = Arc::clone(count);
        Box::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_fires_on_period() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule(Duration::from_secs(1), counter_task(&count));

        assert_eq!(scheduler.advance(Duration::from_millis(999)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(3)), 3);
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(scheduler.now(), Duration::from_secs(4));
    }

    #[test]
    fn test_manual_cancel_stops_task() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(Duration::from_secs(1), counter_task(&count));

        scheduler.advance(Duration::from_secs(2));
        handle.cancel();
        scheduler.advance(Duration::from_secs(5));

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_manual_task_can_cancel_itself() {
        let scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let _handle = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move |handle| {
                if inner.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                    handle.cancel();
                }
            }),
        );

        scheduler.advance(Duration::from_secs(10));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_manual_clones_share_clock() {
        let scheduler = ManualScheduler::new();
        let stepper = scheduler.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule(Duration::from_secs(1), counter_task(&count));

        stepper.advance(Duration::from_secs(2));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active(), 1);
    }

    #[test]
    fn test_thread_scheduler_ticks_and_cancels() {
        let scheduler = ThreadScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(Duration::from_millis(10), counter_task(&count));

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        handle.cancel();
        thread::sleep(Duration::from_millis(30));
        let after_cancel = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));

        assert!(after_cancel >= 3);
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }
}
