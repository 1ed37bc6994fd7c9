//! Application state for the TUI.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::config::TimerSettings;
use crate::features::focus::{
    Completion, DailySummary, FocusController, FocusTimer, ManualScheduler, PomodoroSession,
    TimerPhase, TimerState,
};

/// Number of sessions shown in the history panel.
pub const RECENT_LIMIT: usize = 5;

/// What keystrokes currently do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys control the timer.
    Normal,
    /// Keys edit the task label.
    EditingTask,
}

/// Application state.
///
/// Time only moves when [`App::advance`] is called, so the event loop is the
/// single place where ticks are delivered.
pub struct App {
    controller: FocusController<ManualScheduler>,
    clock: ManualScheduler,
    last_advance: Instant,
    day: NaiveDate,
    interval: u32,
    bell: bool,
    /// Current input mode.
    pub mode: InputMode,
    /// Task label being typed.
    pub input: String,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the terminal bell should ring on the next draw.
    pub ring_bell: bool,
}

impl App {
    /// Create a new app around `timer`.
    #[must_use]
    pub fn new(timer: FocusTimer) -> Self {
        let settings = timer.settings().clone();
        let clock = ManualScheduler::new();
        let controller = FocusController::new(timer, clock.clone());

        Self {
            controller,
            clock,
            last_advance: Instant::now(),
            day: Local::now().date_naive(),
            interval: settings.cadence(),
            bell: settings.sound_enabled,
            mode: InputMode::Normal,
            input: String::new(),
            status: Some("Press ? for help".to_string()),
            ring_bell: false,
        }
    }

    /// Deliver ticks for the wall time since the previous call.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_advance);
        self.last_advance = now;
        self.advance(elapsed);
        self.roll_over(Local::now().date_naive());
    }

    /// Start a fresh cycle once the local date has moved past the app's day.
    ///
    /// A running phase is left alone; the rollover happens after it stops.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if today == self.day || self.controller.is_running() {
            return;
        }
        self.controller.reinitialize();
        self.day = today;
        self.status = Some("New day: cycle restarted".to_string());
        info!(%today, "day rolled over");
    }

    /// Apply freshly loaded timer settings.
    pub fn reload_settings(&mut self, settings: TimerSettings) {
        self.interval = settings.cadence();
        self.bell = settings.sound_enabled;
        self.controller.update_settings(settings);
        self.status = Some("Settings reloaded".to_string());
    }

    /// Move the timer's clock forward by `elapsed` and report completions.
    pub fn advance(&mut self, elapsed: Duration) {
        self.clock.advance(elapsed);
        for completion in self.controller.take_completions() {
            self.on_completion(&completion);
        }
    }

    fn on_completion(&mut self, completion: &Completion) {
        self.status = Some(match &completion.session {
            Some(session) => format!(
                "Completed: {} ({} min). Up next: {}",
                session.task_label,
                session.duration_seconds / 60,
                completion.next.display_name()
            ),
            None => format!("Break over. Up next: {}", completion.next.display_name()),
        });
        if self.bell {
            self.ring_bell = true;
        }
    }

    /// Start if paused, pause if running.
    pub fn toggle(&mut self) {
        self.controller.toggle();
        self.status = Some(if self.controller.is_running() {
            "Running".to_string()
        } else {
            "Paused".to_string()
        });
    }

    /// Refill the current phase.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.status = Some("Reset".to_string());
    }

    /// Jump to `phase`.
    pub fn switch_mode(&mut self, phase: TimerPhase) {
        self.controller.switch_mode(phase);
        self.status = Some(format!("Switched to {}", phase.display_name()));
    }

    /// Start editing the task label, seeded with the current one.
    pub fn begin_edit(&mut self) {
        self.input = self.controller.state().task_label;
        self.mode = InputMode::EditingTask;
        self.status = Some("Enter:save | Esc:cancel".to_string());
    }

    /// Save the edited label.
    pub fn commit_edit(&mut self) {
        let label = std::mem::take(&mut self.input);
        self.controller.set_task_label(label.trim());
        self.mode = InputMode::Normal;
        self.status = Some("Task updated".to_string());
    }

    /// Drop the edited label.
    pub fn cancel_edit(&mut self) {
        self.input.clear();
        self.mode = InputMode::Normal;
        self.status = None;
    }

    /// Snapshot of the timer.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.controller.state()
    }

    /// Today's statistics.
    #[must_use]
    pub fn today(&self) -> DailySummary {
        let today = Local::now().date_naive();
        self.controller
            .with_ledger(|ledger| ledger.summary_on(today, self.interval))
    }

    /// Most recent sessions, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<PomodoroSession> {
        self.controller
            .with_ledger(|ledger| ledger.recent(RECENT_LIMIT).cloned().collect())
    }
}
