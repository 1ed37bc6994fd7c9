//! The focus timer state machine.
//!
//! [`FocusTimer`] owns the one authoritative timer state, runs the
//! completion policy when a countdown expires, and keeps the session
//! ledger and completion counter. It is purely synchronous: something
//! else (see [`super::controller`]) decides when `tick` is called.

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ledger::{progress_fraction, SessionLedger};
use super::phase::TimerPhase;
use super::session::PomodoroSession;
use crate::config::TimerSettings;
use crate::error::FocusError;

/// Receiver for sessions appended to the ledger.
///
/// The ledger in memory stays authoritative; a sink only mirrors it
/// somewhere durable.
#[cfg_attr(test, mockall::automock)]
pub trait SessionSink {
    /// Store one session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session could not be stored.
    fn record(&mut self, session: &PomodoroSession) -> Result<(), FocusError>;
}

/// Read-only snapshot of the timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Full length of the current phase in seconds
    pub duration_seconds: u32,
    /// Whether the countdown is running
    pub is_running: bool,
    /// What the user is working on
    pub task_label: String,
    /// Work phases completed since the timer was created or reinitialized
    pub completed_count: u32,
}

impl TimerState {
    /// Get progress through the current phase (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_fraction(self.duration_seconds, self.remaining_seconds)
    }

    /// Format remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_duration_mmss(Duration::seconds(i64::from(self.remaining_seconds)))
    }
}

/// What a single call to [`FocusTimer::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The timer wasn't running; nothing changed.
    Idle,
    /// One second elapsed.
    Ticked {
        /// Seconds left after this tick
        remaining: u32,
    },
    /// The countdown reached zero and the completion policy ran.
    Completed(Completion),
}

/// Result of the completion policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Phase that just ended
    pub finished: TimerPhase,
    /// Phase the timer switched to
    pub next: TimerPhase,
    /// Ledger entry appended, for work phases
    pub session: Option<PomodoroSession>,
}

/// Whether the `completed`-th work phase earns a long break.
#[must_use]
pub const fn long_break_due(completed: u32, interval: u32) -> bool {
    let interval = if interval == 0 { 1 } else { interval };
    completed > 0 && completed % interval == 0
}

/// Pomodoro timer with session accounting.
pub struct FocusTimer {
    settings: TimerSettings,
    phase: TimerPhase,
    remaining_seconds: u32,
    is_running: bool,
    task_label: String,
    completed_count: u32,
    ledger: SessionLedger,
    sink: Option<Box<dyn SessionSink + Send>>,
    completions: Vec<Completion>,
}

impl std::fmt::Debug for FocusTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusTimer")
            .field("phase", &self.phase)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("is_running", &self.is_running)
            .field("completed_count", &self.completed_count)
            .field("ledger_len", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

impl FocusTimer {
    /// Create a timer at the start of a work phase, paused.
    #[must_use]
    pub fn new(settings: TimerSettings) -> Self {
        Self::with_ledger(settings, SessionLedger::new())
    }

    /// Create a timer on top of an existing ledger.
    ///
    /// The completion counter starts at zero regardless of history.
    #[must_use]
    pub fn with_ledger(settings: TimerSettings, ledger: SessionLedger) -> Self {
        let settings = settings.sanitized();
        let remaining_seconds = settings.duration(TimerPhase::Work);
        Self {
            settings,
            phase: TimerPhase::Work,
            remaining_seconds,
            is_running: false,
            task_label: String::new(),
            completed_count: 0,
            ledger,
            sink: None,
            completions: Vec::new(),
        }
    }

    /// Mirror every appended session into `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn SessionSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Start or resume the countdown.
    ///
    /// A finished countdown is refilled first.
    pub fn start(&mut self) {
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.duration();
        }
        if !self.is_running {
            debug!(phase = ?self.phase, remaining = self.remaining_seconds, "timer started");
        }
        self.is_running = true;
    }

    /// Pause the countdown, keeping the remaining time.
    pub fn pause(&mut self) {
        if self.is_running {
            debug!(phase = ?self.phase, remaining = self.remaining_seconds, "timer paused");
        }
        self.is_running = false;
    }

    /// Stop and refill the current phase.
    ///
    /// Unfinished work is dropped without a ledger entry.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.remaining_seconds = self.duration();
        debug!(phase = ?self.phase, "timer reset");
    }

    /// Jump to `phase`, stopped and full.
    pub fn switch_mode(&mut self, phase: TimerPhase) {
        self.phase = phase;
        self.remaining_seconds = self.duration();
        self.is_running = false;
        debug!(?phase, remaining = self.remaining_seconds, "switched phase");
    }

    /// Set the label recorded with the next completed work phase.
    pub fn set_task_label(&mut self, label: impl Into<String>) {
        self.task_label = label.into();
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        if self.remaining_seconds == 0 {
            self.is_running = false;
            return TickOutcome::Idle;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds > 0 {
            return TickOutcome::Ticked {
                remaining: self.remaining_seconds,
            };
        }

        self.is_running = false;
        let completion = self.complete_phase();
        self.completions.push(completion.clone());
        TickOutcome::Completed(completion)
    }

    /// Run the completion policy for the phase that just expired.
    fn complete_phase(&mut self) -> Completion {
        let finished = self.phase;
        let (next, session) = match finished {
            TimerPhase::Work => {
                let session =
                    PomodoroSession::completed(self.settings.duration(TimerPhase::Work), &self.task_label);
                self.completed_count += 1;
                self.record(session.clone());

                let next = if long_break_due(self.completed_count, self.settings.cadence()) {
                    TimerPhase::LongBreak
                } else {
                    TimerPhase::ShortBreak
                };
                (next, Some(session))
            }
            TimerPhase::ShortBreak | TimerPhase::LongBreak => (TimerPhase::Work, None),
        };

        self.task_label.clear();
        self.switch_mode(next);
        info!(
            ?finished,
            ?next,
            completed = self.completed_count,
            "phase completed"
        );

        Completion {
            finished,
            next,
            session,
        }
    }

    fn record(&mut self, session: PomodoroSession) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.record(&session) {
                warn!(id = %session.id, error = %e, "failed to persist session");
            }
        }
        self.ledger.append(session);
    }

    /// Replace the settings.
    ///
    /// A phase that hasn't started picks up its new length; otherwise the
    /// remaining time is only shortened if it no longer fits.
    pub fn update_settings(&mut self, settings: TimerSettings) {
        let untouched = !self.is_running && self.remaining_seconds == self.duration();
        self.settings = settings.sanitized();
        let duration = self.duration();
        if untouched {
            self.remaining_seconds = duration;
        } else {
            self.remaining_seconds = self.remaining_seconds.min(duration);
        }
        if self.remaining_seconds == 0 {
            self.is_running = false;
        }
    }

    /// Start a fresh cycle: counter back to zero, stopped at a full work phase.
    ///
    /// The ledger is kept.
    pub fn reinitialize(&mut self) {
        self.completed_count = 0;
        self.task_label.clear();
        self.switch_mode(TimerPhase::Work);
        info!("timer reinitialized");
    }

    /// Drain the completions since the last call.
    pub fn take_completions(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completions)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        TimerState {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            duration_seconds: self.duration(),
            is_running: self.is_running,
            task_label: self.task_label.clone(),
            completed_count: self.completed_count,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Check if the countdown is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Work phases completed since creation or the last reinitialize.
    #[must_use]
    pub const fn completed_count(&self) -> u32 {
        self.completed_count
    }

    /// Current task label.
    #[must_use]
    pub fn task_label(&self) -> &str {
        &self.task_label
    }

    /// Length of the current phase in seconds.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.settings.duration(self.phase)
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// The session ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    /// Progress through the current phase (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_fraction(self.duration(), self.remaining_seconds)
    }
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Parse a duration string like "25m", "1h30m", "90s".
///
/// A bare number is read as minutes.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return (minutes > 0).then(|| Duration::try_minutes(minutes)).flatten();
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        }
    }

    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    (total_seconds > 0)
        .then(|| Duration::try_seconds(total_seconds))
        .flatten()
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width - filled;

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::function;

    fn settings(interval: u32) -> TimerSettings {
        TimerSettings {
            long_break_interval: interval,
            ..TimerSettings::default()
        }
    }

    /// Tick until the current phase completes.
    fn run_out(timer: &mut FocusTimer) -> Completion {
        timer.start();
        loop {
            if let TickOutcome::Completed(completion) = timer.tick() {
                return completion;
            }
        }
    }

    /// Tick a running timer down to `seconds` remaining.
    fn run_down_to(timer: &mut FocusTimer, seconds: u32) {
        timer.start();
        while timer.remaining_seconds() > seconds {
            timer.tick();
        }
    }

    #[test]
    fn test_new_timer() {
        let timer = FocusTimer::new(TimerSettings::default());
        let state = timer.state();
        assert_eq!(state.phase, TimerPhase::Work);
        assert_eq!(state.remaining_seconds, 25 * 60);
        assert!(!state.is_running);
        assert_eq!(state.completed_count, 0);
        assert!(timer.ledger().is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.start();
        timer.tick();
        timer.start();
        assert!(timer.is_running());
        assert_eq!(timer.remaining_seconds(), 1499);
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.start();
        timer.tick();
        timer.tick();
        timer.pause();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_seconds(), 1498);

        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining_seconds(), 1498);

        timer.pause();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_switch_mode_fills_phase_and_stops() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        for phase in TimerPhase::ALL {
            timer.start();
            timer.tick();
            timer.switch_mode(phase);
            assert_eq!(timer.phase(), phase);
            assert_eq!(timer.remaining_seconds(), timer.settings().duration(phase));
            assert!(!timer.is_running());
        }
    }

    #[test]
    fn test_switch_mode_any_order() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.switch_mode(TimerPhase::LongBreak);
        assert_eq!(timer.remaining_seconds(), 15 * 60);
        timer.switch_mode(TimerPhase::ShortBreak);
        assert_eq!(timer.remaining_seconds(), 5 * 60);
        assert_eq!(timer.completed_count(), 0);
    }

    #[test]
    fn test_three_ticks_from_three_seconds_completes_work() {
        let mut timer = FocusTimer::new(settings(4));
        run_down_to(&mut timer, 3);
        let before = timer.ledger().len();

        assert_eq!(timer.tick(), TickOutcome::Ticked { remaining: 2 });
        assert_eq!(timer.tick(), TickOutcome::Ticked { remaining: 1 });
        let outcome = timer.tick();

        assert!(matches!(outcome, TickOutcome::Completed(ref c) if c.finished == TimerPhase::Work));
        assert!(!timer.is_running());
        assert_eq!(timer.ledger().len(), before + 1);
        assert_eq!(timer.phase(), TimerPhase::ShortBreak);
        assert_eq!(timer.remaining_seconds(), 5 * 60);
    }

    #[test]
    fn test_tick_never_goes_negative() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        run_out(&mut timer);
        for _ in 0..5 {
            assert_eq!(timer.tick(), TickOutcome::Idle);
        }
        assert_eq!(timer.remaining_seconds(), 5 * 60);
    }

    #[test]
    fn test_work_completion_records_session() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.set_task_label("Calculus");
        let completion = run_out(&mut timer);

        let session = completion.session.unwrap();
        assert_eq!(session.duration_seconds, 1500);
        assert!(session.was_completed);
        assert_eq!(session.task_label, "Calculus");
        assert_eq!(timer.ledger().entries(), [session]);
        assert_eq!(timer.task_label(), "");
    }

    #[test]
    fn test_work_completion_default_label() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        let completion = run_out(&mut timer);
        assert_eq!(completion.session.unwrap().task_label, "Focus Session");
    }

    #[test]
    fn test_break_completion_returns_to_work_without_entry() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.switch_mode(TimerPhase::ShortBreak);
        timer.set_task_label("leftover");
        let completion = run_out(&mut timer);

        assert_eq!(completion.next, TimerPhase::Work);
        assert!(completion.session.is_none());
        assert!(timer.ledger().is_empty());
        assert_eq!(timer.completed_count(), 0);
        assert_eq!(timer.task_label(), "");
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn test_long_break_cadence() {
        let mut timer = FocusTimer::new(settings(4));

        for n in 1..=4 {
            assert_eq!(timer.phase(), TimerPhase::Work);
            let completion = run_out(&mut timer);
            assert_eq!(timer.completed_count(), n);
            if n < 4 {
                assert_eq!(completion.next, TimerPhase::ShortBreak);
                assert_eq!(timer.phase(), TimerPhase::ShortBreak);
                timer.switch_mode(TimerPhase::Work);
            }
        }

        assert_eq!(timer.phase(), TimerPhase::LongBreak);
        assert_eq!(timer.completed_count(), 4);
        assert_eq!(timer.ledger().len(), 4);
    }

    #[test]
    fn test_long_break_due() {
        assert!(!long_break_due(0, 4));
        assert!(!long_break_due(3, 4));
        assert!(long_break_due(4, 4));
        assert!(long_break_due(8, 4));
        assert!(long_break_due(1, 1));
        assert!(long_break_due(2, 0));
    }

    #[test]
    fn test_pause_then_reset_discards_work() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        run_down_to(&mut timer, 10);
        timer.pause();
        timer.reset();

        assert_eq!(timer.remaining_seconds(), 1500);
        assert!(!timer.is_running());
        assert!(timer.ledger().is_empty());
        assert_eq!(timer.completed_count(), 0);
    }

    #[test]
    fn test_mode_switch_keeps_counter() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        run_out(&mut timer);
        timer.switch_mode(TimerPhase::Work);
        timer.switch_mode(TimerPhase::LongBreak);
        assert_eq!(timer.completed_count(), 1);
    }

    #[test]
    fn test_reinitialize_resets_counter_keeps_ledger() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        run_out(&mut timer);
        timer.reinitialize();

        assert_eq!(timer.completed_count(), 0);
        assert_eq!(timer.phase(), TimerPhase::Work);
        assert_eq!(timer.ledger().len(), 1);
    }

    #[test]
    fn test_take_completions_drains() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        run_out(&mut timer);
        run_out(&mut timer);

        let completions = timer.take_completions();
        assert_eq!(completions.len(), 2);
        assert_eq!(completions[0].finished, TimerPhase::Work);
        assert_eq!(completions[1].finished, TimerPhase::ShortBreak);
        assert!(timer.take_completions().is_empty());
    }

    #[test]
    fn test_update_settings_fresh_phase() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.update_settings(TimerSettings {
            work_minutes: 50,
            ..TimerSettings::default()
        });
        assert_eq!(timer.remaining_seconds(), 3000);
    }

    #[test]
    fn test_update_settings_clamps_running_phase() {
        let mut timer = FocusTimer::new(TimerSettings::default());
        timer.start();
        timer.tick();
        timer.update_settings(TimerSettings {
            work_minutes: 10,
            ..TimerSettings::default()
        });
        assert_eq!(timer.remaining_seconds(), 600);
        assert!(timer.is_running());
    }

    #[test]
    fn test_sink_receives_each_work_session() {
        let mut sink = MockSessionSink::new();
        sink.expect_record()
            .with(function(|s: &PomodoroSession| s.task_label == "Physics"))
            .times(1)
            .returning(|_| Ok(()));

        let mut timer = FocusTimer::new(TimerSettings::default()).with_sink(Box::new(sink));
        timer.set_task_label("Physics");
        run_out(&mut timer);
        run_out(&mut timer);
    }

    #[test]
    fn test_sink_failure_keeps_ledger() {
        let mut sink = MockSessionSink::new();
        sink.expect_record()
            .times(1)
            .returning(|_| Err(FocusError::Database("disk full".to_string())));

        let mut timer = FocusTimer::new(TimerSettings::default()).with_sink(Box::new(sink));
        run_out(&mut timer);
        assert_eq!(timer.ledger().len(), 1);
    }

    #[test]
    fn test_state_progress() {
        let mut timer = FocusTimer::new(TimerSettings {
            short_break_minutes: 1,
            ..TimerSettings::default()
        });
        timer.switch_mode(TimerPhase::ShortBreak);
        run_down_to(&mut timer, 30);
        let state = timer.state();
        assert!((state.progress() - 0.5).abs() < 0.01);
        assert_eq!(state.format_remaining(), "00:30");
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("25"), Some(Duration::minutes(25)));
        assert_eq!(parse_duration("25m"), Some(Duration::minutes(25)));
    }

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration("1h"), Some(Duration::hours(1)));
        assert_eq!(parse_duration("2h30m"), Some(Duration::minutes(150)));
    }

    #[test]
    fn test_parse_duration_seconds() {
        assert_eq!(parse_duration("90s"), Some(Duration::seconds(90)));
        assert_eq!(parse_duration("1m 30s"), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("0").is_none());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("999999999999999").is_none());
        assert!(parse_duration("99999999999999h").is_none());
        assert!(parse_duration("9223372036854775807h").is_none());
        assert!(parse_duration("1h9223372036854775807s").is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(25)), "25 minutes");
        assert_eq!(format_duration(Duration::minutes(1)), "1 minute");
        assert_eq!(format_duration(Duration::hours(2)), "2 hours");
        assert_eq!(format_duration(Duration::minutes(90)), "1 hour, 30 minutes");
    }

    #[test]
    fn test_format_duration_mmss() {
        assert_eq!(format_duration_mmss(Duration::minutes(25)), "25:00");
        assert_eq!(format_duration_mmss(Duration::seconds(90)), "01:30");
        assert_eq!(format_duration_mmss(Duration::seconds(0)), "00:00");
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(0.5, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
        assert_eq!(render_progress_bar(2.0, 4), "[████]");
    }
}
