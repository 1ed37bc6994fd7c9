//! Pomodoro focus timer and session tracking.
//!
//! - [`FocusTimer`] is the phase state machine and owns the session ledger
//! - [`FocusController`] ticks it from an injected [`Scheduler`]
//! - [`FocusStorage`] persists completed sessions
//! - [`FocusReport`] summarizes history over a period

pub mod controller;
pub mod ledger;
pub mod phase;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod timer;

pub use controller::{FocusController, TICK_PERIOD};
pub use ledger::{progress_fraction, DailySummary, SessionLedger};
pub use phase::TimerPhase;
pub use report::{FocusReport, ReportPeriod};
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler, TickHandle, TickTask};
pub use session::{PomodoroSession, SessionId, DEFAULT_TASK_LABEL};
pub use storage::FocusStorage;
pub use timer::{
    format_duration, format_duration_mmss, long_break_due, parse_duration, render_progress_bar,
    Completion, FocusTimer, SessionSink, TickOutcome, TimerState,
};
