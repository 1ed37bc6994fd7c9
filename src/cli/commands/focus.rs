//! Focus timer command implementation.
//!
//! Handles the headless timer and session history commands.

use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::Local;
use colored::Colorize;
use tracing::{debug, info};

use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::Config;
use crate::error::FocusError;
use crate::features::focus::{
    format_duration, Completion, FocusController, FocusReport, FocusStorage, PomodoroSession,
    ReportPeriod, Scheduler, SessionLedger, ThreadScheduler, TimerPhase,
};
use crate::output::{format_report, format_sessions, format_state_pretty, format_summary, to_json};

/// How often the headless timer redraws its status line.
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Run the timer in the foreground until `args.cycles` focus sessions complete.
///
/// # Errors
///
/// Returns an error if the phase is unknown or storage fails.
pub fn run(config: &Config, args: &RunArgs, format: OutputFormat) -> Result<String, FocusError> {
    let first: TimerPhase = args.phase.parse()?;
    let storage = FocusStorage::new()?;
    let bell = config.timer.sound_enabled;

    let mut timer = storage.into_timer(config.timer.clone())?;
    timer.switch_mode(first);
    let mut controller = FocusController::new(timer, ThreadScheduler::new());
    if let Some(task) = &args.task {
        controller.set_task_label(task.as_str());
    }

    info!(phase = %first, cycles = args.cycles, "headless run started");

    let completions = drive(
        &mut controller,
        first,
        args.cycles,
        |controller| {
            thread::sleep(REDRAW_INTERVAL);
            if format == OutputFormat::Pretty {
                let line = format_state_pretty(&controller.state());
                print!("\r\x1b[2K{line}");
                let _ = std::io::stdout().flush();
            }
        },
        |completion| {
            if format == OutputFormat::Pretty {
                println!("\r\x1b[2K{}", completion_message(completion));
            }
            if bell {
                eprint!("\x07");
            }
        },
    );

    let sessions: Vec<PomodoroSession> = completions.into_iter().filter_map(|c| c.session).collect();

    match format {
        OutputFormat::Json => to_json(&sessions),
        OutputFormat::Pretty => {
            let seconds: u32 = sessions.iter().map(|s| s.duration_seconds).sum();
            Ok(format!(
                "Done: {} focus session{} ({})",
                sessions.len(),
                if sessions.len() == 1 { "" } else { "s" },
                format_duration(chrono::Duration::seconds(i64::from(seconds)))
            ))
        }
    }
}

/// Keep the timer running until enough focus sessions have completed.
///
/// `wait` is called between checks and is where time passes. A run that
/// starts in a break stops when that break ends.
fn drive<S: Scheduler>(
    controller: &mut FocusController<S>,
    first: TimerPhase,
    cycles: u32,
    mut wait: impl FnMut(&FocusController<S>),
    mut on_complete: impl FnMut(&Completion),
) -> Vec<Completion> {
    let mut done = Vec::new();
    let mut work_done = 0;

    controller.start();
    loop {
        wait(controller);

        for completion in controller.take_completions() {
            on_complete(&completion);
            if completion.finished == TimerPhase::Work {
                work_done += 1;
            }
            done.push(completion);
        }

        let finished = if first.is_break() {
            !done.is_empty()
        } else {
            work_done >= cycles
        };
        if finished {
            controller.pause();
            return done;
        }

        if !controller.is_running() {
            debug!(phase = %controller.state().phase, "starting next phase");
            controller.start();
        }
    }
}

fn completion_message(completion: &Completion) -> String {
    let next = completion.next.display_name();
    match &completion.session {
        Some(session) => format!(
            "✅ {} done: {} ({} min). Next: {}",
            completion.finished.display_name(),
            session.task_label.bold(),
            session.duration_seconds / 60,
            next
        )
        .green()
        .to_string(),
        None => format!("☕ {} over. Next: {}", completion.finished.display_name(), next),
    }
}

/// Show today's progress.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn status(config: &Config, format: OutputFormat) -> Result<String, FocusError> {
    let storage = FocusStorage::new()?;
    let today = Local::now().date_naive();

    let ledger = SessionLedger::with_history(storage.get_on(today)?);
    let summary = ledger.summary_on(today, config.timer.cadence());
    format_summary(&summary, format)
}

/// Show recent sessions.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn history(limit: usize, format: OutputFormat) -> Result<String, FocusError> {
    let storage = FocusStorage::new()?;
    let sessions = storage.get_recent(limit)?;
    format_sessions(&sessions, "History", format)
}

/// Generate a focus report.
///
/// # Errors
///
/// Returns an error if the period is unknown or storage cannot be read.
pub fn report(period: &str, format: OutputFormat) -> Result<String, FocusError> {
    let period: ReportPeriod = period.parse()?;
    let storage = FocusStorage::new()?;
    let report = FocusReport::generate(&storage, period)?;
    format_report(&report, format)
}

/// Delete all recorded sessions.
///
/// # Errors
///
/// Returns an error without `force`, or if the delete fails.
pub fn clear(force: bool, format: OutputFormat) -> Result<String, FocusError> {
    if !force {
        return Err(FocusError::Config(
            "This will delete all focus session history.\nUse --force to confirm.".to_string(),
        ));
    }

    let storage = FocusStorage::new()?;
    let removed = storage.clear()?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "removed": removed })),
        OutputFormat::Pretty => Ok(format!("Removed {removed} sessions.")),
    }
}
