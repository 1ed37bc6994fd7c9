use chrono::Duration;
use colored::Colorize;

use crate::features::focus::{
    format_duration, render_progress_bar, DailySummary, PomodoroSession, TimerPhase, TimerState,
};

/// Format a list of sessions as a pretty table
pub fn format_sessions_pretty(sessions: &[PomodoroSession], title: &str) -> String {
    if sessions.is_empty() {
        return format!("{} (0 sessions)\n  No sessions yet", title);
    }

    let mut output = format!("{} ({} sessions)\n", title, sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let status_icon = if session.was_completed {
            "[x]".green()
        } else {
            "[-]".red()
        };

        let when = session.completed_at_local().format("%Y-%m-%d %H:%M");
        let minutes = format!("{:>3}m", session.duration_seconds / 60);

        output.push_str(&format!(
            "{} {}  {}  {}\n",
            status_icon,
            when.to_string().dimmed(),
            minutes.yellow(),
            session.task_label.bold()
        ));
    }

    output
}

/// Format a day summary as pretty output
pub fn format_summary_pretty(summary: &DailySummary) -> String {
    let focus = format_duration(Duration::seconds(
        i64::try_from(summary.focus_seconds).unwrap_or(i64::MAX),
    ));
    let cycle = summary.long_break_interval - summary.sessions_until_long_break;

    let mut output = format!("{} {}\n", "Today".bold(), summary.date.to_string().dimmed());
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "  {}: {}\n",
        "Completed".dimmed(),
        summary.completed_sessions.to_string().green()
    ));
    output.push_str(&format!("  {}: {}\n", "Focus time".dimmed(), focus));
    output.push_str(&format!(
        "  {}: {}/{} ({} until long break)\n",
        "Cycle".dimmed(),
        cycle,
        summary.long_break_interval,
        summary.sessions_until_long_break
    ));

    output
}

/// Format a timer snapshot as a single status line
pub fn format_state_pretty(state: &TimerState) -> String {
    let phase = match state.phase {
        TimerPhase::Work => state.phase.display_name().red(),
        TimerPhase::ShortBreak => state.phase.display_name().green(),
        TimerPhase::LongBreak => state.phase.display_name().blue(),
    };
    let marker = if state.is_running { "▶" } else { "⏸" };

    let mut line = format!(
        "{} {} {} {} {:>3.0}%",
        marker,
        phase.bold(),
        state.format_remaining(),
        render_progress_bar(state.progress(), 30),
        state.progress() * 100.0
    );

    if state.phase == TimerPhase::Work && !state.task_label.is_empty() {
        line.push_str(&format!("  {}", state.task_label.cyan()));
    }

    line
}
