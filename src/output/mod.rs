//! Output formatting for focusdeck.
//!
//! Formatters for sessions, summaries and reports. The headless timer's
//! status line is pretty-only (`format_state_pretty`).

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::FocusError;
use crate::features::focus::{DailySummary, FocusReport, PomodoroSession};

pub use json::*;
pub use pretty::*;

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[PomodoroSession],
    title: &str,
    format: OutputFormat,
) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, title)),
        OutputFormat::Json => format_sessions_json(sessions, title),
    }
}

/// Format a day summary based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_summary(summary: &DailySummary, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => to_json(summary),
    }
}

/// Format a report based on output format
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_report(report: &FocusReport, format: OutputFormat) -> Result<String, FocusError> {
    match format {
        OutputFormat::Pretty => Ok(report.format()),
        OutputFormat::Json => to_json(report),
    }
}
