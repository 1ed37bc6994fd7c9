//! JSON output formatting for focusdeck.

use serde::Serialize;
use serde_json::json;

use crate::error::FocusError;
use crate::features::focus::PomodoroSession;

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[PomodoroSession], title: &str) -> Result<String, FocusError> {
    let output = json!({
        "list": title,
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `FocusError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FocusError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::{TimerPhase, TimerState};

    #[test]
    fn test_format_sessions_json_empty() {
        let result = format_sessions_json(&[], "History").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["list"], "History");
        assert_eq!(parsed["count"], 0);
        assert!(parsed["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_format_sessions_json_fields() {
        let session = PomodoroSession::completed(1500, "Calculus");
        let result = format_sessions_json(&[session.clone()], "History").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

        let item = &parsed["items"][0];
        assert_eq!(item["id"], session.id.to_string());
        assert_eq!(item["duration_seconds"], 1500);
        assert_eq!(item["was_completed"], true);
        assert_eq!(item["task_label"], "Calculus");
    }

    #[test]
    fn test_to_json_timer_state() {
        let state = TimerState {
            phase: TimerPhase::ShortBreak,
            remaining_seconds: 120,
            duration_seconds: 300,
            is_running: true,
            task_label: String::new(),
            completed_count: 1,
        };
        let parsed: serde_json::Value = serde_json::from_str(&to_json(&state).unwrap()).unwrap();
        assert_eq!(parsed["phase"], "short_break");
        assert_eq!(parsed["remaining_seconds"], 120);
        assert_eq!(parsed["is_running"], true);
    }
}
