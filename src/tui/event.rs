//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::error::FocusError;
use crate::features::focus::TimerPhase;
use crate::tui::app::{App, InputMode};

/// How long to wait for input before delivering ticks again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Action to take after handling an event.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
}

/// Wait briefly for a terminal event and apply it.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App) -> Result<Option<Action>, FocusError> {
    if event::poll(POLL_INTERVAL)
        .map_err(|e| FocusError::Terminal(format!("Event poll failed: {e}")))?
    {
        if let Event::Key(key) = event::read()
            .map_err(|e| FocusError::Terminal(format!("Event read failed: {e}")))?
        {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key(app, key));
            }
        }
    }

    Ok(None)
}

/// Apply one key press.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match app.mode {
        InputMode::EditingTask => {
            match key.code {
                KeyCode::Enter => app.commit_edit(),
                KeyCode::Esc => app.cancel_edit(),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
            None
        }
        InputMode::Normal => {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle(),
                KeyCode::Char('r') => app.reset(),
                KeyCode::Char('1') => app.switch_mode(TimerPhase::Work),
                KeyCode::Char('2') => app.switch_mode(TimerPhase::ShortBreak),
                KeyCode::Char('3') => app.switch_mode(TimerPhase::LongBreak),
                KeyCode::Char('t') => app.begin_edit(),
                KeyCode::Char('c') => match Config::load() {
                    Ok(config) => app.reload_settings(config.timer),
                    Err(e) => app.status = Some(format!("Settings not reloaded: {e}")),
                },
                KeyCode::Char('?') => {
                    app.status = Some(
                        "space:start/pause | r:reset | 1/2/3:phase | t:task | c:reload | q:quit".to_string(),
                    );
                }
                _ => {}
            }
            None
        }
    }
}
