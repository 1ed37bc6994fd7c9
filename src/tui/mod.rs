//! Terminal User Interface (TUI) for focusdeck.
//!
//! Interactive Pomodoro timer built with ratatui and crossterm. The timer is
//! driven by a [`ManualScheduler`](crate::features::focus::ManualScheduler)
//! that the event loop advances between key polls, so ticks and key presses
//! are handled on one thread in arrival order.

mod app;
mod event;
mod ui;

pub use app::{App, InputMode};

use std::io::{self, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::error::FocusError;
use crate::features::focus::FocusStorage;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(config: &Config, storage: FocusStorage) -> Result<(), FocusError> {
    let timer = storage.into_timer(config.timer.clone())?;
    let mut app = App::new(timer);

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| FocusError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| FocusError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| FocusError::Terminal(format!("Failed to create terminal: {e}")))?;

    info!("tui started");
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    info!("tui stopped");

    result
}

/// Run the main application loop.
fn run_app<B: Backend + Write>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), FocusError> {
    loop {
        app.tick();

        if std::mem::take(&mut app.ring_bell) {
            terminal.backend_mut().write_all(b"\x07").ok();
        }

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| FocusError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(event::Action::Quit) = event::handle_events(app)? {
            break;
        }
    }

    Ok(())
}
