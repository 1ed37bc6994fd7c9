//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs},
    Frame,
};

use crate::features::focus::{format_duration, TimerPhase};
use crate::tui::app::{App, InputMode};

const fn phase_color(phase: TimerPhase) -> Color {
    match phase {
        TimerPhase::Work => Color::Red,
        TimerPhase::ShortBreak => Color::Green,
        TimerPhase::LongBreak => Color::Blue,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    // Create layout: phase tabs, timer, gauge, task, stats + history, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Phase tabs
            Constraint::Length(5), // Countdown
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Task
            Constraint::Min(0),    // Stats and history
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);
    render_countdown(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    render_task(frame, app, chunks[3]);
    render_panels(frame, app, chunks[4]);
    render_status_bar(frame, app, chunks[5]);
}

/// Render the phase selector.
fn render_tabs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.state();
    let titles: Vec<Line<'_>> = TimerPhase::ALL
        .iter()
        .enumerate()
        .map(|(i, phase)| Line::from(format!("{} {}", i + 1, phase.label())))
        .collect();
    let selected = TimerPhase::ALL
        .iter()
        .position(|p| *p == state.phase)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(phase_color(state.phase))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" focusdeck "));

    frame.render_widget(tabs, area);
}

/// Render the remaining time.
fn render_countdown(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.state();
    let marker = if state.is_running { "▶" } else { "⏸" };

    let lines = vec![
        Line::from(Span::styled(
            state.phase.display_name(),
            Style::default().fg(phase_color(state.phase)),
        )),
        Line::from(Span::styled(
            format!("{marker} {}", state.format_remaining()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Completed this run: {}", state.completed_count),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let countdown = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(countdown, area);
}

/// Render progress through the phase.
fn render_progress(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.state();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(phase_color(state.phase)))
        .ratio(state.progress());

    frame.render_widget(gauge, area);
}

/// Render the task label, or the editor while typing.
fn render_task(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style, title) = match app.mode {
        InputMode::EditingTask => (
            format!("{}▏", app.input),
            Style::default().fg(Color::Yellow),
            " Task (editing) ",
        ),
        InputMode::Normal => {
            let label = app.state().task_label;
            if label.is_empty() {
                (
                    "press t to name this session".to_string(),
                    Style::default().fg(Color::DarkGray),
                    " Task ",
                )
            } else {
                (label, Style::default().fg(Color::Cyan), " Task ")
            }
        }
    };

    let task = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(task, area);
}

/// Render today's stats and recent sessions side by side.
fn render_panels(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let today = app.today();
    let focus = format_duration(chrono::Duration::seconds(
        i64::try_from(today.focus_seconds).unwrap_or(i64::MAX),
    ));
    let stats = Paragraph::new(vec![
        Line::from(format!("Sessions:   {}", today.completed_sessions)),
        Line::from(format!("Focus time: {focus}")),
        Line::from(format!(
            "Long break in {} session{}",
            today.sessions_until_long_break,
            if today.sessions_until_long_break == 1 { "" } else { "s" }
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Today "));
    frame.render_widget(stats, chunks[0]);

    let items: Vec<ListItem<'_>> = app
        .recent()
        .into_iter()
        .map(|session| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    session.completed_at_local().format("%H:%M ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>3}m ", session.duration_seconds / 60),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(session.task_label),
            ]))
        })
        .collect();

    let history = List::new(items).block(Block::default().borders(Borders::ALL).title(" Recent "));
    frame.render_widget(history, chunks[1]);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("space:start/pause | r:reset | 1/2/3:phase | t:task | ?:help | q:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
