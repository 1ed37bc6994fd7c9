//! focusdeck - A Pomodoro focus timer for the terminal
//!
//! This crate provides the timer state machine, its tick-driven controller,
//! session persistence and reporting, and the CLI and TUI built on them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FocusError;
pub use features::focus::{FocusController, FocusTimer, TimerPhase};
