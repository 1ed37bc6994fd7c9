//! Storage layer for focusdeck.
//!
//! `SQLite` persistence for the session ledger.

mod database;
mod migrations;

pub use database::Database;
