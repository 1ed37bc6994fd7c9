//! Feature implementations for focusdeck.

pub mod focus;
