//! Shared test utilities for retrace
//!
//! - Program fixtures for the rewrite engine
//! - TUI terminal testing helpers

pub mod fixtures;
pub mod terminal;
