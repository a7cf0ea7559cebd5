//! Integration tests for retrace
//!
//! These tests drive the controller, renderer and binary together.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod history_view;
pub mod rewind_flow;
