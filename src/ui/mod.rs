pub mod action;
pub mod app;
pub mod batch;
pub mod components;
pub mod terminal_guard;

pub use action::{action_for_key, Action};
pub use app::{App, Program};
pub use batch::{run_batch, OutputFormat};
pub use terminal_guard::{install_panic_hook, TerminalGuard};
