pub mod config;
pub mod controller;
pub mod diff;
pub mod engine;
pub mod history;
pub mod trace;
pub mod ui;
pub mod util;

pub use config::Config;
pub use controller::{Controller, ControllerError};
pub use diff::{diff, token_diff, Diff, DiffMode, Fragment, Hint, TieBreak};
pub use engine::{
    ChoiceMode, EngineError, MockEngine, ParseOptions, ReductionChoice, ReductionEngine,
    RewriteEngine, StateHandle, StateId,
};
pub use history::{HistoryRenderer, RenderedRow, RowOrder};
pub use trace::{Step, TraceError, TraceStore};
pub use ui::App;
