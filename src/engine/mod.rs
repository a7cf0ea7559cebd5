//! Boundary to the reduction engine that owns program states.
//!
//! The trace and controller never look inside a state. Everything they know
//! comes through [`ReductionEngine`]: parse a program into a handle, render a
//! handle to text, list the reductions available at a handle, and apply one
//! of them (which consumes the handle).

mod error;
mod handle;
pub mod mock;
pub mod rewrite;

use serde::{Deserialize, Serialize};

pub use error::EngineError;
pub use handle::{RetiredState, StateHandle, StateId};
pub use mock::{EngineCall, MockEngine, MockProbe};
pub use rewrite::RewriteEngine;

/// Which reductions the engine should offer at a state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceMode {
    /// Only the canonical next reduction
    #[default]
    Single,
    /// Every reduction available at the state
    All,
}

impl ChoiceMode {
    pub fn toggled(self) -> Self {
        match self {
            ChoiceMode::Single => ChoiceMode::All,
            ChoiceMode::All => ChoiceMode::Single,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChoiceMode::Single => "Lazy",
            ChoiceMode::All => "Free choice",
        }
    }
}

/// Options forwarded to [`ReductionEngine::parse`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the binding whose expression is reduced
    pub entry: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            entry: "main".to_string(),
        }
    }
}

/// One reducible sub-expression at a state and what it reduces to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionChoice {
    pub index: usize,
    pub from_text: String,
    pub to_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ReductionChoice {
    pub fn new(index: usize, from_text: impl Into<String>, to_text: impl Into<String>) -> Self {
        Self {
            index,
            from_text: from_text.into(),
            to_text: to_text.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Result of applying a choice
#[derive(Debug)]
pub struct Applied {
    /// Display-only token for the state that was consumed
    pub retired: RetiredState,
    /// The only valid reference to the resulting state
    pub next: StateHandle,
}

/// External reduction engine.
///
/// Calls are synchronous and bounded by expression size. `render` must be
/// deterministic for a given state.
pub trait ReductionEngine {
    fn parse(&mut self, source: &str, options: &ParseOptions) -> Result<StateHandle, EngineError>;

    fn render(&self, state: &StateHandle) -> Result<String, EngineError>;

    /// An empty result means the state is in normal form.
    fn enumerate_choices(
        &mut self,
        state: &StateHandle,
        mode: ChoiceMode,
    ) -> Result<Vec<ReductionChoice>, EngineError>;

    /// Consume `state` and apply the choice at `index` from the most recent
    /// enumeration of that state.
    fn apply_choice(&mut self, state: StateHandle, index: usize) -> Result<Applied, EngineError>;
}
