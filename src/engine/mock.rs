//! Scripted engine for deterministic testing
//!
//! Implements [`ReductionEngine`] over a fixed table of renderings and
//! transitions, and records every call so tests can assert which state each
//! operation was invoked on.
//!
//! # Example
//! ```
//! use retrace::engine::{ChoiceMode, MockEngine, ParseOptions, ReductionEngine};
//!
//! let mut engine = MockEngine::new("x + 0").with_step("x + 0", "x + 0", "x", "x");
//! let probe = engine.probe();
//!
//! let state = engine.parse("ignored", &ParseOptions::default()).unwrap();
//! let choices = engine.enumerate_choices(&state, ChoiceMode::All).unwrap();
//! assert_eq!(choices.len(), 1);
//! assert_eq!(probe.enumerated_states(), vec![state.id()]);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    Applied, ChoiceMode, EngineError, ParseOptions, ReductionChoice, ReductionEngine,
    StateHandle, StateId,
};

/// A call made against the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Parse(String),
    Render(StateId),
    Enumerate(StateId, ChoiceMode),
    Apply(StateId, usize),
}

#[derive(Debug, Clone)]
struct Transition {
    from_text: String,
    to_text: String,
    label: Option<String>,
    target: String,
}

/// Shared view of the calls a [`MockEngine`] has received.
///
/// Stays usable after the engine has been moved into a controller.
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockProbe {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// States passed to `enumerate_choices`, in call order
    pub fn enumerated_states(&self) -> Vec<StateId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Enumerate(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// States passed to `apply_choice`, in call order
    pub fn applied_states(&self) -> Vec<StateId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Apply(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }
}

/// Mock engine for testing
#[derive(Debug)]
pub struct MockEngine {
    initial: String,
    transitions: HashMap<String, Vec<Transition>>,
    parse_error: Option<String>,
    mismatched_retire: bool,
    states: Vec<String>,
    probe: MockProbe,
}

impl MockEngine {
    /// Every successful parse yields a fresh state rendering as `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            transitions: HashMap::new(),
            parse_error: None,
            mismatched_retire: false,
            states: Vec::new(),
            probe: MockProbe::default(),
        }
    }

    /// Offer a choice at states rendering as `state`, leading to a state
    /// rendering as `target`. Choices keep insertion order.
    pub fn with_step(
        mut self,
        state: impl Into<String>,
        from_text: impl Into<String>,
        to_text: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.push_step(state.into(), from_text.into(), to_text.into(), None, target.into());
        self
    }

    pub fn with_labeled_step(
        mut self,
        state: impl Into<String>,
        from_text: impl Into<String>,
        to_text: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.push_step(
            state.into(),
            from_text.into(),
            to_text.into(),
            Some(label.into()),
            target.into(),
        );
        self
    }

    /// Build a linear chain of states, each reached by one step from the last.
    ///
    /// Each tuple is `(from_text, to_text, target)`.
    pub fn with_chain(mut self, steps: &[(&str, &str, &str)]) -> Self {
        let mut state = self.initial.clone();
        for (from_text, to_text, target) in steps {
            self.push_step(
                state,
                (*from_text).to_string(),
                (*to_text).to_string(),
                None,
                (*target).to_string(),
            );
            state = (*target).to_string();
        }
        self
    }

    /// Make every parse fail with `message`
    pub fn failing_parse(mut self, message: impl Into<String>) -> Self {
        self.parse_error = Some(message.into());
        self
    }

    /// Hand back a retired token for the wrong state on every apply
    pub fn with_mismatched_retire(mut self) -> Self {
        self.mismatched_retire = true;
        self
    }

    pub fn probe(&self) -> MockProbe {
        self.probe.clone()
    }

    fn push_step(
        &mut self,
        state: String,
        from_text: String,
        to_text: String,
        label: Option<String>,
        target: String,
    ) {
        self.transitions.entry(state).or_default().push(Transition {
            from_text,
            to_text,
            label,
            target,
        });
    }

    fn text(&self, id: StateId) -> Result<&str, EngineError> {
        usize::try_from(id.get())
            .ok()
            .and_then(|i| self.states.get(i))
            .map(String::as_str)
            .ok_or(EngineError::UnknownState(id))
    }

    fn mint(&mut self, text: String) -> StateHandle {
        let id = StateId::new(self.states.len() as u64);
        self.states.push(text);
        StateHandle::new(id)
    }

    fn transitions_at(&self, id: StateId) -> Result<&[Transition], EngineError> {
        let text = self.text(id)?;
        Ok(self
            .transitions
            .get(text)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}

impl ReductionEngine for MockEngine {
    fn parse(&mut self, source: &str, _options: &ParseOptions) -> Result<StateHandle, EngineError> {
        self.probe.record(EngineCall::Parse(source.to_string()));
        if let Some(message) = &self.parse_error {
            return Err(EngineError::parse(message.clone()));
        }
        let initial = self.initial.clone();
        Ok(self.mint(initial))
    }

    fn render(&self, state: &StateHandle) -> Result<String, EngineError> {
        self.probe.record(EngineCall::Render(state.id()));
        self.text(state.id()).map(str::to_string)
    }

    fn enumerate_choices(
        &mut self,
        state: &StateHandle,
        mode: ChoiceMode,
    ) -> Result<Vec<ReductionChoice>, EngineError> {
        self.probe.record(EngineCall::Enumerate(state.id(), mode));
        let transitions = self.transitions_at(state.id())?;
        let limit = match mode {
            ChoiceMode::Single => 1,
            ChoiceMode::All => transitions.len(),
        };
        Ok(transitions
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, t)| ReductionChoice {
                index,
                from_text: t.from_text.clone(),
                to_text: t.to_text.clone(),
                label: t.label.clone(),
            })
            .collect())
    }

    fn apply_choice(&mut self, state: StateHandle, index: usize) -> Result<Applied, EngineError> {
        let id = state.id();
        self.probe.record(EngineCall::Apply(id, index));
        let transitions = self.transitions_at(id)?;
        let target = transitions
            .get(index)
            .map(|t| t.target.clone())
            .ok_or(EngineError::NoSuchChoice {
                state: id,
                index,
                available: transitions.len(),
            })?;

        let next = self.mint(target);
        let retired = if self.mismatched_retire {
            StateHandle::new(StateId::new(id.get().wrapping_add(1000))).retire()
        } else {
            state.retire()
        };
        Ok(Applied { retired, next })
    }
}
