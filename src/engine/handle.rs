//! Single-owner state handles.
//!
//! A [`StateHandle`] is the only way to ask an engine to do something with a
//! program state. It is move-only: [`ReductionEngine::apply_choice`] takes it
//! by value, so the binding that was applied cannot be touched again.
//!
//! When an engine consumes a handle it gives back a [`RetiredState`]. A
//! retired state can be stored and shown, but no engine operation accepts
//! it. The trace store revives it into a live handle when a rewind makes it
//! the current state again.
//!
//! [`ReductionEngine::apply_choice`]: super::ReductionEngine::apply_choice

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a program state inside an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Live, single-owner reference to a program state held by an engine.
///
/// Deliberately neither `Clone` nor `Copy`. Dropping a handle never calls
/// back into the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct StateHandle {
    id: StateId,
}

impl StateHandle {
    /// Mint a handle for a state. Only engines should call this.
    pub fn new(id: StateId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Give up the live handle, keeping a display-only token for it.
    pub fn retire(self) -> RetiredState {
        RetiredState { id: self.id }
    }
}

/// A consumed state, kept for display only.
#[derive(Debug, PartialEq, Eq)]
pub struct RetiredState {
    id: StateId,
}

impl RetiredState {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Turn the token back into a live handle. Only the trace store may do
    /// this, and only once the handle that replaced it has been dropped.
    pub(crate) fn revive(self) -> StateHandle {
        StateHandle { id: self.id }
    }
}
