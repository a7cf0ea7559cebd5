//! Ordered history of applied reductions.
//!
//! The [`TraceStore`] is the only mutable owner of a session's history. It
//! holds one cached rendering per state reached, one [`Step`] per applied
//! choice, and exactly one live [`StateHandle`]: the current one. Earlier
//! states are kept as [`RetiredState`] tokens, used for display only and
//! revived when a truncation makes one of them current again.

mod error;

use serde::Serialize;

use crate::engine::{ReductionChoice, RetiredState, StateHandle, StateId};

pub use error::TraceError;

/// Record of one applied choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub state_before: StateId,
    pub from_text: String,
    pub to_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Cached display text of one state in the trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub id: StateId,
    pub rendering: String,
}

#[derive(Debug, Default)]
enum Current {
    #[default]
    Empty,
    Live(StateHandle),
    /// Handed to the engine by `check_out`, waiting for `append`
    CheckedOut(StateId),
}

#[derive(Debug, Default)]
pub struct TraceStore {
    snapshots: Vec<Snapshot>,
    steps: Vec<Step>,
    /// `retired[i]` is the consumed handle of `snapshots[i]`
    retired: Vec<RetiredState>,
    current: Current,
}

impl TraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh trace at a newly parsed state, discarding any previous one
    pub fn start(&mut self, initial: StateHandle, rendering: String) {
        self.reset();
        self.snapshots.push(Snapshot {
            id: initial.id(),
            rendering,
        });
        self.current = Current::Live(initial);
    }

    /// Drop everything. Handles are discarded, never released through the engine.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.steps.clear();
        self.retired.clear();
        self.current = Current::Empty;
    }

    /// Move the live handle out so the engine can consume it
    pub fn check_out(&mut self) -> Result<StateHandle, TraceError> {
        match std::mem::take(&mut self.current) {
            Current::Live(handle) => {
                self.current = Current::CheckedOut(handle.id());
                Ok(handle)
            }
            other => {
                self.current = other;
                Err(TraceError::NoCurrentState)
            }
        }
    }

    /// Record `choice` as applied to the checked-out state, advancing to `next`
    pub fn append(
        &mut self,
        choice: &ReductionChoice,
        retired: RetiredState,
        next: StateHandle,
        rendering: String,
    ) -> Result<(), TraceError> {
        let before = match self.current {
            Current::CheckedOut(id) => id,
            _ => return Err(TraceError::InvalidAppend),
        };
        if retired.id() != before {
            return Err(TraceError::RetiredMismatch {
                expected: before,
                actual: retired.id(),
            });
        }

        let prior = self.snapshots.last().map(|s| s.rendering.as_str());
        if prior.is_some_and(|text| !text.contains(&choice.from_text)) {
            tracing::debug!(state = %before, from = %choice.from_text, "Reduced text not found in prior rendering");
        }
        if !rendering.contains(&choice.to_text) {
            tracing::debug!(state = %next.id(), to = %choice.to_text, "Replacement text not found in new rendering");
        }

        self.steps.push(Step {
            state_before: before,
            from_text: choice.from_text.clone(),
            to_text: choice.to_text.clone(),
            label: choice.label.clone(),
        });
        self.retired.push(retired);
        self.snapshots.push(Snapshot {
            id: next.id(),
            rendering,
        });
        self.current = Current::Live(next);
        Ok(())
    }

    /// Keep the first `n` steps; the state after step `n - 1` becomes current
    pub fn truncate(&mut self, n: usize) -> Result<(), TraceError> {
        if !matches!(self.current, Current::Live(_)) {
            return Err(TraceError::NoCurrentState);
        }
        if n > self.steps.len() {
            return Err(TraceError::OutOfRange {
                requested: n,
                len: self.steps.len(),
            });
        }
        if n == self.steps.len() {
            return Ok(());
        }

        // Later retired tokens and the current handle are simply dropped.
        let revived = self.retired.swap_remove(n).revive();
        self.retired.truncate(n);
        self.steps.truncate(n);
        self.snapshots.truncate(n + 1);
        self.current = Current::Live(revived);
        Ok(())
    }

    pub fn current(&self) -> Option<&StateHandle> {
        match &self.current {
            Current::Live(handle) => Some(handle),
            _ => None,
        }
    }

    /// Applied steps, oldest first
    pub fn rows(&self) -> &[Step] {
        &self.steps
    }

    /// Every state reached, oldest first. Empty before `start`.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn current_rendering(&self) -> Option<&str> {
        self.snapshots.last().map(|s| s.rendering.as_str())
    }

    /// Number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(n: u64) -> StateHandle {
        StateHandle::new(StateId::new(n))
    }

    fn step(store: &mut TraceStore, from: &str, to: &str, next: u64, rendering: &str) {
        let live = store.check_out().unwrap();
        let choice = ReductionChoice::new(0, from, to);
        store
            .append(&choice, live.retire(), handle(next), rendering.to_string())
            .unwrap();
    }

    fn three_steps() -> TraceStore {
        let mut store = TraceStore::new();
        store.start(handle(0), "1 + 2 + 3".into());
        step(&mut store, "1 + 2", "3", 1, "3 + 3");
        step(&mut store, "3 + 3", "6", 2, "6");
        store
    }

    #[test]
    fn len_is_steps_plus_one() {
        let store = three_steps();
        assert_eq!(store.rows().len(), 2);
        assert_eq!(store.len(), store.rows().len() + 1);
        assert_eq!(store.current().map(StateHandle::id), Some(StateId::new(2)));
    }

    #[test]
    fn append_before_start_is_invalid() {
        let mut store = TraceStore::new();
        let choice = ReductionChoice::new(0, "a", "b");
        let err = store
            .append(&choice, handle(0).retire(), handle(1), "b".into())
            .unwrap_err();
        assert_eq!(err, TraceError::InvalidAppend);
        assert!(store.is_empty());
    }

    #[test]
    fn append_without_check_out_is_invalid() {
        let mut store = TraceStore::new();
        store.start(handle(0), "a".into());
        let choice = ReductionChoice::new(0, "a", "b");
        let err = store
            .append(&choice, handle(0).retire(), handle(1), "b".into())
            .unwrap_err();
        assert_eq!(err, TraceError::InvalidAppend);
    }

    #[test]
    fn append_rejects_wrong_retired_state() {
        let mut store = TraceStore::new();
        store.start(handle(0), "a".into());
        let _live = store.check_out().unwrap();
        let choice = ReductionChoice::new(0, "a", "b");
        let err = store
            .append(&choice, handle(9).retire(), handle(1), "b".into())
            .unwrap_err();
        assert!(matches!(err, TraceError::RetiredMismatch { .. }));
    }

    #[test]
    fn check_out_twice_fails() {
        let mut store = TraceStore::new();
        store.start(handle(0), "a".into());
        let _live = store.check_out().unwrap();
        assert_eq!(store.check_out().unwrap_err(), TraceError::NoCurrentState);
        assert!(store.current().is_none());
    }

    #[test]
    fn truncate_to_zero_restores_initial_state() {
        let mut store = three_steps();
        store.truncate(0).unwrap();
        assert!(store.rows().is_empty());
        assert_eq!(store.len(), 1);
        assert_eq!(store.current().map(StateHandle::id), Some(StateId::new(0)));
        assert_eq!(store.current_rendering(), Some("1 + 2 + 3"));
    }

    #[test]
    fn truncate_keeps_prefix() {
        let mut store = three_steps();
        store.truncate(1).unwrap();
        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.rows()[0].from_text, "1 + 2");
        assert_eq!(store.current().map(StateHandle::id), Some(StateId::new(1)));
        assert_eq!(store.current_rendering(), Some("3 + 3"));
    }

    #[test]
    fn truncate_to_len_is_a_no_op() {
        let mut store = three_steps();
        store.truncate(2).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.current().map(StateHandle::id), Some(StateId::new(2)));
    }

    #[test]
    fn truncate_past_end_is_out_of_range() {
        let mut store = three_steps();
        assert_eq!(
            store.truncate(3).unwrap_err(),
            TraceError::OutOfRange {
                requested: 3,
                len: 2
            }
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn branch_after_truncate() {
        let mut store = three_steps();
        store.truncate(1).unwrap();
        step(&mut store, "3", "1 + 2", 7, "1 + 2 + 3");
        assert_eq!(store.len(), 3);
        assert_eq!(store.rows()[1].state_before, StateId::new(1));
        assert_eq!(store.current().map(StateHandle::id), Some(StateId::new(7)));
    }

    #[test]
    fn start_discards_previous_trace() {
        let mut store = three_steps();
        store.start(handle(10), "x".into());
        assert_eq!(store.len(), 1);
        assert!(store.rows().is_empty());
    }
}
