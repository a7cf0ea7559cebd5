use thiserror::Error;

use crate::engine::StateId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("No state has been checked out to append to")]
    InvalidAppend,
    #[error("No live state in the trace")]
    NoCurrentState,
    #[error("Index {requested} is out of range (trace has {len} steps)")]
    OutOfRange { requested: usize, len: usize },
    #[error("Engine retired state {actual}, expected {expected}")]
    RetiredMismatch { expected: StateId, actual: StateId },
}
