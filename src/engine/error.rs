use thiserror::Error;

use super::StateId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Program text could not be parsed. The message is shown to the user verbatim.
    #[error("{message}")]
    Parse { message: String },
    #[error("Unknown state: {0}")]
    UnknownState(StateId),
    #[error("No choice {index} at state {state} ({available} available)")]
    NoSuchChoice {
        state: StateId,
        index: usize,
        available: usize,
    },
    #[error("Choices were not enumerated for state {0}")]
    ChoicesNotEnumerated(StateId),
    #[error("Engine failure: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn parse(message: impl Into<String>) -> Self {
        EngineError::Parse {
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, EngineError::Parse { .. })
    }
}
