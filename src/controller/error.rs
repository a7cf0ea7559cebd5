use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Another request is still being processed")]
    Busy,
    #[error("No program has been run yet")]
    NotStarted,
    #[error("{requested} is out of range ({len} available)")]
    OutOfRange { requested: usize, len: usize },
    #[error("{0}")]
    Parse(String),
    #[error("Engine misbehaved: {0}")]
    EngineInvariantViolation(String),
}
