//! Drives a [`ReductionEngine`] and keeps the [`TraceStore`] in step with it.
//!
//! The controller is a two-state machine. A request (`request_run`,
//! `request_apply`, `request_rewind`) validates its argument and moves it
//! from `Idle` to `Busy`; [`Controller::process`] then performs the engine
//! work, including the follow-up choice enumeration, and returns to `Idle`.
//! Any request made while `Busy` is rejected.
//!
//! Parse failures and engine misbehaviour are fatal to the current run: the
//! trace and the choice list are cleared and the error is returned.

mod error;

use crate::diff::TieBreak;
use crate::engine::{ChoiceMode, EngineError, ParseOptions, ReductionChoice, ReductionEngine};
use crate::history::{HistoryRenderer, RenderedRow, RowOrder};
use crate::trace::{TraceError, TraceStore};

pub use error::ControllerError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Run(String),
    Apply(ReductionChoice),
    Rewind(usize),
    Enumerate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Busy(Pending),
}

pub struct Controller<E> {
    engine: E,
    trace: TraceStore,
    choices: Vec<ReductionChoice>,
    mode: ChoiceMode,
    options: ParseOptions,
    renderer: HistoryRenderer,
    phase: Phase,
}

impl<E: ReductionEngine> Controller<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            trace: TraceStore::new(),
            choices: Vec::new(),
            mode: ChoiceMode::default(),
            options: ParseOptions::default(),
            renderer: HistoryRenderer::default(),
            phase: Phase::Idle,
        }
    }

    pub fn with_mode(mut self, mode: ChoiceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_history(mut self, order: RowOrder, tie_break: TieBreak) -> Self {
        self.renderer = HistoryRenderer::new(order, tie_break);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn trace(&self) -> &TraceStore {
        &self.trace
    }

    pub fn choices(&self) -> &[ReductionChoice] {
        &self.choices
    }

    pub fn mode(&self) -> ChoiceMode {
        self.mode
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Busy(_))
    }

    /// A run is loaded and its current state has nothing left to reduce
    pub fn is_terminal(&self) -> bool {
        !self.is_busy() && !self.trace.is_empty() && self.choices.is_empty()
    }

    pub fn rows(&self) -> Vec<RenderedRow> {
        self.renderer.render(&self.trace)
    }

    pub fn compare(&self, from: usize, to: usize) -> Result<RenderedRow, TraceError> {
        self.renderer.compare(&self.trace, from, to)
    }

    /// Change which choices are offered from the next enumeration on
    pub fn set_mode(&mut self, mode: ChoiceMode) -> Result<(), ControllerError> {
        self.ensure_idle("set_mode")?;
        self.mode = mode;
        Ok(())
    }

    /// Parse `source` and start a new trace at its initial state
    pub fn request_run(&mut self, source: impl Into<String>) -> Result<(), ControllerError> {
        self.ensure_idle("run")?;
        self.begin(Pending::Run(source.into()));
        Ok(())
    }

    /// Apply the choice at `position` in [`Controller::choices`]
    pub fn request_apply(&mut self, position: usize) -> Result<(), ControllerError> {
        self.ensure_idle("apply")?;
        if self.trace.is_empty() {
            return Err(ControllerError::NotStarted);
        }
        let Some(choice) = self.choices.get(position) else {
            return Err(ControllerError::OutOfRange {
                requested: position,
                len: self.choices.len(),
            });
        };
        self.begin(Pending::Apply(choice.clone()));
        Ok(())
    }

    /// Keep the first `n` snapshots of the trace, so `rewind(1)` goes back to
    /// the initial state
    pub fn request_rewind(&mut self, n: usize) -> Result<(), ControllerError> {
        self.ensure_idle("rewind")?;
        if self.trace.is_empty() {
            return Err(ControllerError::NotStarted);
        }
        if n == 0 || n > self.trace.len() {
            return Err(ControllerError::OutOfRange {
                requested: n,
                len: self.trace.len(),
            });
        }
        self.begin(Pending::Rewind(n));
        Ok(())
    }

    /// Complete the pending request. Does nothing when idle.
    pub fn process(&mut self) -> Result<(), ControllerError> {
        while let Phase::Busy(pending) = std::mem::take(&mut self.phase) {
            match self.advance(pending) {
                Ok(next) => self.phase = next,
                Err(err) => {
                    tracing::error!(error = %err, "Run aborted");
                    self.trace.reset();
                    self.choices.clear();
                    self.phase = Phase::Idle;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn run(&mut self, source: impl Into<String>) -> Result<(), ControllerError> {
        self.request_run(source)?;
        self.process()
    }

    pub fn apply(&mut self, position: usize) -> Result<(), ControllerError> {
        self.request_apply(position)?;
        self.process()
    }

    pub fn rewind(&mut self, n: usize) -> Result<(), ControllerError> {
        self.request_rewind(n)?;
        self.process()
    }

    fn ensure_idle(&self, request: &'static str) -> Result<(), ControllerError> {
        if let Phase::Busy(pending) = &self.phase {
            tracing::warn!(request, ?pending, "Rejected request while busy");
            return Err(ControllerError::Busy);
        }
        Ok(())
    }

    fn begin(&mut self, pending: Pending) {
        tracing::debug!(?pending, "Controller busy");
        self.phase = Phase::Busy(pending);
    }

    fn advance(&mut self, pending: Pending) -> Result<Phase, ControllerError> {
        match pending {
            Pending::Run(source) => {
                self.choices.clear();
                let state = self
                    .engine
                    .parse(&source, &self.options)
                    .map_err(engine_failure)?;
                let rendering = self.engine.render(&state).map_err(engine_failure)?;
                tracing::debug!(state = %state.id(), "Parsed program");
                self.trace.start(state, rendering);
                Ok(Phase::Busy(Pending::Enumerate))
            }
            Pending::Apply(choice) => {
                self.apply_now(&choice)?;
                Ok(Phase::Busy(Pending::Enumerate))
            }
            Pending::Rewind(n) => {
                self.choices.clear();
                self.trace.truncate(n - 1).map_err(trace_failure)?;
                tracing::debug!(snapshots = self.trace.len(), "Rewound trace");
                Ok(Phase::Busy(Pending::Enumerate))
            }
            Pending::Enumerate => {
                let state = self.trace.current().ok_or_else(|| {
                    ControllerError::EngineInvariantViolation(
                        "no current state to enumerate".to_string(),
                    )
                })?;
                let choices = self
                    .engine
                    .enumerate_choices(state, self.mode)
                    .map_err(engine_failure)?;
                tracing::debug!(state = %state.id(), choices = choices.len(), "Choices ready");
                self.choices = choices;
                Ok(Phase::Idle)
            }
        }
    }

    fn apply_now(&mut self, choice: &ReductionChoice) -> Result<(), ControllerError> {
        self.choices.clear();
        let prior = self.trace.current_rendering().unwrap_or_default().to_string();
        if !prior.contains(&choice.from_text) {
            return Err(ControllerError::EngineInvariantViolation(format!(
                "choice `{}` does not occur in the current rendering",
                choice.from_text
            )));
        }

        let state = self.trace.check_out().map_err(trace_failure)?;
        let submitted = state.id();
        let applied = self
            .engine
            .apply_choice(state, choice.index)
            .map_err(engine_failure)?;
        if applied.retired.id() != submitted {
            return Err(ControllerError::EngineInvariantViolation(format!(
                "applying to state {submitted} retired state {}",
                applied.retired.id()
            )));
        }

        let rendering = self.engine.render(&applied.next).map_err(engine_failure)?;
        if rendering.is_empty() && !prior.is_empty() {
            return Err(ControllerError::EngineInvariantViolation(format!(
                "state {} rendered as empty text",
                applied.next.id()
            )));
        }

        tracing::debug!(from = %submitted, to = %applied.next.id(), "Applied choice");
        self.trace
            .append(choice, applied.retired, applied.next, rendering)
            .map_err(trace_failure)
    }
}

fn engine_failure(err: EngineError) -> ControllerError {
    match err {
        EngineError::Parse { message } => ControllerError::Parse(message),
        other => ControllerError::EngineInvariantViolation(other.to_string()),
    }
}

fn trace_failure(err: TraceError) -> ControllerError {
    ControllerError::EngineInvariantViolation(err.to_string())
}
