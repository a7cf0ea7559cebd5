//! Interactive stepper.
//!
//! Key presses become controller requests. The request is processed on the
//! next tick, after the busy indicator has been drawn, and any key arriving
//! in between is rejected by the controller.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{Event, EventStream, KeyEvent},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::controller::{Controller, ControllerError};
use crate::engine::ReductionEngine;
use crate::history::RenderedRow;

use super::action::{action_for_key, Action};
use super::components::{
    render_choices, render_details, render_key_hints, HistoryView, KeyHintBarStyle, Spinner,
    StatusBar, Theme, KEY_HINTS,
};
use super::terminal_guard::TerminalGuard;

const TICK: Duration = Duration::from_millis(50);

/// Program text and where it was read from
#[derive(Debug, Clone)]
pub struct Program {
    pub source: String,
    pub path: Option<PathBuf>,
}

impl Program {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            path: None,
        }
    }

    pub fn read(path: PathBuf) -> io::Result<Self> {
        let source = fs::read_to_string(&path)?;
        Ok(Self {
            source,
            path: Some(path),
        })
    }

    fn reload(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            self.source = fs::read_to_string(path)?;
        }
        Ok(())
    }
}

pub struct App<E> {
    controller: Controller<E>,
    program: Program,
    theme: Theme,
    history: HistoryView,
    rows: Vec<RenderedRow>,
    spinner: Spinner,
    error: Option<String>,
    should_quit: bool,
}

impl<E: ReductionEngine> App<E> {
    pub fn new(controller: Controller<E>, program: Program, theme: Theme) -> Self {
        Self {
            controller,
            program,
            theme,
            history: HistoryView::new(),
            rows: Vec::new(),
            spinner: Spinner::new(),
            error: None,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &Controller<E> {
        &self.controller
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> usize {
        self.history.selected()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Queue the first run of the program
    pub fn start(&mut self) {
        let source = self.program.source.clone();
        self.request(|c| c.request_run(source));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = action_for_key(key) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectPrev => self.history.select_prev(),
            Action::SelectNext => self.history.select_next(self.rows.len()),
            Action::RewindToSelected => {
                let target = self
                    .history
                    .selected_row(&self.rows)
                    .map(RenderedRow::rewind_target);
                if let Some(target) = target {
                    self.request(|c| c.request_rewind(target));
                }
            }
            Action::ApplyChoice(position) => self.request(|c| c.request_apply(position)),
            Action::ToggleMode => {
                let mode = self.controller.mode().toggled();
                let source = self.program.source.clone();
                self.request(|c| {
                    c.set_mode(mode)?;
                    c.request_run(source)
                });
            }
            Action::Rerun => {
                if self.controller.is_busy() {
                    self.request(|_| Err(ControllerError::Busy));
                    return;
                }
                if let Err(e) = self.program.reload() {
                    tracing::warn!(error = %e, "Failed to reload program");
                    self.error = Some(format!("Failed to reload program: {e}"));
                    return;
                }
                let source = self.program.source.clone();
                self.request(|c| c.request_run(source));
            }
        }
    }

    /// Finish whatever request is pending and refresh the rows
    pub fn process_pending(&mut self) {
        if !self.controller.is_busy() {
            return;
        }
        let result = self.controller.process();
        self.rows = self.controller.rows();
        self.select_current();
        self.error = result.err().map(|e| e.to_string());
    }

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());
        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let buf = frame.buffer_mut();
        self.history.render(chunks[0], buf, &self.rows, &self.theme);
        render_details(lower[0], buf, self.history.selected_row(&self.rows), &self.theme);
        render_choices(
            lower[1],
            buf,
            self.controller.choices(),
            self.controller.mode(),
            &self.theme,
        );
        frame.render_widget(
            StatusBar {
                mode: self.controller.mode(),
                steps: self.controller.trace().rows().len(),
                busy: self.controller.is_busy(),
                terminal: self.controller.is_terminal(),
                error: self.error.as_deref(),
                spinner: &self.spinner,
            },
            chunks[2],
        );
        render_key_hints(chunks[3], frame.buffer_mut(), KEY_HINTS, KeyHintBarStyle::default());
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut guard = TerminalGuard::new();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        self.start();
        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);

        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => self.handle_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                _ = tick.tick() => {
                    self.process_pending();
                    self.spinner.tick();
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn request(&mut self, f: impl FnOnce(&mut Controller<E>) -> Result<(), ControllerError>) {
        match f(&mut self.controller) {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Move the selection to the row of the current state
    fn select_current(&mut self) {
        let newest = self.rows.iter().map(|r| r.index).max();
        match self.rows.iter().position(|r| Some(r.index) == newest) {
            Some(position) => self.history.select(position),
            None => self.history.reset(),
        }
    }
}
