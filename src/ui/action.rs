//! Actions triggered by key presses

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectPrev,
    SelectNext,
    /// Make the selected history row the current state
    RewindToSelected,
    /// Apply the choice at this position (0-based)
    ApplyChoice(usize),
    /// Switch between single and all choices, then run the program again
    ToggleMode,
    /// Reload the program and start over
    Rerun,
}

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Enter => Some(Action::RewindToSelected),
        KeyCode::Tab => Some(Action::ToggleMode),
        KeyCode::Char('r') => Some(Action::Rerun),
        KeyCode::Char(c @ '1'..='9') => Some(Action::ApplyChoice(c as usize - '1' as usize)),
        _ => None,
    }
}
