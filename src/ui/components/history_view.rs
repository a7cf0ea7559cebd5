//! History pane: one line per snapshot with its inline diff.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::diff::Fragment;
use crate::history::RenderedRow;

use super::theme::{Theme, ACCENT_PRIMARY, SELECTED_BG, TEXT_MUTED};

/// Selection state for the history pane.
///
/// `selected` is a position in the displayed rows, not a snapshot index.
#[derive(Debug, Default, Clone)]
pub struct HistoryView {
    selected: usize,
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, row_count: usize) {
        if row_count > 0 {
            self.selected = (self.selected + 1).min(row_count - 1);
        }
    }

    pub fn select(&mut self, position: usize) {
        self.selected = position;
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn selected_row<'a>(&self, rows: &'a [RenderedRow]) -> Option<&'a RenderedRow> {
        rows.get(self.selected)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, rows: &[RenderedRow], theme: &Theme) {
        let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row_line(row, theme))).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" History ({}) ", rows.len())),
            )
            .highlight_style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !rows.is_empty() {
            state.select(Some(self.selected.min(rows.len() - 1)));
        }
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

/// `#index` gutter followed by the row's fragments
pub fn row_line(row: &RenderedRow, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>3} ", format!("#{}", row.index)),
        Style::default().fg(TEXT_MUTED),
    )];
    spans.extend(fragment_spans(&row.fragments, theme));
    if let Some(label) = &row.label {
        spans.push(Span::styled(format!("  ({label})"), Style::default().fg(ACCENT_PRIMARY)));
    }
    Line::from(spans)
}

pub fn fragment_spans(fragments: &[Fragment], theme: &Theme) -> Vec<Span<'static>> {
    fragments
        .iter()
        .filter(|f| !f.new_text().is_empty())
        .map(|fragment| match fragment {
            Fragment::Similar(text) => Span::styled(text.clone(), theme.similar_style()),
            Fragment::Changed { new, .. } => Span::styled(new.clone(), theme.changed_style()),
        })
        .collect()
}
