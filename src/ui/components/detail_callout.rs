use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::history::RenderedRow;

use super::theme::{Theme, TEXT_MUTED};

/// Distinct `old ⇒ new` pairs of the selected row
pub fn detail_lines(row: Option<&RenderedRow>, theme: &Theme) -> Vec<Line<'static>> {
    let Some(row) = row else {
        return Vec::new();
    };
    if row.is_initial() {
        return vec![Line::from(Span::styled(
            "initial state",
            Style::default().fg(TEXT_MUTED),
        ))];
    }

    let mut lines: Vec<Line<'static>> = row
        .details()
        .into_iter()
        .map(|(old, new)| {
            Line::from(vec![
                Span::styled(old.to_string(), theme.removed_style()),
                Span::styled(" ⇒ ", Style::default().fg(TEXT_MUTED)),
                Span::styled(new.to_string(), theme.changed_style()),
            ])
        })
        .collect();
    for removal in &row.removals {
        lines.push(Line::from(Span::styled(
            removal.text.clone(),
            theme.removed_style(),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "no visible change",
            Style::default().fg(TEXT_MUTED),
        )));
    }
    lines
}

pub fn render_details(area: Rect, buf: &mut Buffer, row: Option<&RenderedRow>, theme: &Theme) {
    let title = match row {
        Some(row) => format!(" Step #{} ", row.index),
        None => " Step ".to_string(),
    };
    Paragraph::new(detail_lines(row, theme))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .render(area, buf);
}
