use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use unicode_width::UnicodeWidthStr;

use crate::engine::{ChoiceMode, ReductionChoice};

use super::theme::{Theme, ACCENT_PRIMARY, TEXT_MUTED};

/// Choices are numbered from 1 to match the keys that apply them
pub fn choice_lines(choices: &[ReductionChoice], theme: &Theme) -> Vec<Line<'static>> {
    if choices.is_empty() {
        return vec![Line::from(Span::styled(
            "normal form",
            Style::default().fg(TEXT_MUTED),
        ))];
    }

    let width = from_column_width(choices);
    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let mut spans = vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(ACCENT_PRIMARY)),
                Span::styled(pad_to_width(&choice.from_text, width), theme.similar_style()),
                Span::styled(" ⇒ ", Style::default().fg(TEXT_MUTED)),
                Span::styled(choice.to_text.clone(), theme.changed_style()),
            ];
            if let Some(label) = &choice.label {
                spans.push(Span::styled(format!("  {label}"), Style::default().fg(TEXT_MUTED)));
            }
            Line::from(spans)
        })
        .collect()
}

/// Display width of the widest `from_text`, so the arrows line up
pub fn from_column_width(choices: &[ReductionChoice]) -> usize {
    choices
        .iter()
        .map(|c| c.from_text.width())
        .max()
        .unwrap_or(0)
}

pub fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

pub fn render_choices(
    area: Rect,
    buf: &mut Buffer,
    choices: &[ReductionChoice],
    mode: ChoiceMode,
    theme: &Theme,
) {
    Paragraph::new(choice_lines(choices, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Choices: {} ", mode.display_name())),
        )
        .wrap(Wrap { trim: false })
        .render(area, buf);
}
