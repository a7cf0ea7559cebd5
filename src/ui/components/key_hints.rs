//! Footer listing the active key bindings.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::{ACCENT_PRIMARY, TEXT_MUTED};

pub const KEY_HINTS: &[(&str, &str)] = &[
    ("↑/↓", "select"),
    ("Enter", "rewind"),
    ("1-9", "apply"),
    ("Tab", "mode"),
    ("r", "rerun"),
    ("q", "quit"),
];

#[derive(Debug, Clone, Copy)]
pub struct KeyHintBarStyle {
    pub key_style: Style,
    pub action_style: Style,
    pub separator: (&'static str, Style),
    pub alignment: Alignment,
}

impl Default for KeyHintBarStyle {
    fn default() -> Self {
        Self {
            key_style: Style::default().fg(ACCENT_PRIMARY),
            action_style: Style::default().fg(Color::Gray),
            separator: (" │ ", Style::default().fg(TEXT_MUTED)),
            alignment: Alignment::Left,
        }
    }
}

pub fn key_hint_line(hints: &[(&str, &str)], style: KeyHintBarStyle) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            let (sep, sep_style) = style.separator;
            spans.push(Span::styled(sep, sep_style));
        }
        spans.push(Span::styled(key.to_string(), style.key_style));
        spans.push(Span::styled(format!(" {action}"), style.action_style));
    }
    Line::from(spans)
}

pub fn render_key_hints(area: Rect, buf: &mut Buffer, hints: &[(&str, &str)], style: KeyHintBarStyle) {
    Paragraph::new(key_hint_line(hints, style))
        .alignment(style.alignment)
        .render(area, buf);
}
