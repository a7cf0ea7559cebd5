use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::engine::ChoiceMode;

use super::spinner::Spinner;
use super::theme::{ACCENT_PRIMARY, ERROR, TEXT_MUTED};

pub struct StatusBar<'a> {
    pub mode: ChoiceMode,
    pub steps: usize,
    pub busy: bool,
    pub terminal: bool,
    pub error: Option<&'a str>,
    pub spinner: &'a Spinner,
}

impl StatusBar<'_> {
    pub fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(format!(" {} ", self.mode.display_name()), Style::default().fg(ACCENT_PRIMARY)),
            Span::styled(format!("│ {} steps ", self.steps), Style::default().fg(TEXT_MUTED)),
        ];
        if self.busy {
            spans.push(Span::raw("│ "));
            spans.extend(self.spinner.with_label("reducing", ACCENT_PRIMARY));
            spans.push(Span::raw(" "));
        } else if self.terminal {
            spans.push(Span::styled("│ normal form ", Style::default().fg(TEXT_MUTED)));
        }
        if let Some(error) = self.error {
            spans.push(Span::styled(format!("│ {error}"), Style::default().fg(ERROR)));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}
