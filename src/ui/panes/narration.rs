//! Narration pane: what the current frame says happened

use super::pane_block;
use crate::scenario::DisplayFrame;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Wrap},
    Frame,
};

pub fn render_narration_pane(frame: &mut Frame, area: Rect, label: &str, current: &DisplayFrame) {
    let block = pane_block(" Narration ", false).padding(Padding::new(1, 1, 0, 0));

    let tag_style = Style::default()
        .fg(if current.failed {
            DEFAULT_THEME.error
        } else {
            DEFAULT_THEME.secondary
        })
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(label.to_string(), Style::default().fg(DEFAULT_THEME.primary)),
            Span::styled(" · ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(current.tag, tag_style),
        ]),
        Line::from(Span::styled(
            current.description.clone(),
            Style::default().fg(DEFAULT_THEME.fg),
        )),
    ];
    if !current.marks.is_empty() {
        let marks: Vec<String> = current.marks.iter().map(i64::to_string).collect();
        lines.push(Line::from(Span::styled(
            format!("marks: {}", marks.join(", ")),
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
