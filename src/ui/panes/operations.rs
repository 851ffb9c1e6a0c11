//! Operations pane rendering

use super::{follow, pane_block};
use crate::scenario::Script;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

pub fn render_operations_pane(
    frame: &mut Frame,
    area: Rect,
    script: &Script,
    current: usize,
    scroll_offset: &mut usize,
) {
    let title = format!(" {} ({}) ", script.scenario, script.operations.len());
    let block = pane_block(&title, false).padding(Padding::new(1, 0, 0, 0));

    let mut items: Vec<ListItem> = script
        .operations
        .iter()
        .enumerate()
        .map(|(index, op)| {
            let failed = op.frames.last().is_some_and(|frame| frame.failed);
            let marker = if index == current { "▶ " } else { "  " };
            let mut style = Style::default().fg(if failed {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            });
            if index == current {
                style = style
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.primary)),
                Span::styled(op.label.clone(), style),
            ]))
        })
        .collect();

    items.extend(script.refused.iter().map(|reason| {
        ListItem::new(Span::styled(
            format!("  ✗ {}", reason),
            Style::default().fg(DEFAULT_THEME.comment),
        ))
    }));

    let total = items.len();
    let visible = area.height.saturating_sub(2) as usize;
    follow(scroll_offset, current, total, visible);

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible.max(1))
        .collect();
    frame.render_widget(List::new(visible_items).block(block), area);
}
