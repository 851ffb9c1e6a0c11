//! Frame list of the loaded operation

use super::{follow, pane_block};
use crate::scenario::DisplayFrame;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

pub fn render_timeline_pane(
    frame: &mut Frame,
    area: Rect,
    frames: &[DisplayFrame],
    position: usize,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Frames ", true);

    if frames.is_empty() {
        let paragraph = Paragraph::new("(no frames)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let number_width = frames.len().to_string().len();
    let all_items: Vec<ListItem> = frames
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_current = index == position;
            let tag_color = if item.failed {
                DEFAULT_THEME.error
            } else if is_current {
                DEFAULT_THEME.secondary
            } else {
                DEFAULT_THEME.primary
            };
            let mut line = Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", index + 1, width = number_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(format!("{:<16}", item.tag), Style::default().fg(tag_color)),
                Span::styled(item.description.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]);
            if is_current {
                line = line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            ListItem::new(line)
        })
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    follow(scroll_offset, position, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();
    frame.render_widget(List::new(visible_items).block(block), area);
}
