//! TUI pane rendering modules
//!
//! Each pane module exports one `render_*` function that draws from borrowed
//! state and keeps nothing between draws apart from the scroll offsets the
//! caller owns.
//!
//! - [`operations`]: the script's operations, refused ones listed last
//! - [`timeline`]: frames of the loaded operation with the cursor row
//! - [`snapshot`]: the structure as the current frame recorded it
//! - [`narration`]: description and marks of the current frame
//! - [`status`]: status bar with keybindings and playback state

pub mod narration;
pub mod operations;
pub mod snapshot;
pub mod status;
pub mod timeline;

pub use narration::render_narration_pane;
pub use operations::render_operations_pane;
pub use snapshot::render_snapshot_pane;
pub use status::{render_status_bar, StatusLine};
pub use timeline::render_timeline_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so that `selected` stays within `visible` rows
fn follow(offset: &mut usize, selected: usize, total: usize, visible: usize) {
    let visible = visible.max(1);
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + visible {
        *offset = selected + 1 - visible;
    }
    *offset = (*offset).min(total.saturating_sub(visible));
}

#[cfg(test)]
mod tests {
    use super::follow;

    #[test]
    fn follow_keeps_the_selection_visible() {
        let mut offset = 0;
        follow(&mut offset, 12, 20, 5);
        assert_eq!(offset, 8);
        follow(&mut offset, 3, 20, 5);
        assert_eq!(offset, 3);
        follow(&mut offset, 3, 4, 10);
        assert_eq!(offset, 0);
    }
}
