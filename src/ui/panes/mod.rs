//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source text coloured by token kind, with problem ranges
//!   underlined and the current selection highlighted
//! - [`tokens`]: The token stream, one row per token
//! - [`problems`]: Recorded errors and warnings
//! - [`status`]: Status bar with file state and keybindings
//!
//! Each pane module exports a primary `render_*_pane()` function plus the
//! state types it needs.

pub mod problems;
pub mod source;
pub mod status;
pub mod tokens;

// Re-export render functions for convenience
pub use problems::render_problems_pane;
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::render_tokens_pane;

use crate::ui::app::Selection;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block shared by all panes.
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

/// Rows available inside a bordered pane, min 1.
fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Scroll a list so that its selected row is on screen.
fn keep_selection_visible(selection: &mut Selection, total_items: usize, visible_height: usize) {
    if total_items == 0 {
        *selection = Selection::default();
        return;
    }

    selection.selected = selection.selected.min(total_items - 1);
    if selection.selected < selection.offset {
        selection.offset = selection.selected;
    } else if selection.selected >= selection.offset + visible_height {
        selection.offset = selection.selected + 1 - visible_height;
    }

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        selection.offset = selection.offset.min(total_items - visible_height);
    } else {
        selection.offset = 0;
    }
}
