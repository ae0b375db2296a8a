//! Token list pane rendering

use super::source::token_style;
use super::{keep_selection_visible, pane_block, visible_height};
use crate::parser::Token;
use crate::ui::app::Selection;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Render the token list pane
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    selection: &mut Selection,
) {
    let block = pane_block(" Tokens ", is_focused).padding(Padding::new(1, 0, 0, 0));

    let visible_height = visible_height(area);
    keep_selection_visible(selection, tokens.len(), visible_height);

    let items: Vec<ListItem> = tokens
        .iter()
        .enumerate()
        .skip(selection.offset)
        .take(visible_height)
        .map(|(i, token)| {
            let start = &token.location.start;
            let next = tokens.get(i + 1).map(|t| t.kind);

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>4}:{:<3} ", start.line, start.column),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(format!("{:<22}", token.kind.name()), token_style(token.kind, next)),
                Span::styled(
                    format!("{:?}", token.literal),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ]);

            let item = ListItem::new(line);
            if i == selection.selected {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
