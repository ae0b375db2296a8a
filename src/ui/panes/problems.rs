//! Problem list pane rendering

use super::{keep_selection_visible, pane_block, visible_height};
use crate::diagnostics::{CodeProblem, Severity};
use crate::ui::app::Selection;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the problem list pane
pub fn render_problems_pane(
    frame: &mut Frame,
    area: Rect,
    problems: &[CodeProblem],
    is_focused: bool,
    selection: &mut Selection,
) {
    let block = pane_block(" Problems ", is_focused);

    if problems.is_empty() {
        let paragraph = Paragraph::new("(no problems)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = visible_height(area);
    keep_selection_visible(selection, problems.len(), visible_height);

    let items: Vec<ListItem> = problems
        .iter()
        .enumerate()
        .skip(selection.offset)
        .take(visible_height)
        .map(|(i, problem)| {
            let color = match problem.severity() {
                Severity::Error => DEFAULT_THEME.error,
                Severity::Warning => DEFAULT_THEME.warning,
            };

            let position = match problem.location() {
                Some(range) => format!("{}:{} ", range.start.line, range.start.column),
                None => String::new(),
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{}: ", problem.severity()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(position, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(problem.message(), Style::default().fg(DEFAULT_THEME.fg)),
            ]);

            let item = ListItem::new(line);
            if i == selection.selected {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
