//! Source pane rendering
//!
//! The source text is coloured from the token stream the lexer produced, so
//! what the pane shows is exactly what the front end saw:
//!
//! - Keywords, type keywords, literals, comments and called names each get
//!   their own colour
//! - Problem ranges are underlined in the error or warning colour, and the
//!   line number of a line with an error turns red
//! - The selected token or problem is highlighted and kept at a fixed row

use super::{pane_block, visible_height};
use crate::diagnostics::{CodeProblem, CodeRange};
use crate::parser::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::ops::Range;

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the selected line is pinned to (None = not initialized yet)
    pub target_line_row: Option<usize>,
}

/// Data needed to render the source pane
pub struct SourceRenderData<'a> {
    pub source_code: &'a str,
    pub tokens: &'a [Token],
    pub problems: &'a [CodeProblem],
    pub selected: Option<&'a CodeRange>,
}

/// Colour of a token; `next` is the kind of the token after it.
pub(crate) fn token_style(kind: TokenKind, next: Option<TokenKind>) -> Style {
    match kind {
        kind if kind.is_primary_type() => Style::default().fg(DEFAULT_THEME.type_name),
        kind if kind.is_keyword() => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::String => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::Int | TokenKind::Float | TokenKind::Imaginary | TokenKind::Boolean => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        TokenKind::Comment => Style::default().fg(DEFAULT_THEME.comment),
        TokenKind::Identifier if next == Some(TokenKind::OpenParen) => {
            Style::default().fg(DEFAULT_THEME.function)
        }
        TokenKind::OpenParen
        | TokenKind::CloseParen
        | TokenKind::OpenBracket
        | TokenKind::CloseBracket
        | TokenKind::OpenBrace
        | TokenKind::CloseBrace => Style::default().fg(DEFAULT_THEME.primary),
        TokenKind::Invalid => Style::default().fg(DEFAULT_THEME.error),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Columns of `line` (1-based) covered by `range`, for a line `width` code
/// points wide.
pub(crate) fn columns_on_line(
    range: &CodeRange,
    line: usize,
    width: usize,
) -> Option<Range<usize>> {
    if line < range.start.line || line > range.end.line {
        return None;
    }

    let start = if line == range.start.line {
        range.start.column
    } else {
        0
    };
    let end = if line == range.end.line {
        range.end.column
    } else {
        width
    };

    let (start, end) = (start.min(width), end.min(width));
    (start < end).then_some(start..end)
}

fn line_styles(line: usize, width: usize, data: &SourceRenderData<'_>) -> Vec<Style> {
    let mut styles = vec![Style::default().fg(DEFAULT_THEME.fg); width];

    for (i, token) in data.tokens.iter().enumerate() {
        let Some(columns) = columns_on_line(&token.location, line, width) else {
            continue;
        };
        let style = token_style(token.kind, data.tokens.get(i + 1).map(|t| t.kind));
        styles[columns].fill(style);
    }

    for problem in data.problems {
        let Some(columns) = problem
            .location()
            .and_then(|range| columns_on_line(range, line, width))
        else {
            continue;
        };
        let color = if problem.is_error() {
            DEFAULT_THEME.error
        } else {
            DEFAULT_THEME.warning
        };
        for style in &mut styles[columns] {
            *style = style.fg(color).add_modifier(Modifier::UNDERLINED);
        }
    }

    if let Some(columns) = data
        .selected
        .and_then(|range| columns_on_line(range, line, width))
    {
        for style in &mut styles[columns] {
            *style = style
                .bg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD);
        }
    }

    styles
}

/// Merge runs of equally styled characters into spans.
fn styled_spans(chars: &[char], styles: &[Style]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut start = 0;

    for i in 1..=chars.len() {
        if i == chars.len() || styles[i] != styles[start] {
            let text: String = chars[start..i].iter().collect();
            spans.push(Span::styled(text, styles[start]));
            start = i;
        }
    }

    spans
}

/// Lines as the lexer counts them. A leading byte order mark takes no column,
/// so it is not displayed either.
pub(crate) fn display_lines(source_code: &str) -> Vec<&str> {
    source_code
        .strip_prefix('\u{FEFF}')
        .unwrap_or(source_code)
        .lines()
        .collect()
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData<'_>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source ", is_focused);

    let lines = display_lines(data.source_code);
    let total_lines = lines.len();
    let visible_height = visible_height(area);

    // Keep the selected line at the target row, centered by default
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height - 1);
    scroll_state.target_line_row = Some(target_row);

    let current_line = data.selected.map_or(0, |range| range.start.line);
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);

        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let line = idx + 1;
            let chars: Vec<char> = text
                .chars()
                .map(|c| if c == '\t' { ' ' } else { c })
                .collect();
            let styles = line_styles(line, chars.len(), &data);

            let has_error = data.problems.iter().any(|problem| {
                problem.is_error()
                    && problem
                        .location()
                        .is_some_and(|range| range.start.line <= line && line <= range.end.line)
            });

            let num_style = if has_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if line == current_line {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line), num_style)];
            spans.extend(styled_spans(&chars, &styles));
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
