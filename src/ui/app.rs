//! Main TUI application state and logic

use crate::diagnostics::{CodeProblem, CodeRange, ProblemHandler};
use crate::parser::{parse_file_with_tokens, Token};
use crate::ui::panes::{
    render_problems_pane, render_source_pane, render_status_bar, render_tokens_pane,
    SourceRenderData, SourceScrollState, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Problems,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> problems)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Problems,
            FocusedPane::Problems => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Problems,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Problems => FocusedPane::Tokens,
        }
    }
}

/// Selected row and first visible row of a list pane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: usize,
    pub offset: usize,
}

impl Selection {
    pub fn up(&mut self, by: usize) {
        self.selected = self.selected.saturating_sub(by);
    }

    pub fn down(&mut self, by: usize, len: usize) {
        if len > 0 {
            self.selected = self.selected.saturating_add(by).min(len - 1);
        }
    }

    pub fn last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

/// The main application state
pub struct App {
    /// Name of the inspected file
    pub file: String,

    /// The source text, lossily decoded for display
    pub source_code: String,

    /// Every token through EOF, comments included
    pub tokens: Vec<Token>,

    /// Problems recorded while parsing, in recorded order
    pub problems: Vec<CodeProblem>,
    pub error_count: usize,
    pub warning_count: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub token_selection: Selection,
    pub problem_selection: Selection,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Lex and parse `source`, collecting what the panes show.
    pub fn new(file: &str, source: &[u8]) -> Self {
        let mut problems = ProblemHandler::new();
        let (unit, tokens, _) = parse_file_with_tokens(file, source, &mut problems);

        let status_message = match &unit {
            Some(unit) => format!(
                "{} declaration(s) in namespace \"{}\"",
                unit.statements.len(),
                unit.namespace.name
            ),
            None => "No program unit: the namespace header did not parse".to_string(),
        };

        debug!(
            file,
            tokens = tokens.len(),
            problems = problems.len(),
            "loaded file into inspector"
        );

        App {
            file: file.to_string(),
            source_code: String::from_utf8_lossy(source).into_owned(),
            tokens,
            error_count: problems.error_count(),
            warning_count: problems.warning_count(),
            focused_pane: if problems.is_empty() {
                FocusedPane::Tokens
            } else {
                FocusedPane::Problems
            },
            problems: problems.into_problems(),
            source_scroll: SourceScrollState::default(),
            token_selection: Selection::default(),
            problem_selection: Selection::default(),
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// The range the source pane highlights and keeps in view: the selected
    /// problem while the problem list is focused, the selected token otherwise.
    pub fn selected_range(&self) -> Option<&CodeRange> {
        match self.focused_pane {
            FocusedPane::Problems => self
                .problems
                .get(self.problem_selection.selected)
                .and_then(|problem| problem.location()),
            FocusedPane::Source | FocusedPane::Tokens => self
                .tokens
                .get(self.token_selection.selected)
                .map(|token| &token.location),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Right column: Tokens (top) | Problems (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        let selected = self.selected_range().cloned();

        render_source_pane(
            frame,
            columns[0],
            SourceRenderData {
                source_code: &self.source_code,
                tokens: &self.tokens,
                problems: &self.problems,
                selected: selected.as_ref(),
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_tokens_pane(
            frame,
            right_rows[0],
            &self.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_selection,
        );

        render_problems_pane(
            frame,
            right_rows[1],
            &self.problems,
            self.focused_pane == FocusedPane::Problems,
            &mut self.problem_selection,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                file: &self.file,
                message: &self.status_message,
                token_count: self.tokens.len(),
                error_count: self.error_count,
                warning_count: self.warning_count,
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
                self.describe_selection();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
                self.describe_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp => self.move_up(PAGE),
            KeyCode::PageDown => self.move_down(PAGE),
            KeyCode::Home => {
                if let Some(selection) = self.focused_selection() {
                    selection.selected = 0;
                }
                self.describe_selection();
            }
            KeyCode::End => {
                let len = self.focused_len();
                if let Some(selection) = self.focused_selection() {
                    selection.last(len);
                }
                self.describe_selection();
            }
            // Jump between problems from any pane
            KeyCode::Char('n') => {
                if self.focused_pane == FocusedPane::Problems {
                    self.problem_selection.down(1, self.problems.len());
                }
                self.focused_pane = FocusedPane::Problems;
                self.describe_selection();
            }
            KeyCode::Char('p') => {
                if self.focused_pane == FocusedPane::Problems {
                    self.problem_selection.up(1);
                }
                self.focused_pane = FocusedPane::Problems;
                self.describe_selection();
            }
            _ => {}
        }
    }

    fn move_up(&mut self, by: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling up makes the selected line move down visually
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add(by));
                }
            }
            FocusedPane::Tokens => self.token_selection.up(by),
            FocusedPane::Problems => self.problem_selection.up(by),
        }
        self.describe_selection();
    }

    fn move_down(&mut self, by: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_sub(by));
                }
            }
            FocusedPane::Tokens => self.token_selection.down(by, self.tokens.len()),
            FocusedPane::Problems => self.problem_selection.down(by, self.problems.len()),
        }
        self.describe_selection();
    }

    fn focused_selection(&mut self) -> Option<&mut Selection> {
        match self.focused_pane {
            FocusedPane::Source => None,
            FocusedPane::Tokens => Some(&mut self.token_selection),
            FocusedPane::Problems => Some(&mut self.problem_selection),
        }
    }

    fn focused_len(&self) -> usize {
        match self.focused_pane {
            FocusedPane::Source => 0,
            FocusedPane::Tokens => self.tokens.len(),
            FocusedPane::Problems => self.problems.len(),
        }
    }

    /// Put the selected token or problem into the status bar.
    fn describe_selection(&mut self) {
        let message = match self.focused_pane {
            FocusedPane::Source => return,
            FocusedPane::Tokens => self.tokens.get(self.token_selection.selected).map(|token| {
                format!(
                    "{} {:?} at {}:{}",
                    token.kind,
                    token.literal,
                    token.location.start.line,
                    token.location.start.column
                )
            }),
            FocusedPane::Problems => self
                .problems
                .get(self.problem_selection.selected)
                .map(|problem| format!("{}: {}", problem.severity(), problem.message())),
        };

        if let Some(message) = message {
            self.status_message = message;
        }
    }
}
