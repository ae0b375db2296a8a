//! Human-readable rendering of recorded problems
//!
//! ```text
//! main.tl(3:11) error: not closed string literal
//!    |
//!  3 |     return "abc
//!    |            ^~~~
//! ```
//!
//! Source excerpts are located through a [`LineTable`]: the lexer records the
//! byte offsets where each line starts and ends while it advances, so rendering
//! never has to rescan the buffer.

use super::handler::ProblemHandler;
use super::problem::{CodeProblem, Severity};
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::ops::Range;

/// Byte offsets of line starts and (exclusive) line ends.
///
/// Line `n` (1-based) spans `starts[n - 1]..ends[n - 1]`; the end offset points
/// at the line feed, or at the end of the buffer for the last line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl LineTable {
    pub fn new(first_line_start: usize) -> Self {
        Self {
            starts: vec![first_line_start],
            ends: Vec::new(),
        }
    }

    /// Builds the table the lexer would record for `source`.
    pub fn from_source(source: &[u8]) -> Self {
        let mut table = Self::new(0);
        for (index, byte) in source.iter().enumerate() {
            if *byte == b'\n' {
                table.record_line_break(index);
            }
        }
        table.record_end(source.len());
        table
    }

    /// A line feed at `index` ends the current line and starts the next one.
    pub fn record_line_break(&mut self, index: usize) {
        self.ends.push(index);
        self.starts.push(index + 1);
    }

    /// End of input closes the last line.
    pub fn record_end(&mut self, index: usize) {
        if self.ends.len() < self.starts.len() {
            self.ends.push(index);
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte range of `line` without its line terminator.
    ///
    /// Falls back to scanning `source` when the line end was never recorded
    /// (the lexer stopped before reaching it).
    pub fn line_bounds(&self, line: usize, source: &[u8]) -> Option<Range<usize>> {
        let start = (*self.starts.get(line.checked_sub(1)?)?).min(source.len());
        let end = match self.ends.get(line - 1) {
            Some(end) => (*end).min(source.len()),
            None => source[start..]
                .iter()
                .position(|b| *b == b'\n')
                .map_or(source.len(), |offset| start + offset),
        };
        let end = if end > start && source[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };
        Some(start..end.max(start))
    }
}

/// Writes problems with optional ANSI styling.
pub struct Renderer<'a> {
    source: &'a [u8],
    lines: &'a LineTable,
    colorful: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a [u8], lines: &'a LineTable) -> Self {
        Self {
            source,
            lines,
            colorful: false,
        }
    }

    pub fn with_color(mut self, colorful: bool) -> Self {
        self.colorful = colorful;
        self
    }

    /// Every problem in recorded order, followed by the abort notice when the
    /// unit failed.
    pub fn render_diagnostics<W: Write>(
        &self,
        out: &mut W,
        handler: &ProblemHandler,
    ) -> io::Result<()> {
        self.render_problems(out, handler.problems())?;
        if !handler.ok() {
            writeln!(
                out,
                "{}",
                self.paint("error: aborting due to previous error(-s)", Severity::Error)
            )?;
        }
        Ok(())
    }

    pub fn render_problems<W: Write>(
        &self,
        out: &mut W,
        problems: &[CodeProblem],
    ) -> io::Result<()> {
        for problem in problems {
            self.render_problem(out, problem)?;
        }
        Ok(())
    }

    pub fn render_problem<W: Write>(&self, out: &mut W, problem: &CodeProblem) -> io::Result<()> {
        let label = self.paint(&format!("{}:", problem.severity()), problem.severity());

        let Some(range) = problem.location() else {
            return writeln!(out, "{} {}", label, problem.code());
        };

        writeln!(
            out,
            "{}({}:{}) {} {}",
            range.start.file,
            range.start.line,
            range.start.column,
            label,
            problem.code()
        )?;

        let Some(line) = self.lines.line_bounds(range.start.line, self.source) else {
            return Ok(());
        };

        let highlight_start = range.start.index.clamp(line.start, line.end);
        let highlight_end = if range.end.line == range.start.line {
            range.end.index.clamp(highlight_start, line.end)
        } else {
            line.end
        };

        let before = self.excerpt(line.start..highlight_start);
        let marked = self.excerpt(highlight_start..highlight_end);
        let after = self.excerpt(highlight_end..line.end);

        let line_number = range.start.line.to_string();
        let gutter = " ".repeat(line_number.len() + 2);

        writeln!(out, "{}|", gutter)?;
        writeln!(
            out,
            " {} | {}{}{}",
            line_number,
            before,
            self.paint(&marked, problem.severity()),
            after
        )?;

        let underline = format!(
            "^{}",
            "~".repeat(marked.chars().count().saturating_sub(1))
        );
        writeln!(
            out,
            "{}|{}{}",
            gutter,
            " ".repeat(range.start.column + 1),
            self.paint(&underline, problem.severity())
        )?;
        writeln!(out)
    }

    fn excerpt(&self, range: Range<usize>) -> String {
        String::from_utf8_lossy(&self.source[range]).replace('\t', " ")
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.colorful || text.is_empty() {
            return text.to_string();
        }
        match severity {
            Severity::Error => text.red().bold().to_string(),
            Severity::Warning => text.yellow().to_string(),
        }
    }
}
