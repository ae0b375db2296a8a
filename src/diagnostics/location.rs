//! Source positions and ranges
//!
//! Every token, AST node and [`CodeProblem`](super::CodeProblem) carries its own
//! snapshot of these values. The lexer's cursor is a [`CodePointLocation`] that
//! is mutated while scanning; everything that outlives a single step receives a
//! clone, never a reference to the cursor.

use std::fmt;
use std::rc::Rc;

/// Position of one Unicode code point in a source file.
///
/// `index` is the byte offset of the first UTF-8 byte of the code point,
/// `line` starts at 1 and `column` (counted in code points) starts at 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodePointLocation {
    pub file: Rc<str>,
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl CodePointLocation {
    pub fn new(file: Rc<str>, index: usize, line: usize, column: usize) -> Self {
        Self {
            file,
            index,
            line,
            column,
        }
    }

    /// Location of the first byte of a file.
    pub fn start_of(file: Rc<str>) -> Self {
        Self::new(file, 0, 1, 0)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// The location one byte (and one column) further on the same line.
    pub fn next_byte_location(&self) -> Self {
        Self::new(
            Rc::clone(&self.file),
            self.index + 1,
            self.line,
            self.column + 1,
        )
    }

    /// The location one byte (and one column) back on the same line.
    ///
    /// Saturates at the start of the line; it is only used for ranges whose
    /// width is known to be at least two ASCII characters.
    pub fn previous_byte_location(&self) -> Self {
        Self::new(
            Rc::clone(&self.file),
            self.index.saturating_sub(1),
            self.line,
            self.column.saturating_sub(1),
        )
    }

    /// `CPLocation(file index line column)`, as used in tree dumps.
    pub fn dump(&self) -> String {
        format!(
            "CPLocation({} {} {} {})",
            self.file, self.index, self.line, self.column
        )
    }
}

impl fmt::Display for CodePointLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.file, self.line, self.column)
    }
}

/// A contiguous block of source code, `[start, end)` over byte indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeRange {
    pub start: CodePointLocation,
    pub end: CodePointLocation,
}

impl CodeRange {
    pub fn new(start: CodePointLocation, end: CodePointLocation) -> Self {
        debug_assert!(start.index <= end.index);
        Self { start, end }
    }

    /// `[loc, loc + 1)`: a single ASCII character.
    pub fn one_code_point(location: &CodePointLocation) -> Self {
        Self::new(location.copy(), location.next_byte_location())
    }

    /// `[loc - 1, loc + 1)`: a two-character operator whose second character
    /// sits at `location`.
    pub fn two_code_points(location: &CodePointLocation) -> Self {
        Self::new(
            location.previous_byte_location(),
            location.next_byte_location(),
        )
    }

    /// Range from the start of `self` to the end of `other`.
    pub fn to(&self, other: &CodeRange) -> Self {
        Self::new(self.start.clone(), other.end.clone())
    }

    pub fn len(&self) -> usize {
        self.end.index - self.start.index
    }

    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Byte range suitable for slicing the source buffer.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start.index..self.end.index
    }

    pub fn dump(&self) -> String {
        format!("CBLocation({} {})", self.start.dump(), self.end.dump())
    }
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}:{}-{}:{})",
            self.start.file, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}
