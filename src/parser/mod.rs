//! Front end for the tiny language
//!
//! This module transforms source bytes into an Abstract Syntax Tree (AST):
//! - [`token`]: Token kinds and the keyword table
//! - [`lexer`]: Tokenization (source bytes → tokens)
//! - [`parse`]: Parser core (tokens → AST), split over `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`dump`]: Text dumps of parsed trees
//!
//! # Supported Language
//!
//! - A `namespace "name";` header followed by `import "path";` lines
//! - `[pub] fun` declarations with typed arguments
//! - Types: `int8`..`int64`, `uint8`..`uint64`, pointers, arrays, custom names
//! - Statements: `var`, `return`, expression statements
//! - Expressions: literals, names, prefix and binary operators, calls, indexing
//!
//! Structure declarations and member access are recognised and reported as
//! unsupported.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent for declarations and statements, Pratt
//! parsing for expressions. Problems are collected in a
//! [`ProblemHandler`](crate::diagnostics::ProblemHandler) rather than
//! returned as errors, so one pass reports everything it finds.

pub mod ast;
mod declarations;
pub mod dump;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod token;

pub use dump::Dump;
pub use lexer::Lexer;
pub use parse::{Parser, Precedence};
pub use token::{Token, TokenKind};

use crate::diagnostics::{LineTable, ProblemHandler};
use ast::ProgramUnit;

/// Parse a whole file, returning the unit (if its header parsed) together
/// with the line table needed to render the recorded problems.
pub fn parse_file(
    file: &str,
    source: &[u8],
    problems: &mut ProblemHandler,
) -> (Option<ProgramUnit>, LineTable) {
    let mut parser = Parser::new(file, source, problems);
    let unit = parser.parse_program_unit();
    (unit, parser.into_line_table())
}

/// Like [`parse_file`], but also returns every token of the file, comments
/// included. Input the parser gave up on is still scanned, so its lexical
/// problems are recorded too.
pub fn parse_file_with_tokens(
    file: &str,
    source: &[u8],
    problems: &mut ProblemHandler,
) -> (Option<ProgramUnit>, Vec<Token>, LineTable) {
    let mut parser = Parser::new(file, source, problems);
    let unit = parser.parse_program_unit();
    let (tokens, lines) = parser.into_tokens();
    (unit, tokens, lines)
}
