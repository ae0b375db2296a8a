//! # Introduction
//!
//! tinyc is the front end of the tiny programming language: it turns source
//! bytes into tokens and an AST, collecting every lexical and syntax problem
//! it meets along the way instead of stopping at the first one.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST
//!            \        /
//!          ProblemHandler → Renderer
//! ```
//!
//! 1. [`diagnostics`]: source locations, problem codes, the per-unit
//!    [`diagnostics::ProblemHandler`] and the text renderer.
//! 2. [`parser`]: the [`parser::Lexer`], the Pratt [`parser::Parser`] and the
//!    [`parser::ast`] node model.
//! 3. [`ui`]: the ratatui-based inspector behind `tinyc view`; not part of
//!    the stable library API.
//!
//! ## Example
//!
//! ```
//! use tinyc::diagnostics::ProblemHandler;
//! use tinyc::parser::parse_file;
//!
//! let mut problems = ProblemHandler::new();
//! let source = b"namespace \"app\"; fun main() { return true; }";
//! let (unit, _lines) = parse_file("main.tl", source, &mut problems);
//!
//! assert!(problems.ok());
//! assert_eq!(unit.unwrap().statements[0].name(), "main");
//! ```

pub mod diagnostics;
pub mod parser;
pub mod ui;
