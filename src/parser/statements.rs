//! Statement parsing implementation
//!
//! This module handles parsing of function bodies:
//!
//! - Statement blocks: `{ ... }`
//! - Variable statements: `var x int32 = 42;`
//! - Return statements: `return;`, `return value;`
//! - Expression statements: `f(x);`
//!
//! # Grammar
//!
//! ```text
//! block     ::= "{" statement* "}"
//! statement ::= var_stmt | return_stmt | ";" | expression ";"?
//! var_stmt  ::= "var" identifier type? ("=" expression)? ";"?
//! return    ::= "return" (";" | expression ";"?)?
//! ```
//!
//! A trailing `;` is optional everywhere.

use crate::diagnostics::ProblemCode;
use crate::parser::ast::*;
use crate::parser::parse::{identifier_name, Parser, Precedence};
use crate::parser::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parse a `{ ... }` block, starting at `{` and ending at `}`.
    pub(crate) fn parse_block(&mut self) -> Option<StatementsBlock> {
        let open_brace = self.current.location.start.clone();
        let mut statements = Vec::new();

        self.advance();
        while !self.current_is(TokenKind::CloseBrace) {
            if self.current_is(TokenKind::Eof) {
                let location = self.current.location.clone();
                self.error(
                    location,
                    ProblemCode::UnexpectedToken {
                        wanted: TokenKind::CloseBrace,
                        got: TokenKind::Eof,
                    },
                );
                return None;
            }

            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                // a failed statement may stop on the block's own `}`
                None if self.current_is(TokenKind::CloseBrace) => continue,
                None => {}
            }
            self.advance();
        }

        Some(StatementsBlock {
            open_brace,
            statements,
        })
    }

    /// Parse one statement starting at the current token.
    ///
    /// An empty statement (a lone `;`) yields `None` without a problem.
    pub fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::Var => self.parse_var_statement().map(Statement::Var),
            TokenKind::Semicolon => None,
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let keyword = self.current.location.clone();

        if self.expect_peek_no_err(TokenKind::Semicolon) {
            return Some(ReturnStatement {
                keyword,
                value: None,
            });
        }

        // `return }` leaves the brace to the enclosing block
        if self.peek_is(TokenKind::CloseBrace) {
            return Some(ReturnStatement {
                keyword,
                value: None,
            });
        }

        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek_no_err(TokenKind::Semicolon);

        Some(ReturnStatement {
            keyword,
            value: Some(value),
        })
    }

    fn parse_var_statement(&mut self) -> Option<VarStatement> {
        let keyword = self.current.location.clone();

        self.expect_peek(TokenKind::Identifier)?;
        let name = Name {
            name: identifier_name(&self.current.literal),
            location: self.current.location.clone(),
        };

        let ty = if starts_type(self.peek.kind) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let value = if self.expect_peek_no_err(TokenKind::Assign) {
            self.advance();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };

        self.expect_peek_no_err(TokenKind::Semicolon);

        Some(VarStatement {
            keyword,
            name,
            ty,
            value,
        })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek_no_err(TokenKind::Semicolon);
        Some(Statement::Expression(expression))
    }
}

fn starts_type(kind: TokenKind) -> bool {
    kind.is_primary_type()
        || matches!(
            kind,
            TokenKind::Mul | TokenKind::OpenBracket | TokenKind::Identifier
        )
}
