//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct: the two-token window over the
//! lexer, the token-matching helpers every production uses, and the Pratt
//! handler tables.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, token window, `expect_*` helpers
//! - `declarations`: namespace, imports, functions, structures and types
//! - `statements`: statement blocks, `return`, `var`, expression statements
//! - `expressions`: Pratt expression parsing
//!
//! Parser methods are split across these files using `impl Parser` blocks.
//!
//! # Conventions
//!
//! Every `parse_*` method starts with [`Parser::current`] on the first token
//! of its construct and returns with `current` on the construct's last token.
//! A production that fails records a problem and returns `None`; its caller
//! gives up on the enclosing construct in turn, while sibling declarations are
//! still attempted.

use crate::diagnostics::{CodeProblem, CodeRange, LineTable, ProblemCode, ProblemHandler};
use crate::parser::ast::Expression;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenKind};
use rustc_hash::FxHashMap;

/// Binding strength of an operator, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,        // == !=
    LessOrGreater, // < > <= >=
    Sum,           // + -
    Product,       // * /
    Prefix,        // !x -x ~x
    FunctionCall,  // f(x)
    Index,         // a[i] a.b
}

impl Precedence {
    /// Infix binding strength of `kind`; `Lowest` for non-operators.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::Neq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => {
                Precedence::LessOrGreater
            }
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Mul | TokenKind::Div => Precedence::Product,
            TokenKind::OpenParen => Precedence::FunctionCall,
            TokenKind::OpenBracket | TokenKind::Dot => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub(crate) type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Option<Expression>;
pub(crate) type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> Option<Expression>;

/// Recursive descent parser with Pratt expression parsing
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Every token read from the lexer, comments included, through the first EOF
    consumed: Vec<Token>,
    pub(crate) current: Token,
    pub(crate) peek: Token,
    prefix_fns: FxHashMap<TokenKind, PrefixParseFn<'a>>,
    infix_fns: FxHashMap<TokenKind, InfixParseFn<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(file: &str, source: &'a [u8], problems: &'a mut ProblemHandler) -> Self {
        let mut lexer = Lexer::new(file, source, problems);
        let mut consumed = Vec::new();
        let current = next_significant(&mut lexer, &mut consumed);
        let peek = next_significant(&mut lexer, &mut consumed);

        let mut parser = Self {
            lexer,
            consumed,
            current,
            peek,
            prefix_fns: FxHashMap::default(),
            infix_fns: FxHashMap::default(),
        };
        parser.register_handlers();
        parser
    }

    fn register_handlers(&mut self) {
        self.register_prefix(TokenKind::Boolean, Parser::parse_boolean_literal);
        self.register_prefix(TokenKind::String, Parser::parse_string_literal);
        self.register_prefix(TokenKind::Identifier, Parser::parse_name);
        self.register_prefix(TokenKind::Int, Parser::parse_number_literal);
        self.register_prefix(TokenKind::Float, Parser::parse_number_literal);
        self.register_prefix(TokenKind::Imaginary, Parser::parse_number_literal);
        self.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        self.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        self.register_prefix(TokenKind::Not, Parser::parse_prefix_expression);
        self.register_prefix(TokenKind::OpenParen, Parser::parse_grouped_expression);
        self.register_prefix(TokenKind::OpenBracket, Parser::parse_array_literal);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Mul,
            TokenKind::Div,
            TokenKind::Eq,
            TokenKind::Neq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Lte,
            TokenKind::Gte,
        ] {
            self.register_infix(kind, Parser::parse_infix_expression);
        }
        self.register_infix(TokenKind::OpenParen, Parser::parse_call_expression);
        self.register_infix(TokenKind::OpenBracket, Parser::parse_index_expression);
        self.register_infix(TokenKind::Dot, Parser::parse_member_access);
    }

    pub(crate) fn register_prefix(&mut self, kind: TokenKind, function: PrefixParseFn<'a>) {
        self.prefix_fns.insert(kind, function);
    }

    pub(crate) fn register_infix(&mut self, kind: TokenKind, function: InfixParseFn<'a>) {
        self.infix_fns.insert(kind, function);
    }

    pub(crate) fn prefix_fn(&self, kind: TokenKind) -> Option<PrefixParseFn<'a>> {
        self.prefix_fns.get(&kind).copied()
    }

    pub(crate) fn infix_fn(&self, kind: TokenKind) -> Option<InfixParseFn<'a>> {
        self.infix_fns.get(&kind).copied()
    }

    pub fn problems(&self) -> &ProblemHandler {
        self.lexer.problems()
    }

    /// Line offsets recorded by the lexer, for rendering problems.
    pub fn into_line_table(self) -> LineTable {
        self.lexer.into_line_table()
    }

    /// Tokens read so far, comments included.
    pub fn tokens(&self) -> &[Token] {
        &self.consumed
    }

    /// Scans whatever input the parser did not reach and returns every token
    /// of the file through EOF, together with the line table.
    pub fn into_tokens(mut self) -> (Vec<Token>, LineTable) {
        while !reached_eof(&self.consumed) {
            let token = self.lexer.next_token();
            self.consumed.push(token);
        }
        (self.consumed, self.lexer.into_line_table())
    }

    // ===== Token window =====

    /// Shift the window by one token, skipping comments.
    pub(crate) fn advance(&mut self) {
        let next = next_significant(&mut self.lexer, &mut self.consumed);
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    pub(crate) fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current.kind)
    }

    pub(crate) fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    /// Checks the current token without consuming it.
    pub(crate) fn expect_current(&mut self, kind: TokenKind) -> Option<()> {
        if self.current_is(kind) {
            return Some(());
        }
        let (location, got) = (self.current.location.clone(), self.current.kind);
        self.error(location, ProblemCode::UnexpectedToken { wanted: kind, got });
        None
    }

    /// Advances onto the lookahead token if it has the wanted kind.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.expect_peek_no_err(kind) {
            return Some(());
        }
        let (location, got) = (self.peek.location.clone(), self.peek.kind);
        self.error(location, ProblemCode::UnexpectedToken { wanted: kind, got });
        None
    }

    /// Like [`expect_peek`](Self::expect_peek), but a mismatch is not a
    /// problem.
    pub(crate) fn expect_peek_no_err(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ===== Problems =====

    pub(crate) fn error(&mut self, location: CodeRange, code: ProblemCode) {
        self.lexer.problems_mut().add(CodeProblem::local_error(location, code));
    }

    pub(crate) fn warning(&mut self, location: CodeRange, code: ProblemCode) {
        self.lexer.problems_mut().add(CodeProblem::local_warning(location, code));
    }
}

fn next_significant(lexer: &mut Lexer<'_>, consumed: &mut Vec<Token>) -> Token {
    loop {
        let token = lexer.next_token();
        if !reached_eof(consumed) {
            consumed.push(token.clone());
        }
        if !token.is(TokenKind::Comment) {
            return token;
        }
    }
}

fn reached_eof(tokens: &[Token]) -> bool {
    tokens.last().is_some_and(|t| t.is(TokenKind::Eof))
}

/// Name of a plain or backtick-wrapped identifier.
pub(crate) fn identifier_name(literal: &str) -> String {
    match literal.strip_prefix('`') {
        Some(inner) => inner.strip_suffix('`').unwrap_or(inner).to_string(),
        None => literal.to_string(),
    }
}
