//! Expression parsing implementation
//!
//! Pratt parsing: every token kind that can start an expression has a prefix
//! handler, every binary or postfix operator an infix handler that receives
//! the already parsed left operand. Handlers are registered in
//! [`Parser::new`](crate::parser::Parser::new).
//!
//! # Supported Expressions
//!
//! - Literals: booleans, strings, numbers, arrays `[a, b]`
//! - Names, plain or backtick-wrapped
//! - Prefix operators: `!`, `-`, `~`
//! - Binary operators: `+ - * /` and comparisons
//! - Postfix: calls `f(x)` and indexing `a[i]`
//! - Grouping: `(expr)`
//!
//! Member access (`a.b`) is recognised but not supported yet.

use crate::diagnostics::ProblemCode;
use crate::parser::ast::*;
use crate::parser::parse::{identifier_name, Parser, Precedence};
use crate::parser::token::TokenKind;

impl<'a> Parser<'a> {
    /// Parse an expression whose operators bind tighter than `precedence`.
    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = self.prefix_fn(self.current.kind) else {
            let (location, got) = (self.current.location.clone(), self.current.kind);
            self.error(location, ProblemCode::ExpectedExpression(got));
            return None;
        };

        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = self.infix_fn(self.peek.kind) else {
                return Some(left);
            };

            self.advance();
            left = infix(self, left)?;
        }

        Some(left)
    }

    // ===== Prefix handlers =====

    pub(crate) fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(BooleanLiteral {
            value: self.current.literal == "true",
            location: self.current.location.clone(),
        }))
    }

    pub(crate) fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::String(StringLiteral {
            value: self.current.literal.clone(),
            location: self.current.location.clone(),
        }))
    }

    pub(crate) fn parse_name(&mut self) -> Option<Expression> {
        Some(Expression::Name(Name {
            name: identifier_name(&self.current.literal),
            location: self.current.location.clone(),
        }))
    }

    pub(crate) fn parse_number_literal(&mut self) -> Option<Expression> {
        let kind = match self.current.kind {
            TokenKind::Int => NumberKind::Int,
            TokenKind::Float => NumberKind::Float,
            TokenKind::Imaginary => NumberKind::Imaginary,
            _ => return None,
        };

        Some(Expression::Number(NumberLiteral {
            kind,
            literal: self.current.literal.clone(),
            location: self.current.location.clone(),
        }))
    }

    pub(crate) fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = PrefixOperator::from_token(self.current.kind)?;
        let start = self.current.location.start.clone();

        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix(PrefixExpression {
            start,
            operator,
            right: Box::new(right),
        }))
    }

    /// `( expression )`
    pub(crate) fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::CloseParen)?;
        Some(expression)
    }

    /// `[ a, b, ... ]`
    pub(crate) fn parse_array_literal(&mut self) -> Option<Expression> {
        let start = self.current.location.clone();
        let elements = self.parse_expression_list(TokenKind::CloseBracket)?;

        Some(Expression::Array(ArrayLiteral {
            elements,
            location: start.to(&self.current.location),
        }))
    }

    // ===== Infix handlers =====

    pub(crate) fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = InfixOperator::from_token(self.current.kind)?;
        let precedence = self.current_precedence();

        self.advance();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    /// `function(arguments)`, entered on `(`.
    pub(crate) fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::CloseParen)?;

        Some(Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
            end: self.current.location.end.clone(),
        }))
    }

    /// `left[index]`, entered on `[`.
    pub(crate) fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::CloseBracket)?;

        Some(Expression::Index(IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
            end: self.current.location.end.clone(),
        }))
    }

    /// `left.member` is not supported yet; reported, yields nothing.
    pub(crate) fn parse_member_access(&mut self, left: Expression) -> Option<Expression> {
        self.expect_peek_no_err(TokenKind::Identifier);
        let location = left.location().to(&self.current.location);
        self.error(location, ProblemCode::UnsupportedMemberAccess);
        None
    }

    /// Comma separated expressions, entered on the opening delimiter and
    /// finished on `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.expect_peek_no_err(end) {
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.expect_peek_no_err(TokenKind::Comma) {
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Some(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ProblemHandler;

    fn parse(source: &str) -> (Option<Expression>, ProblemHandler) {
        let mut problems = ProblemHandler::new();
        let expression =
            Parser::new("t.tl", source.as_bytes(), &mut problems)
                .parse_expression(Precedence::Lowest);
        (expression, problems)
    }

    /// Fully parenthesized rendering, for checking tree shape.
    fn show(expression: &Expression) -> String {
        match expression {
            Expression::Prefix(e) => format!("({}{})", e.operator, show(&e.right)),
            Expression::Infix(e) => {
                format!("({} {} {})", show(&e.left), e.operator, show(&e.right))
            }
            Expression::Call(e) => {
                let arguments: Vec<String> = e.arguments.iter().map(show).collect();
                format!("{}({})", show(&e.function), arguments.join(", "))
            }
            Expression::Index(e) => format!("{}[{}]", show(&e.left), show(&e.index)),
            Expression::Name(e) => e.name.clone(),
            Expression::Boolean(e) => e.value.to_string(),
            Expression::String(e) => format!("{:?}", e.value),
            Expression::Number(e) => e.literal.clone(),
            Expression::Array(e) => {
                let elements: Vec<String> = e.elements.iter().map(show).collect();
                format!("[{}]", elements.join(", "))
            }
            Expression::Map(_) => "map".to_string(),
        }
    }

    fn shape(source: &str) -> String {
        let (expression, problems) = parse(source);
        assert!(problems.is_empty(), "{source}: {:?}", problems.problems());
        show(&expression.unwrap())
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(shape("1 * 2 + 3"), "((1 * 2) + 3)");
        assert_eq!(shape("a + b + c"), "((a + b) + c)");
        assert_eq!(shape("a < b == c > d"), "((a < b) == (c > d))");
        assert_eq!(shape("-a * b"), "((-a) * b)");
        assert_eq!(shape("!true == false"), "((!true) == false)");
        assert_eq!(shape("~x / 2"), "((~x) / 2)");
    }

    #[test]
    fn test_grouping() {
        let (expression, problems) = parse("(true + false) == true");
        assert!(problems.is_empty());
        let Some(Expression::Infix(outer)) = expression else {
            panic!("expected infix expression");
        };
        assert_eq!(outer.operator, InfixOperator::Eq);
        assert!(matches!(*outer.right, Expression::Boolean(ref b) if b.value));
        let Expression::Infix(inner) = *outer.left else {
            panic!("expected nested infix expression");
        };
        assert_eq!(inner.operator, InfixOperator::Add);
        assert!(matches!(*inner.left, Expression::Boolean(ref b) if b.value));
        assert!(matches!(*inner.right, Expression::Boolean(ref b) if !b.value));
    }

    #[test]
    fn test_calls_and_indexing() {
        assert_eq!(shape("f()"), "f()");
        assert_eq!(shape("f(1, g(x), \"s\")"), "f(1, g(x), \"s\")");
        assert_eq!(shape("f(x)[0]"), "f(x)[0]");
        assert_eq!(shape("a[i + 1] * 2"), "(a[(i + 1)] * 2)");
        assert_eq!(shape("-f(x)"), "(-f(x))");
    }

    #[test]
    fn test_call_location_ends_after_paren() {
        let (expression, _) = parse("print(1)  ");
        assert_eq!(expression.unwrap().location().byte_range(), 0..8);
    }

    #[test]
    fn test_array_and_number_literals() {
        assert_eq!(shape("[1, 2.5, 3i]"), "[1, 2.5, 3i]");
        assert_eq!(shape("[]"), "[]");
        assert_eq!(shape("`my name` + 1"), "(my name + 1)");

        let (expression, _) = parse("0x1p4");
        assert!(matches!(
            expression,
            Some(Expression::Number(ref n)) if n.kind == NumberKind::Float
        ));
    }

    #[test]
    fn test_statement_terminator_stops_loop() {
        let mut problems = ProblemHandler::new();
        let mut parser = Parser::new("t.tl", b"a; + b", &mut problems);
        let expression = parser.parse_expression(Precedence::Lowest);
        assert!(matches!(expression, Some(Expression::Name(_))));
        assert!(parser.peek_is(TokenKind::Semicolon));
    }

    #[test]
    fn test_missing_prefix_handler_is_reported() {
        let (expression, problems) = parse("* 2");
        assert!(expression.is_none());
        assert_eq!(
            problems.problems()[0].code(),
            &ProblemCode::ExpectedExpression(TokenKind::Mul)
        );

        let (expression, problems) = parse("1 +");
        assert!(expression.is_none());
        assert_eq!(
            problems.problems()[0].code(),
            &ProblemCode::ExpectedExpression(TokenKind::Eof)
        );
    }

    #[test]
    fn test_unclosed_group() {
        let (expression, problems) = parse("(1 + 2");
        assert!(expression.is_none());
        assert_eq!(
            problems.problems()[0].code(),
            &ProblemCode::UnexpectedToken {
                wanted: TokenKind::CloseParen,
                got: TokenKind::Eof
            }
        );
    }

    #[test]
    fn test_member_access_is_unsupported() {
        let (expression, problems) = parse("a.b");
        assert!(expression.is_none());
        assert_eq!(problems.len(), 1);
        assert_eq!(problems.problems()[0].code(), &ProblemCode::UnsupportedMemberAccess);
        assert_eq!(
            problems.problems()[0].location().map(|r| r.byte_range()),
            Some(0..3)
        );
    }
}
