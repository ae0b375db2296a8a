//! Diagnostic values produced by the lexer and the parser
//!
//! A [`CodeProblem`] is created at the moment a problem is detected and is never
//! modified afterwards. Problems have two independent properties:
//!
//! - [`Severity`]: errors make the compilation unit fail, warnings are advisory.
//! - [`Scope`]: local problems point at a [`CodeRange`], global ones (for example
//!   an unreadable input file) have no location.

use super::location::CodeRange;
use crate::parser::token::TokenKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// Every kind of problem the front end can report, together with the values
/// its message is formatted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemCode {
    // Global
    UnableToReadFile(String),

    // Lexical
    IllegalNullCharacter,
    IllegalUtf8Encoding,
    UnexpectedCharacter(char),
    NotClosedWrappedIdentifier,
    NotClosedMultiLineComment,
    NotClosedString,
    UnknownEscapeSequence,
    EscapeSequenceNotTerminated,
    IllegalCharacterInEscapeSequence(char),
    EscapeSequenceIsInvalidCodePoint,
    InvalidRadixPoint(&'static str),
    HasNoDigits(&'static str),
    ExponentRequiresDecimalMantissa(char),
    ExponentRequiresHexadecimalMantissa(char),
    ExponentHasNoDigits,
    HexadecimalMantissaRequiresPExponent,
    InvalidDigit {
        digit: char,
        literal: &'static str,
    },
    UnderscoreMustSeparateSuccessiveDigits,

    // Syntax
    UnexpectedToken {
        wanted: TokenKind,
        got: TokenKind,
    },
    UnexpectedTokenNoExpectation(TokenKind),
    ExpectedExpression(TokenKind),
    UnsupportedMemberAccess,
    UnsupportedStructureDeclaration,
    SkippedTopLevelTokens(TokenKind),
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemCode::UnableToReadFile(path) => write!(f, "unable to read file `{}`", path),
            ProblemCode::IllegalNullCharacter => write!(f, "illegal null character"),
            ProblemCode::IllegalUtf8Encoding => write!(f, "illegal UTF-8 encoding"),
            ProblemCode::UnexpectedCharacter(c) => {
                write!(f, "unexpected character `{}`", c.escape_debug())
            }
            ProblemCode::NotClosedWrappedIdentifier => write!(f, "not closed wrapped identifier"),
            ProblemCode::NotClosedMultiLineComment => write!(f, "not closed multiline comment"),
            ProblemCode::NotClosedString => write!(f, "not closed string literal"),
            ProblemCode::UnknownEscapeSequence => write!(f, "unknown escape sequence"),
            ProblemCode::EscapeSequenceNotTerminated => write!(f, "escape sequence not terminated"),
            ProblemCode::IllegalCharacterInEscapeSequence(c) => write!(
                f,
                "illegal character U+{:04X} {:?} in escape sequence",
                *c as u32, c
            ),
            ProblemCode::EscapeSequenceIsInvalidCodePoint => {
                write!(f, "escape sequence is invalid Unicode code point")
            }
            ProblemCode::InvalidRadixPoint(literal) => {
                write!(f, "invalid radix point in {}", literal)
            }
            ProblemCode::HasNoDigits(literal) => write!(f, "{} has no digits", literal),
            ProblemCode::ExponentRequiresDecimalMantissa(e) => {
                write!(f, "{:?} exponent requires decimal mantissa", e)
            }
            ProblemCode::ExponentRequiresHexadecimalMantissa(e) => {
                write!(f, "{:?} exponent requires hexadecimal mantissa", e)
            }
            ProblemCode::ExponentHasNoDigits => write!(f, "exponent has no digits"),
            ProblemCode::HexadecimalMantissaRequiresPExponent => {
                write!(f, "hexadecimal mantissa requires `p` exponent")
            }
            ProblemCode::InvalidDigit { digit, literal } => {
                write!(f, "invalid digit {:?} in {}", digit, literal)
            }
            ProblemCode::UnderscoreMustSeparateSuccessiveDigits => {
                write!(f, "`_` must separate successive digits")
            }
            ProblemCode::UnexpectedToken { wanted, got } => write!(
                f,
                "unexpected token: wanted {}, got {}",
                wanted.name(),
                got.name()
            ),
            ProblemCode::UnexpectedTokenNoExpectation(got) => {
                write!(f, "didn't expect {} here", got.name())
            }
            ProblemCode::ExpectedExpression(got) => {
                write!(f, "expected expression, got {}", got.name())
            }
            ProblemCode::UnsupportedMemberAccess => {
                write!(f, "member access expressions are not supported")
            }
            ProblemCode::UnsupportedStructureDeclaration => {
                write!(f, "structure declarations are not supported")
            }
            ProblemCode::SkippedTopLevelTokens(first) => write!(
                f,
                "skipping tokens starting with {} outside of a declaration",
                first.name()
            ),
        }
    }
}

/// A single error or warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeProblem {
    severity: Severity,
    location: Option<CodeRange>,
    code: ProblemCode,
}

impl CodeProblem {
    pub fn local_error(location: CodeRange, code: ProblemCode) -> Self {
        Self {
            severity: Severity::Error,
            location: Some(location),
            code,
        }
    }

    pub fn local_warning(location: CodeRange, code: ProblemCode) -> Self {
        Self {
            severity: Severity::Warning,
            location: Some(location),
            code,
        }
    }

    pub fn global_error(code: ProblemCode) -> Self {
        Self {
            severity: Severity::Error,
            location: None,
            code,
        }
    }

    pub fn global_warning(code: ProblemCode) -> Self {
        Self {
            severity: Severity::Warning,
            location: None,
            code,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn scope(&self) -> Scope {
        if self.location.is_some() {
            Scope::Local
        } else {
            Scope::Global
        }
    }

    /// `None` iff the problem is global.
    pub fn location(&self) -> Option<&CodeRange> {
        self.location.as_ref()
    }

    pub fn code(&self) -> &ProblemCode {
        &self.code
    }

    /// Formatted message without location or severity prefix.
    pub fn message(&self) -> String {
        self.code.to_string()
    }
}

impl fmt::Display for CodeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(range) => write!(
                f,
                "{}({}:{}) {}: {}",
                range.start.file, range.start.line, range.start.column, self.severity, self.code
            ),
            None => write!(f, "{}: {}", self.severity, self.code),
        }
    }
}

impl std::error::Error for CodeProblem {}
