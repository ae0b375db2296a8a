//! Per-unit accumulator for lexical and syntax problems

use super::problem::{CodeProblem, Severity};
use tracing::debug;

/// Append-only log of the problems found in one compilation unit.
///
/// The lexer and the parser that owns it both write to the same handler through
/// a `&mut` borrow handed out by the caller; problems are kept in the order they
/// were recorded. [`ok`](Self::ok) stays `true` until the first error-severity
/// problem arrives and never flips back.
#[derive(Debug, Clone)]
pub struct ProblemHandler {
    ok: bool,
    problems: Vec<CodeProblem>,
}

impl Default for ProblemHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemHandler {
    pub fn new() -> Self {
        Self {
            ok: true,
            problems: Vec::new(),
        }
    }

    pub fn add(&mut self, problem: CodeProblem) {
        debug!(severity = %problem.severity(), message = %problem.code(), "recorded problem");
        if problem.is_error() {
            self.ok = false;
        }
        self.problems.push(problem);
    }

    /// `true` iff no error-severity problem has been recorded.
    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn problems(&self) -> &[CodeProblem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<CodeProblem> {
        self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity() == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::location::{CodePointLocation, CodeRange};
    use crate::diagnostics::problem::ProblemCode;
    use crate::parser::token::TokenKind;
    use std::rc::Rc;

    fn range() -> CodeRange {
        CodeRange::one_code_point(&CodePointLocation::start_of(Rc::from("t.tl")))
    }

    #[test]
    fn test_warnings_keep_unit_ok() {
        let mut handler = ProblemHandler::new();
        handler.add(CodeProblem::local_warning(
            range(),
            ProblemCode::SkippedTopLevelTokens(TokenKind::Var),
        ));
        assert!(handler.ok());
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.error_count(), 0);
    }

    #[test]
    fn test_errors_are_sticky() {
        let mut handler = ProblemHandler::new();
        handler.add(CodeProblem::local_error(range(), ProblemCode::NotClosedString));
        handler.add(CodeProblem::local_warning(
            range(),
            ProblemCode::SkippedTopLevelTokens(TokenKind::Var),
        ));
        assert!(!handler.ok());
        assert_eq!(handler.len(), 2);
        // recorded order is preserved
        assert_eq!(handler.problems()[0].code(), &ProblemCode::NotClosedString);
    }
}
