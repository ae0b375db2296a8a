//! Source locations and problem reporting
//!
//! - [`location`]: [`CodePointLocation`] and [`CodeRange`], the coordinates every
//!   token and AST node carries
//! - [`problem`]: [`CodeProblem`] values (severity, scope, code)
//! - [`handler`]: the [`ProblemHandler`] a compilation unit appends to
//! - [`render`]: turning problems into `file(line:col) error: ...` text with a
//!   source excerpt

pub mod handler;
pub mod location;
pub mod problem;
pub mod render;

pub use handler::ProblemHandler;
pub use location::{CodePointLocation, CodeRange};
pub use problem::{CodeProblem, ProblemCode, Scope, Severity};
pub use render::{LineTable, Renderer};
