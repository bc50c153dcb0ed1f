//! Common infrastructure shared by every phase

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::{Location, Span};
