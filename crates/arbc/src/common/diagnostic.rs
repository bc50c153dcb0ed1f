//! Language diagnostics collected by the parser and the semantic analyzer
//!
//! A diagnostic never stops compilation: every phase appends to a shared
//! `Vec<Diagnostic>` and keeps going.

use super::{Location, Span};
use std::fmt;

/// Which phase produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Syntax => write!(f, "syntax error"),
            DiagnosticKind::Semantic => write!(f, "semantic error"),
        }
    }
}

/// A message tied to a row/column in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub row: usize,
    pub col: usize,
    pub span: Span,
}

impl Diagnostic {
    pub fn syntax(message: impl Into<String>, at: Location) -> Self {
        Self::new(DiagnosticKind::Syntax, message, at)
    }

    pub fn semantic(message: impl Into<String>, at: Location) -> Self {
        Self::new(DiagnosticKind::Semantic, message, at)
    }

    fn new(kind: DiagnosticKind, message: impl Into<String>, at: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            row: at.row,
            col: at.col,
            span: at.span,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == DiagnosticKind::Syntax
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}: {}", self.kind, self.row, self.col, self.message)
    }
}
