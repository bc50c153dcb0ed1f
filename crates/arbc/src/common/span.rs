//! Source positions

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Where a token starts: 0-based row and column (in characters) plus its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub row: usize,
    pub col: usize,
    pub span: Span,
}

impl Location {
    pub fn new(row: usize, col: usize, span: Span) -> Self {
        Self { row, col, span }
    }
}

