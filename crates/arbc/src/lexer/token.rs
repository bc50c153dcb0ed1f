//! Token definitions
//!
//! Fixed-spelling tables (reserved words and operators) are logos enums.
//! The scanner runs them one at a time, in priority order, against the
//! remaining input instead of as a single combined automaton.

use crate::common::{Location, Span};
use logos::Logos;
use std::fmt;

/// A token with its category, exact source text and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// End-of-input sentinel; always a valid token to point diagnostics at
    pub fn eof(location: Location) -> Self {
        Self::new(TokenKind::Eof, "", location)
    }

    pub fn span(&self) -> Span {
        self.location.span
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::BlockComment | TokenKind::LineComment)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Names and literals
    Identifier,
    Integer,
    Decimal,
    Str,
    Char,
    Keyword(Keyword),

    // Operators
    Arithmetic(ArithOp),
    Assignment(AssignOp),
    Relational(RelOp),
    Logical(LogicalOp),
    Increment,
    Decrement,
    Concat,

    // Punctuation
    Terminator,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Colon,

    // Trivia and recovery
    BlockComment,
    LineComment,
    Unknown,
    Eof,
}

/// Reserved words. Both the Spanish and the English spelling are accepted.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    #[token("accion")]
    #[token("action")]
    Action,
    #[token("cadena")]
    #[token("string")]
    String,
    #[token("caracter")]
    #[token("char")]
    Char,
    #[token("entero")]
    #[token("integer")]
    Integer,
    #[token("decimal")]
    Decimal,
    #[token("booleano")]
    #[token("boolean")]
    Boolean,
    #[token("si")]
    #[token("if")]
    If,
    #[token("sino")]
    #[token("else")]
    Else,
    #[token("hacer")]
    #[token("do")]
    Do,
    #[token("mientras")]
    #[token("while")]
    While,
    #[token("variable")]
    Variable,
    #[token("constante")]
    #[token("constant")]
    Constant,
    #[token("devolucion")]
    #[token("return")]
    Return,
    #[token("muestre")]
    #[token("print")]
    Print,
    #[token("leer")]
    #[token("read")]
    Read,
}

impl Keyword {
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Keyword::String | Keyword::Char | Keyword::Integer | Keyword::Decimal | Keyword::Boolean
        )
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("%")]
    Rem,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
}

impl RelOp {
    /// `<=` and `>=`, the comparisons that refuse text operands
    pub fn is_inclusive_ordering(self) -> bool {
        matches!(self, RelOp::LessEqual | RelOp::GreaterEqual)
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    #[token("||")]
    Or,
    #[token("&&")]
    And,
    #[token("!")]
    Not,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Integer => write!(f, "integer literal"),
            TokenKind::Decimal => write!(f, "decimal literal"),
            TokenKind::Str => write!(f, "string literal"),
            TokenKind::Char => write!(f, "char literal"),
            TokenKind::Keyword(_) => write!(f, "reserved word"),
            TokenKind::Arithmetic(_) => write!(f, "arithmetic operator"),
            TokenKind::Assignment(_) => write!(f, "assignment operator"),
            TokenKind::Relational(_) => write!(f, "relational operator"),
            TokenKind::Logical(_) => write!(f, "logical operator"),
            TokenKind::Increment => write!(f, "increment operator"),
            TokenKind::Decrement => write!(f, "decrement operator"),
            TokenKind::Concat => write!(f, "concatenation operator"),
            TokenKind::Terminator => write!(f, "terminator"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBrace => write!(f, "'{{'"),
            TokenKind::RightBrace => write!(f, "'}}'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::BlockComment => write!(f, "block comment"),
            TokenKind::LineComment => write!(f, "line comment"),
            TokenKind::Unknown => write!(f, "unknown"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "end of input")
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}
