//! Lexer: source text to tokens

mod scanner;
mod token;

pub use scanner::{Lexer, tokenize};
pub use token::{ArithOp, AssignOp, Keyword, LogicalOp, RelOp, Token, TokenKind};
