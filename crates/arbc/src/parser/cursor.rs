//! Token cursor
//!
//! A [`Cursor`] is a plain position; productions take one and hand back the
//! position after what they consumed. Backtracking is just reusing an older
//! cursor. Comment tokens are skipped here, so no production ever sees one.

use crate::common::{Location, Span};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cursor(usize);

impl Cursor {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Read-only view over the token list with an end-of-input sentinel
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    eof: Token,
}

impl<'t> TokenStream<'t> {
    /// `source_len` positions the sentinel at the end of the source text
    pub fn new(tokens: &'t [Token], source_len: usize) -> Self {
        let (row, col) = tokens.last().map_or((0, 0), end_position);
        let eof = Token::eof(Location::new(row, col, Span::new(source_len, source_len)));
        Self { tokens, eof }
    }

    /// First grammar-relevant position
    pub fn start(&self) -> Cursor {
        self.skip_comments(0)
    }

    /// Token at `at`, or the sentinel past the end
    pub fn peek(&self, at: Cursor) -> &Token {
        self.tokens.get(at.0).unwrap_or(&self.eof)
    }

    /// Position of the next grammar-relevant token after `at`
    pub fn advance(&self, at: Cursor) -> Cursor {
        if at.0 >= self.tokens.len() {
            return at;
        }
        self.skip_comments(at.0 + 1)
    }

    pub fn at_end(&self, at: Cursor) -> bool {
        at.0 >= self.tokens.len()
    }

    fn skip_comments(&self, mut index: usize) -> Cursor {
        while self.tokens.get(index).is_some_and(Token::is_comment) {
            index += 1;
        }
        Cursor(index)
    }
}

/// Row and column just past the last character of `token`
fn end_position(token: &Token) -> (usize, usize) {
    let Location { mut row, mut col, .. } = token.location;
    for c in token.lexeme.chars() {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{TokenKind, tokenize};

    #[test]
    fn test_comments_are_skipped() {
        let source = "«c» @x ¶ note\n#";
        let tokens = tokenize(source);
        let stream = TokenStream::new(&tokens, source.len());

        let at = stream.start();
        assert_eq!(stream.peek(at).kind, TokenKind::Identifier);
        let at = stream.advance(at);
        assert_eq!(stream.peek(at).kind, TokenKind::Terminator);
        let at = stream.advance(at);
        assert!(stream.at_end(at));
    }

    #[test]
    fn test_sentinel_past_end() {
        let source = "@x";
        let tokens = tokenize(source);
        let stream = TokenStream::new(&tokens, source.len());

        let end = stream.advance(stream.start());
        let eof = stream.peek(end);
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!((eof.location.row, eof.location.col), (0, 2));
        assert_eq!(stream.advance(end), end);
    }
}
