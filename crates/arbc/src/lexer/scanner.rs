//! Priority-ordered scanner
//!
//! At every position the matchers below are tried in order and the first
//! one that accepts consumes its characters. Several matchers share
//! prefixes (`++` and `+`, `-5` and `-`, `si` and `sino`), so the order is
//! part of the language definition. The last matcher accepts anything, so
//! scanning never fails.

use super::token::{ArithOp, AssignOp, Keyword, LogicalOp, RelOp, Token, TokenKind};
use crate::common::{Location, Span};
use logos::Logos;

/// Tries to match a token at the start of the remaining input, returning
/// its kind and byte length
type Matcher = fn(&str) -> Option<(TokenKind, usize)>;

const MATCHERS: [Matcher; 19] = [
    identifier,
    increment,
    decrement,
    arithmetic,
    assignment,
    relational,
    logical,
    integer,
    decimal,
    keyword,
    string,
    character,
    block_comment,
    line_comment,
    terminator,
    grouping,
    separator,
    concat,
    unknown,
];

const MAX_IDENTIFIER_LEN: usize = 10;
const MAX_CHAR_BODY_LEN: usize = 2;

/// Lexer for Arroba source text
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    row: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            row: 0,
            col: 0,
        }
    }

    /// Get the next token; returns the end-of-input sentinel once exhausted
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let rest = &self.source[self.pos..];
        if rest.is_empty() {
            return Token::eof(self.location(0));
        }

        let (kind, len) = MATCHERS
            .iter()
            .find_map(|matcher| matcher(rest))
            .unwrap_or_else(|| (TokenKind::Unknown, first_char_len(rest)));

        let lexeme = &rest[..len];
        let token = Token::new(kind, lexeme, self.location(len));
        self.advance(lexeme);
        token
    }

    /// Tokenize the entire source; the end-of-input sentinel is not included
    pub fn tokenize_all(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        log::debug!("lexer produced {} tokens", tokens.len());
        tokens
    }

    fn location(&self, len: usize) -> Location {
        Location::new(self.row, self.col, Span::new(self.pos, self.pos + len))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.source[self.pos..].chars().next() {
            if !is_whitespace(c) {
                break;
            }
            self.bump(c);
        }
    }

    fn advance(&mut self, lexeme: &str) {
        for c in lexeme.chars() {
            self.bump(c);
        }
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
        if c == '\n' {
            self.row += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }
}

/// Tokenize `source` into its full token list
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize_all()
}

// ==================== Character classes ====================

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_grouping(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']')
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | ':')
}

/// Characters that may directly follow a literal, reserved word or
/// boundary-checked operator
fn is_boundary(c: char) -> bool {
    is_whitespace(c) || is_grouping(c) || is_separator(c) || c == '#'
}

fn at_boundary(rest: &str, len: usize) -> bool {
    rest[len..].chars().next().is_none_or(is_boundary)
}

fn first_char_len(rest: &str) -> usize {
    rest.chars().next().map_or(0, char::len_utf8)
}

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Run a logos table against the start of `rest`
fn lookup_table<'s, T>(rest: &'s str) -> Option<(T, usize)>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    let mut lex = T::lexer(rest);
    match lex.next()? {
        Ok(kind) => Some((kind, lex.span().end)),
        Err(_) => None,
    }
}

/// Run a logos table and require a boundary after the match
fn lookup_bounded<'s, T>(rest: &'s str) -> Option<(T, usize)>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    lookup_table::<T>(rest).filter(|&(_, len)| at_boundary(rest, len))
}

/// Delimited form: `open`, any text, `close`. Returns the byte length
/// including both delimiters and the char count of the body.
fn delimited(rest: &str, open: char, close: char) -> Option<(usize, usize)> {
    let body = rest.strip_prefix(open)?;
    let end = body.find(close)?;
    let len = open.len_utf8() + end + close.len_utf8();
    Some((len, body[..end].chars().count()))
}

// ==================== Matchers ====================

fn identifier(rest: &str) -> Option<(TokenKind, usize)> {
    let name = rest.strip_prefix('@')?;
    let run = name.bytes().take_while(u8::is_ascii_alphanumeric).count();
    let len = 1 + run;
    (2..=MAX_IDENTIFIER_LEN)
        .contains(&len)
        .then_some((TokenKind::Identifier, len))
}

fn increment(rest: &str) -> Option<(TokenKind, usize)> {
    rest.starts_with("++").then_some((TokenKind::Increment, 2))
}

fn decrement(rest: &str) -> Option<(TokenKind, usize)> {
    rest.starts_with("--").then_some((TokenKind::Decrement, 2))
}

fn arithmetic(rest: &str) -> Option<(TokenKind, usize)> {
    lookup_table::<ArithOp>(rest).map(|(op, len)| (TokenKind::Arithmetic(op), len))
}

fn assignment(rest: &str) -> Option<(TokenKind, usize)> {
    lookup_bounded::<AssignOp>(rest).map(|(op, len)| (TokenKind::Assignment(op), len))
}

fn relational(rest: &str) -> Option<(TokenKind, usize)> {
    lookup_bounded::<RelOp>(rest).map(|(op, len)| (TokenKind::Relational(op), len))
}

fn logical(rest: &str) -> Option<(TokenKind, usize)> {
    lookup_bounded::<LogicalOp>(rest).map(|(op, len)| (TokenKind::Logical(op), len))
}

/// Length of an optional `+`/`-` that is directly followed by a digit
fn sign_len(rest: &str) -> usize {
    let mut bytes = rest.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b'+' | b'-'), Some(d)) if d.is_ascii_digit() => 1,
        _ => 0,
    }
}

fn integer(rest: &str) -> Option<(TokenKind, usize)> {
    let sign = sign_len(rest);
    let digits = digit_run(&rest[sign..]);
    let len = sign + digits;
    (digits > 0 && at_boundary(rest, len)).then_some((TokenKind::Integer, len))
}

fn decimal(rest: &str) -> Option<(TokenKind, usize)> {
    let sign = sign_len(rest);
    let whole = digit_run(&rest[sign..]);
    if whole == 0 {
        return None;
    }
    let dot = sign + whole;
    if !rest[dot..].starts_with('.') {
        return None;
    }
    let fraction = digit_run(&rest[dot + 1..]);
    let len = dot + 1 + fraction;
    (fraction > 0 && at_boundary(rest, len)).then_some((TokenKind::Decimal, len))
}

fn keyword(rest: &str) -> Option<(TokenKind, usize)> {
    lookup_bounded::<Keyword>(rest).map(|(kw, len)| (TokenKind::Keyword(kw), len))
}

fn string(rest: &str) -> Option<(TokenKind, usize)> {
    delimited(rest, '~', '~').map(|(len, _)| (TokenKind::Str, len))
}

fn character(rest: &str) -> Option<(TokenKind, usize)> {
    delimited(rest, '^', '^')
        .filter(|&(_, body)| body <= MAX_CHAR_BODY_LEN)
        .map(|(len, _)| (TokenKind::Char, len))
}

fn block_comment(rest: &str) -> Option<(TokenKind, usize)> {
    delimited(rest, '«', '»').map(|(len, _)| (TokenKind::BlockComment, len))
}

fn line_comment(rest: &str) -> Option<(TokenKind, usize)> {
    if !rest.starts_with('¶') {
        return None;
    }
    let len = rest.find('\n').unwrap_or(rest.len());
    Some((TokenKind::LineComment, len))
}

fn terminator(rest: &str) -> Option<(TokenKind, usize)> {
    rest.starts_with('#').then_some((TokenKind::Terminator, 1))
}

fn grouping(rest: &str) -> Option<(TokenKind, usize)> {
    let kind = match rest.chars().next()? {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        _ => return None,
    };
    Some((kind, 1))
}

fn separator(rest: &str) -> Option<(TokenKind, usize)> {
    let kind = match rest.chars().next()? {
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        ':' => TokenKind::Colon,
        _ => return None,
    };
    Some((kind, 1))
}

fn concat(rest: &str) -> Option<(TokenKind, usize)> {
    rest.starts_with('·').then_some((TokenKind::Concat, '·'.len_utf8()))
}

/// Catch-all: at least one character, then everything up to whitespace,
/// a grouping symbol or a terminator
fn unknown(rest: &str) -> Option<(TokenKind, usize)> {
    let first = first_char_len(rest);
    let tail = rest[first..]
        .find(|c: char| is_whitespace(c) || is_grouping(c) || c == '#')
        .unwrap_or(rest.len() - first);
    Some((TokenKind::Unknown, first + tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        tokenize(source).into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn test_variable_declaration() {
        assert_eq!(
            kinds("variable @x = 5#"),
            vec![
                TokenKind::Keyword(Keyword::Variable),
                TokenKind::Identifier,
                TokenKind::Assignment(AssignOp::Assign),
                TokenKind::Integer,
                TokenKind::Terminator,
            ]
        );
    }

    #[test]
    fn test_keywords_both_spellings() {
        assert_eq!(
            kinds("si if sino else mientras while"),
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Keyword(Keyword::If),
                TokenKind::Keyword(Keyword::Else),
                TokenKind::Keyword(Keyword::Else),
                TokenKind::Keyword(Keyword::While),
                TokenKind::Keyword(Keyword::While),
            ]
        );
    }

    #[test]
    fn test_keyword_needs_boundary() {
        // "sinox" is not `sino` followed by garbage
        assert_eq!(kinds("sinox"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("si("), vec![TokenKind::Keyword(Keyword::If), TokenKind::LeftParen]);
    }

    #[test]
    fn test_identifier_length_limits() {
        assert_eq!(kinds("@a"), vec![TokenKind::Identifier]);
        assert_eq!(kinds("@abcdefghi"), vec![TokenKind::Identifier]);
        // eleven characters is one too many
        assert_eq!(kinds("@abcdefghij"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("@ "), vec![TokenKind::Unknown]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("7#"), vec![TokenKind::Integer, TokenKind::Terminator]);
        assert_eq!(kinds("42)"), vec![TokenKind::Integer, TokenKind::RightParen]);
        assert_eq!(kinds("3.14 "), vec![TokenKind::Decimal]);
        assert_eq!(kinds("1.2.3"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("12abc"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn test_sign_is_an_operator_in_source() {
        // arithmetic has priority over signed literals
        assert_eq!(
            kinds("-5"),
            vec![TokenKind::Arithmetic(ArithOp::Sub), TokenKind::Integer]
        );
    }

    #[test]
    fn test_signed_literal_matchers() {
        assert_eq!(integer("-12 "), Some((TokenKind::Integer, 3)));
        assert_eq!(decimal("+1.5)"), Some((TokenKind::Decimal, 4)));
        assert_eq!(decimal("-.5 "), None);
        assert_eq!(integer("- 5"), None);
    }

    #[test]
    fn test_increment_before_arithmetic() {
        assert_eq!(
            kinds("@i++ @j--"),
            vec![
                TokenKind::Identifier,
                TokenKind::Increment,
                TokenKind::Identifier,
                TokenKind::Decrement,
            ]
        );
    }

    #[test]
    fn test_relational_longest_match() {
        assert_eq!(
            kinds("<= < >= == !="),
            vec![
                TokenKind::Relational(RelOp::LessEqual),
                TokenKind::Relational(RelOp::Less),
                TokenKind::Relational(RelOp::GreaterEqual),
                TokenKind::Relational(RelOp::Equal),
                TokenKind::Relational(RelOp::NotEqual),
            ]
        );
    }

    #[test]
    fn test_compound_assignment_is_shadowed_by_arithmetic() {
        assert_eq!(
            kinds("+="),
            vec![TokenKind::Arithmetic(ArithOp::Add), TokenKind::Assignment(AssignOp::Assign)]
        );
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(
            kinds("|| && !("),
            vec![
                TokenKind::Logical(LogicalOp::Or),
                TokenKind::Logical(LogicalOp::And),
                TokenKind::Logical(LogicalOp::Not),
                TokenKind::LeftParen,
            ]
        );
    }

    #[test]
    fn test_string_and_char_literals() {
        assert_eq!(lexemes("~hola mundo~ ^a^"), vec!["~hola mundo~", "^a^"]);
        assert_eq!(kinds("^abc^"), vec![TokenKind::Unknown]);
    }

    #[test]
    fn test_unterminated_string_is_unknown() {
        let tokens = tokenize("variable @s = ~abc");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Unknown);
        assert_eq!(last.lexeme, "~abc");
    }

    #[test]
    fn test_malformed_input_falls_back_to_unknown() {
        assert_eq!(lexemes("«abc"), vec!["«abc"]);
        assert_eq!(kinds("«abc"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("^ab"), vec![TokenKind::Unknown]);
        // char body is at most two characters
        assert_eq!(lexemes("^abc^"), vec!["^abc^"]);
        assert_eq!(kinds("^abc^"), vec![TokenKind::Unknown]);
        assert_eq!(kinds("@"), vec![TokenKind::Unknown]);
        assert_eq!(lexemes("€€("), vec!["€€", "("]);
        assert_eq!(kinds("€€("), vec![TokenKind::Unknown, TokenKind::LeftParen]);
        assert_eq!(kinds("@x ¶"), vec![TokenKind::Identifier, TokenKind::LineComment]);
    }

    #[test]
    fn test_malformed_lexemes_cover_source() {
        let source = "«abc\n^ab\n^abc^\n@\n€€(\n¶";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::Unknown,
                TokenKind::LeftParen,
                TokenKind::LineComment,
            ]
        );
        let joined: String = lexemes(source).concat();
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(joined, stripped);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("«block\ncomment» ¶ line\n#"),
            vec![TokenKind::BlockComment, TokenKind::LineComment, TokenKind::Terminator]
        );
        assert_eq!(lexemes("¶ note\n#")[0], "¶ note");
    }

    #[test]
    fn test_rows_and_columns() {
        let tokens = tokenize("variable @x#\n  @x++");
        let positions: Vec<(usize, usize)> = tokens
            .iter()
            .map(|t| (t.location.row, t.location.col))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 9), (0, 11), (1, 2), (1, 4)]);
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = tokenize("~ñú~ @x");
        assert_eq!(tokens[1].location.col, 5);
        assert_eq!(tokens[1].span(), Span::new(7, 9));
    }

    #[test]
    fn test_newline_inside_comment_advances_row() {
        let tokens = tokenize("«a\nb» @x");
        assert_eq!(tokens[1].location.row, 1);
        assert_eq!(tokens[1].location.col, 3);
    }

    #[test]
    fn test_unknown_stops_at_grouping() {
        assert_eq!(lexemes("$$(1)"), vec!["$$", "(", "1", ")"]);
        assert_eq!(lexemes("=5#"), vec!["=5", "#"]);
    }

    #[test]
    fn test_concat_and_separators() {
        assert_eq!(
            kinds("~a~ · @b, ; :"),
            vec![
                TokenKind::Str,
                TokenKind::Concat,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_lexemes_cover_source() {
        let source = "accion @f(entero @a){ devolucion @a * 2 # }\nmuestre @f(3)#";
        let joined: String = lexemes(source).concat();
        let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(joined, stripped);
    }

    #[test]
    fn test_eof_sentinel_repeats() {
        let mut lexer = Lexer::new("#");
        assert_eq!(lexer.next_token().kind, TokenKind::Terminator);
        let eof = lexer.next_token();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span(), Span::new(1, 1));
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
