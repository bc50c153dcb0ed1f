//! Backtracking recursive descent parser
//!
//! Every production has the shape `fn(&mut self, Cursor) -> Option<(Node, Cursor)>`.
//! `None` means "no match here" and the caller tries its next alternative
//! from the cursor it already holds, so nothing needs to be restored.
//!
//! A production commits once it has consumed its distinguishing token (a
//! keyword, the `=` of an assignment, the `(` of a call, the `[` of an
//! array). A missing piece after that point is reported as a syntax
//! diagnostic at the current token. Diagnostics are never retracted; a
//! production that already failed at a given cursor is not re-run there, so
//! alternatives revisiting the same position do not report it twice.

use super::cursor::{Cursor, TokenStream};
use crate::ast::*;
use crate::common::Diagnostic;
use crate::lexer::{AssignOp, Keyword, Token, TokenKind};
use std::collections::HashSet;
use std::fmt;

pub(super) type Parsed<T> = Option<(T, Cursor)>;

/// Committing productions, used to remember where one already failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Rule {
    VariableDeclaration,
    ConstantDeclaration,
    FunctionDeclaration,
    Parameter,
    Print,
    Return,
    Read,
    Decision,
    DoWhile,
    Assignment,
    Call,
    Array,
}

/// Parser over a lexed token list
pub struct Parser<'t> {
    stream: TokenStream<'t>,
    diagnostics: Vec<Diagnostic>,
    failed: HashSet<(Rule, Cursor)>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token], source_len: usize) -> Self {
        Self {
            stream: TokenStream::new(tokens, source_len),
            diagnostics: Vec::new(),
            failed: HashSet::new(),
        }
    }

    /// Parse a complete compilation unit
    pub fn parse_unit(&mut self) -> CompilationUnit {
        let at = self.stream.start();
        let (declarations, at) = self.parse_declaration_list(at);
        let (functions, at) = self.parse_function_list(at);
        let (statements, at) = self.parse_statement_list(at);

        if !self.stream.at_end(at) {
            self.report_leftover(at);
        }

        log::debug!(
            "parsed {} declarations, {} functions, {} statements",
            declarations.len(),
            functions.len(),
            statements.len()
        );
        CompilationUnit::new(declarations, functions, statements)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ==================== Token helpers ====================

    pub(super) fn peek(&self, at: Cursor) -> &Token {
        self.stream.peek(at)
    }

    pub(super) fn next(&self, at: Cursor) -> Cursor {
        self.stream.advance(at)
    }

    /// Consume a token of exactly `kind`
    pub(super) fn eat(&self, at: Cursor, kind: TokenKind) -> Option<Cursor> {
        (self.peek(at).kind == kind).then(|| self.next(at))
    }

    pub(super) fn eat_keyword(&self, at: Cursor, keyword: Keyword) -> Parsed<Token> {
        let token = self.peek(at);
        token.is_keyword(keyword).then(|| (token.clone(), self.next(at)))
    }

    pub(super) fn eat_identifier(&self, at: Cursor) -> Parsed<Token> {
        let token = self.peek(at);
        (token.kind == TokenKind::Identifier).then(|| (token.clone(), self.next(at)))
    }

    /// Enter the committed part of `rule`; false if it already failed at `start`
    pub(super) fn commit(&self, rule: Rule, start: Cursor) -> bool {
        if self.failed.contains(&(rule, start)) {
            return false;
        }
        log::trace!("{rule:?} committed at token {}", start.index());
        true
    }

    /// Report a missing piece of a committed production and give up on it
    pub(super) fn fail<T>(
        &mut self,
        rule: Rule,
        start: Cursor,
        at: Cursor,
        expected: impl fmt::Display,
    ) -> Option<T> {
        if self.failed.insert((rule, start)) {
            let found = self.peek(at);
            let diagnostic =
                Diagnostic::syntax(format!("expected {expected}, found {found}"), found.location);
            self.diagnostics.push(diagnostic);
        }
        None
    }

    fn report_leftover(&mut self, at: Cursor) {
        let token = self.peek(at);
        let start = token.span().start;
        // A committed production that stopped here already explained why
        if self.diagnostics.iter().any(|d| d.span.start >= start) {
            return;
        }
        let message = if token.kind == TokenKind::Unknown {
            format!("unrecognized input {token}")
        } else {
            format!("unexpected {token}")
        };
        let diagnostic = Diagnostic::syntax(message, token.location);
        self.diagnostics.push(diagnostic);
    }

    // ==================== Declarations ====================

    fn parse_declaration_list(&mut self, mut at: Cursor) -> (Vec<Declaration>, Cursor) {
        let mut declarations = Vec::new();
        loop {
            if let Some((decl, next)) = self.parse_variable_declaration(at) {
                declarations.push(Declaration::Variable(decl));
                at = next;
            } else if let Some((decl, next)) = self.parse_constant_declaration(at) {
                declarations.push(Declaration::Constant(decl));
                at = next;
            } else {
                return (declarations, at);
            }
        }
    }

    /// `variable @x [= value] #`
    fn parse_variable_declaration(&mut self, start: Cursor) -> Parsed<VariableDeclaration> {
        let rule = Rule::VariableDeclaration;
        let (keyword, at) = self.eat_keyword(start, Keyword::Variable)?;
        if !self.commit(rule, start) {
            return None;
        }

        let Some((name, at)) = self.eat_identifier(at) else {
            return self.fail(rule, start, at, format_args!("identifier after '{}'", keyword.lexeme));
        };

        let (value, at) = match self.eat(at, TokenKind::Assignment(AssignOp::Assign)) {
            Some(at) => match self.parse_assign_data(at) {
                Some((value, at)) => (Some(value), at),
                None => return self.fail(rule, start, at, "value after '='"),
            },
            None => (None, at),
        };

        let Some(at) = self.eat(at, TokenKind::Terminator) else {
            return self.fail(rule, start, at, "'#' after variable declaration");
        };

        Some((VariableDeclaration { keyword, name, value }, at))
    }

    /// `constante @x = value #`
    fn parse_constant_declaration(&mut self, start: Cursor) -> Parsed<ConstantDeclaration> {
        let rule = Rule::ConstantDeclaration;
        let (keyword, at) = self.eat_keyword(start, Keyword::Constant)?;
        if !self.commit(rule, start) {
            return None;
        }

        let Some((name, at)) = self.eat_identifier(at) else {
            return self.fail(rule, start, at, format_args!("identifier after '{}'", keyword.lexeme));
        };
        let Some(at) = self.eat(at, TokenKind::Assignment(AssignOp::Assign)) else {
            return self.fail(rule, start, at, "'=' in constant declaration");
        };
        let Some((value, at)) = self.parse_assign_data(at) else {
            return self.fail(rule, start, at, "value after '='");
        };
        let Some(at) = self.eat(at, TokenKind::Terminator) else {
            return self.fail(rule, start, at, "'#' after constant declaration");
        };

        Some((ConstantDeclaration { keyword, name, value }, at))
    }

    fn parse_function_list(&mut self, mut at: Cursor) -> (Vec<FunctionDeclaration>, Cursor) {
        let mut functions = Vec::new();
        while let Some((func, next)) = self.parse_function_declaration(at) {
            functions.push(func);
            at = next;
        }
        (functions, at)
    }

    /// `accion @f(params) { body }`
    fn parse_function_declaration(&mut self, start: Cursor) -> Parsed<FunctionDeclaration> {
        let rule = Rule::FunctionDeclaration;
        let (keyword, at) = self.eat_keyword(start, Keyword::Action)?;
        if !self.commit(rule, start) {
            return None;
        }

        let Some((name, at)) = self.eat_identifier(at) else {
            return self.fail(rule, start, at, format_args!("function name after '{}'", keyword.lexeme));
        };
        let Some(at) = self.eat(at, TokenKind::LeftParen) else {
            return self.fail(rule, start, at, "'(' after function name");
        };

        let mut parameters = Vec::new();
        let mut at = at;
        if let Some((param, next)) = self.parse_parameter(at) {
            parameters.push(param);
            at = next;
            while let Some(after_comma) = self.eat(at, TokenKind::Comma) {
                let Some((param, next)) = self.parse_parameter(after_comma) else {
                    return self.fail(rule, start, after_comma, "parameter after ','");
                };
                parameters.push(param);
                at = next;
            }
        }

        let Some(at) = self.eat(at, TokenKind::RightParen) else {
            return self.fail(rule, start, at, "')' after parameters");
        };
        let (body, at) = self.parse_block(rule, start, at, "function body")?;

        Some((
            FunctionDeclaration {
                keyword,
                name,
                parameters,
                body,
            },
            at,
        ))
    }

    /// `entero @a`
    fn parse_parameter(&mut self, start: Cursor) -> Parsed<Parameter> {
        let type_keyword = self.peek(start).clone();
        let TokenKind::Keyword(keyword) = type_keyword.kind else {
            return None;
        };
        let ty = crate::types::ValueType::from_keyword(keyword)?;
        if !self.commit(Rule::Parameter, start) {
            return None;
        }

        let at = self.next(start);
        let Some((name, at)) = self.eat_identifier(at) else {
            return self.fail(
                Rule::Parameter,
                start,
                at,
                format_args!("parameter name after '{}'", type_keyword.lexeme),
            );
        };

        Some((
            Parameter {
                type_keyword,
                ty,
                name,
            },
            at,
        ))
    }

    // ==================== Statements ====================

    /// Zero or more statements; stops at the first position where none matches
    pub(super) fn parse_statement_list(&mut self, mut at: Cursor) -> (Vec<Statement>, Cursor) {
        let mut statements = Vec::new();
        while let Some((stmt, next)) = self.parse_statement(at) {
            statements.push(stmt);
            at = next;
        }
        (statements, at)
    }

    fn parse_statement(&mut self, at: Cursor) -> Parsed<Statement> {
        self.parse_print(at)
            .map(|(s, at)| (Statement::Print(s), at))
            .or_else(|| self.parse_return(at).map(|(s, at)| (Statement::Return(s), at)))
            .or_else(|| self.parse_read(at).map(|(s, at)| (Statement::Read(s), at)))
            .or_else(|| self.parse_decision(at).map(|(s, at)| (Statement::Decision(s), at)))
            .or_else(|| {
                self.parse_variable_declaration(at)
                    .map(|(s, at)| (Statement::Variable(s), at))
            })
            .or_else(|| {
                self.parse_constant_declaration(at)
                    .map(|(s, at)| (Statement::Constant(s), at))
            })
            .or_else(|| self.parse_assignment(at).map(|(s, at)| (Statement::Assignment(s), at)))
            .or_else(|| self.parse_do_while(at).map(|(s, at)| (Statement::DoWhile(s), at)))
            .or_else(|| self.parse_call_statement(at).map(|(s, at)| (Statement::Call(s), at)))
            .or_else(|| self.parse_increment(at).map(|(s, at)| (Statement::Increment(s), at)))
            .or_else(|| self.parse_decrement(at).map(|(s, at)| (Statement::Decrement(s), at)))
    }

    /// `{` statements `}`, as the committed tail of `rule`
    fn parse_block(
        &mut self,
        rule: Rule,
        start: Cursor,
        at: Cursor,
        what: &str,
    ) -> Parsed<Vec<Statement>> {
        let Some(at) = self.eat(at, TokenKind::LeftBrace) else {
            return self.fail(rule, start, at, format_args!("'{{' to open {what}"));
        };
        let (statements, at) = self.parse_statement_list(at);
        let Some(at) = self.eat(at, TokenKind::RightBrace) else {
            return self.fail(rule, start, at, format_args!("'}}' to close {what}"));
        };
        Some((statements, at))
    }

    /// Shared shape of print, read and return: keyword, value, `#`
    fn parse_keyword_statement(
        &mut self,
        start: Cursor,
        keyword: Keyword,
        rule: Rule,
    ) -> Parsed<(Token, Payload)> {
        let (keyword, at) = self.eat_keyword(start, keyword)?;
        if !self.commit(rule, start) {
            return None;
        }

        let payload = match self.parse_call(at) {
            Some((call, at)) => Some((Payload::Call(call), at)),
            None => self
                .parse_expression(at)
                .map(|(value, at)| (Payload::Value(value), at)),
        };
        let Some((payload, at)) = payload else {
            return self.fail(rule, start, at, format_args!("value after '{}'", keyword.lexeme));
        };
        let Some(at) = self.eat(at, TokenKind::Terminator) else {
            return self.fail(rule, start, at, format_args!("'#' after '{}' statement", keyword.lexeme));
        };

        Some(((keyword, payload), at))
    }

    fn parse_print(&mut self, start: Cursor) -> Parsed<Print> {
        let ((keyword, value), at) = self.parse_keyword_statement(start, Keyword::Print, Rule::Print)?;
        Some((Print { keyword, value }, at))
    }

    fn parse_return(&mut self, start: Cursor) -> Parsed<Return> {
        let ((keyword, value), at) =
            self.parse_keyword_statement(start, Keyword::Return, Rule::Return)?;
        Some((Return { keyword, value }, at))
    }

    fn parse_read(&mut self, start: Cursor) -> Parsed<Read> {
        let ((keyword, value), at) = self.parse_keyword_statement(start, Keyword::Read, Rule::Read)?;
        Some((Read { keyword, value }, at))
    }

    /// `si (cond) { ... } [sino { ... }]`
    fn parse_decision(&mut self, start: Cursor) -> Parsed<Decision> {
        let rule = Rule::Decision;
        let (keyword, at) = self.eat_keyword(start, Keyword::If)?;
        if !self.commit(rule, start) {
            return None;
        }

        let Some(at) = self.eat(at, TokenKind::LeftParen) else {
            return self.fail(rule, start, at, format_args!("'(' after '{}'", keyword.lexeme));
        };
        let Some((condition, at)) = self.parse_expression(at) else {
            return self.fail(rule, start, at, "condition");
        };
        let Some(at) = self.eat(at, TokenKind::RightParen) else {
            return self.fail(rule, start, at, "')' after condition");
        };
        let (then_branch, at) = self.parse_block(rule, start, at, "the conditional body")?;

        let (else_branch, at) = match self.eat_keyword(at, Keyword::Else) {
            Some((_, at)) => {
                let (branch, at) = self.parse_block(rule, start, at, "the else body")?;
                (Some(branch), at)
            }
            None => (None, at),
        };

        Some((
            Decision {
                keyword,
                condition,
                then_branch,
                else_branch,
            },
            at,
        ))
    }

    /// `hacer { ... } mientras (cond) #`
    fn parse_do_while(&mut self, start: Cursor) -> Parsed<DoWhileLoop> {
        let rule = Rule::DoWhile;
        let (keyword, at) = self.eat_keyword(start, Keyword::Do)?;
        if !self.commit(rule, start) {
            return None;
        }

        let (body, at) = self.parse_block(rule, start, at, "the loop body")?;
        let Some((_, at)) = self.eat_keyword(at, Keyword::While) else {
            return self.fail(rule, start, at, "'mientras' after loop body");
        };
        let Some(at) = self.eat(at, TokenKind::LeftParen) else {
            return self.fail(rule, start, at, "'(' after 'mientras'");
        };
        let Some((condition, at)) = self.parse_expression(at) else {
            return self.fail(rule, start, at, "loop condition");
        };
        let Some(at) = self.eat(at, TokenKind::RightParen) else {
            return self.fail(rule, start, at, "')' after loop condition");
        };
        let Some(at) = self.eat(at, TokenKind::Terminator) else {
            return self.fail(rule, start, at, "'#' after loop");
        };

        Some((
            DoWhileLoop {
                keyword,
                body,
                condition,
            },
            at,
        ))
    }

    /// `@x = value #`
    fn parse_assignment(&mut self, start: Cursor) -> Parsed<Assignment> {
        let rule = Rule::Assignment;
        let (target, at) = self.eat_identifier(start)?;
        let operator = self.peek(at).clone();
        if operator.kind != TokenKind::Assignment(AssignOp::Assign) {
            return None;
        }
        if !self.commit(rule, start) {
            return None;
        }

        let at = self.next(at);
        let Some((value, at)) = self.parse_assign_data(at) else {
            return self.fail(rule, start, at, format_args!("value to assign to '{}'", target.lexeme));
        };
        let Some(at) = self.eat(at, TokenKind::Terminator) else {
            return self.fail(rule, start, at, "'#' after assignment");
        };

        Some((
            Assignment {
                target,
                operator,
                value,
            },
            at,
        ))
    }

    /// `@f(args) [#]`
    fn parse_call_statement(&mut self, start: Cursor) -> Parsed<FunctionCall> {
        let (call, at) = self.parse_call(start)?;
        Some((call, self.eat(at, TokenKind::Terminator).unwrap_or(at)))
    }

    /// `@x++ [#]`
    fn parse_increment(&mut self, start: Cursor) -> Parsed<Increment> {
        let (target, at) = self.eat_identifier(start)?;
        let operator = self.peek(at).clone();
        if operator.kind != TokenKind::Increment {
            return None;
        }
        let at = self.next(at);
        let at = self.eat(at, TokenKind::Terminator).unwrap_or(at);
        Some((Increment { target, operator }, at))
    }

    /// `@x-- [#]`
    fn parse_decrement(&mut self, start: Cursor) -> Parsed<Decrement> {
        let (target, at) = self.eat_identifier(start)?;
        let operator = self.peek(at).clone();
        if operator.kind != TokenKind::Decrement {
            return None;
        }
        let at = self.next(at);
        let at = self.eat(at, TokenKind::Terminator).unwrap_or(at);
        Some((Decrement { target, operator }, at))
    }
}

/// Parse a token list into a compilation unit plus syntax diagnostics
pub fn parse(tokens: &[Token], source_len: usize) -> (CompilationUnit, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens, source_len);
    let unit = parser.parse_unit();
    (unit, parser.into_diagnostics())
}
