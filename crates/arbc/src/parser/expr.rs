//! Expression productions
//!
//! Binary levels, loosest first:
//!
//! | level          | operators          |
//! |----------------|--------------------|
//! | concatenation  | `·`                |
//! | or             | `\|\|`             |
//! | and            | `&&`               |
//! | relational     | `< <= > >= == !=`  |
//! | additive       | `+ -`              |
//! | multiplicative | `* / %`            |
//!
//! Each level is an iterative left fold, so `@a + @b - @c` groups as
//! `(@a + @b) - @c`. Unary `!` binds tighter than every binary operator.

use super::cursor::Cursor;
use super::parser::{Parsed, Parser, Rule};
use crate::ast::*;
use crate::lexer::{ArithOp, LogicalOp, TokenKind};

impl Parser<'_> {
    // ==================== Values ====================

    /// Right-hand side of `=`: call, then array, then expression
    pub(super) fn parse_assign_data(&mut self, at: Cursor) -> Parsed<AssignData> {
        if let Some((call, at)) = self.parse_call(at) {
            return Some((AssignData::Call(call), at));
        }
        if let Some((array, at)) = self.parse_array(at) {
            return Some((AssignData::Array(array), at));
        }
        self.parse_expression(at)
            .map(|(value, at)| (AssignData::Value(value), at))
    }

    /// `@f(args)`
    pub(super) fn parse_call(&mut self, start: Cursor) -> Parsed<FunctionCall> {
        let rule = Rule::Call;
        let (name, at) = self.eat_identifier(start)?;
        let at = self.eat(at, TokenKind::LeftParen)?;
        if !self.commit(rule, start) {
            return None;
        }

        let mut arguments = Vec::new();
        let mut at = at;
        if let Some((value, next)) = self.parse_expression(at) {
            arguments.push(Argument { value });
            at = next;
            while let Some(after_comma) = self.eat(at, TokenKind::Comma) {
                let Some((value, next)) = self.parse_expression(after_comma) else {
                    return self.fail(rule, start, after_comma, "argument after ','");
                };
                arguments.push(Argument { value });
                at = next;
            }
        }

        let Some(at) = self.eat(at, TokenKind::RightParen) else {
            return self.fail(rule, start, at, format_args!("')' to close call to '{}'", name.lexeme));
        };
        Some((FunctionCall { name, arguments }, at))
    }

    /// `[` elements `]`; elements are expressions or nested arrays
    fn parse_array(&mut self, start: Cursor) -> Parsed<Array> {
        let rule = Rule::Array;
        let open = self.peek(start).clone();
        if open.kind != TokenKind::LeftBracket {
            return None;
        }
        if !self.commit(rule, start) {
            return None;
        }

        let mut elements = Vec::new();
        let mut at = self.next(start);
        if let Some((element, next)) = self.parse_array_element(at) {
            elements.push(element);
            at = next;
            while let Some(after_comma) = self.eat(at, TokenKind::Comma) {
                let Some((element, next)) = self.parse_array_element(after_comma) else {
                    return self.fail(rule, start, after_comma, "array element after ','");
                };
                elements.push(element);
                at = next;
            }
        }

        let Some(at) = self.eat(at, TokenKind::RightBracket) else {
            return self.fail(rule, start, at, "']' to close array");
        };
        Some((Array { open, elements }, at))
    }

    fn parse_array_element(&mut self, at: Cursor) -> Parsed<ArrayElement> {
        if let Some((array, at)) = self.parse_array(at) {
            return Some((ArrayElement::Array(array), at));
        }
        self.parse_expression(at)
            .map(|(value, at)| (ArrayElement::Value(value), at))
    }

    // ==================== Binary levels ====================

    pub(super) fn parse_expression(&mut self, at: Cursor) -> Parsed<Operand> {
        self.parse_concat(at)
    }

    fn parse_concat(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(at, |kind| kind == TokenKind::Concat, Self::parse_or)
    }

    fn parse_or(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(
            at,
            |kind| kind == TokenKind::Logical(LogicalOp::Or),
            Self::parse_and,
        )
    }

    fn parse_and(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(
            at,
            |kind| kind == TokenKind::Logical(LogicalOp::And),
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(
            at,
            |kind| matches!(kind, TokenKind::Relational(_)),
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(
            at,
            |kind| matches!(kind, TokenKind::Arithmetic(ArithOp::Add | ArithOp::Sub)),
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self, at: Cursor) -> Parsed<Operand> {
        self.fold_binary(
            at,
            |kind| {
                matches!(
                    kind,
                    TokenKind::Arithmetic(ArithOp::Mul | ArithOp::Div | ArithOp::Rem)
                )
            },
            Self::parse_unary,
        )
    }

    /// `operand (op operand)*`, folded to the left. An operator without a
    /// right operand is left unconsumed.
    fn fold_binary(
        &mut self,
        start: Cursor,
        is_operator: fn(TokenKind) -> bool,
        operand: fn(&mut Self, Cursor) -> Parsed<Operand>,
    ) -> Parsed<Operand> {
        let (mut lhs, mut at) = operand(self, start)?;
        loop {
            let operator = self.peek(at);
            if !is_operator(operator.kind) {
                break;
            }
            let operator = operator.clone();
            let after_operator = self.next(at);
            let Some((rhs, next)) = operand(self, after_operator) else {
                break;
            };
            lhs = Operand::Expression(Box::new(Expression::binary(lhs, operator, rhs)));
            at = next;
        }
        Some((lhs, at))
    }

    // ==================== Atoms ====================

    fn parse_unary(&mut self, at: Cursor) -> Parsed<Operand> {
        let operator = self.peek(at);
        if operator.kind != TokenKind::Logical(LogicalOp::Not) {
            return self.parse_atom(at);
        }
        let operator = operator.clone();
        let (operand, at) = self.parse_unary(self.next(at))?;
        Some((
            Operand::Expression(Box::new(Expression::unary(operator, operand))),
            at,
        ))
    }

    fn parse_atom(&mut self, at: Cursor) -> Parsed<Operand> {
        let token = self.peek(at);
        match token.kind {
            TokenKind::LeftParen => {
                let (inner, after) = self.parse_expression(self.next(at))?;
                let after = self.eat(after, TokenKind::RightParen)?;
                Some((inner, after))
            }
            TokenKind::Identifier | TokenKind::Str | TokenKind::Char => {
                Some((Operand::Token(token.clone()), self.next(at)))
            }
            _ => self
                .parse_numeric_value(at)
                .map(|(value, at)| (Operand::Numeric(value), at)),
        }
    }

    /// Optional `+`/`-` token followed by a number literal
    fn parse_numeric_value(&mut self, at: Cursor) -> Parsed<NumericValue> {
        let first = self.peek(at);
        let (sign, at) = if matches!(first.kind, TokenKind::Arithmetic(ArithOp::Add | ArithOp::Sub)) {
            (Some(first.clone()), self.next(at))
        } else {
            (None, at)
        };

        let number = self.peek(at);
        if !matches!(number.kind, TokenKind::Integer | TokenKind::Decimal) {
            return None;
        }
        Some((NumericValue::new(sign, number.clone()), self.next(at)))
    }
}
