//! Flow-insensitive type inference
//!
//! `None` means the type cannot be known here, usually because an
//! identifier is undeclared. Callers report that separately.

use super::symbols::SymbolTable;
use crate::ast::*;
use crate::lexer::{RelOp, Token, TokenKind};
use crate::types::ValueType;

/// What an operator token does, as far as typing is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Concat,
    Logical,
    Relational(RelOp),
    Arithmetic,
}

impl OperatorClass {
    pub fn of(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Concat => Some(OperatorClass::Concat),
            TokenKind::Logical(_) => Some(OperatorClass::Logical),
            TokenKind::Relational(op) => Some(OperatorClass::Relational(op)),
            TokenKind::Arithmetic(_) => Some(OperatorClass::Arithmetic),
            _ => None,
        }
    }
}

/// Type of a literal or identifier token
pub fn token_type(token: &Token, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match token.kind {
        TokenKind::Identifier => table.lookup_value(&token.lexeme, scope)?.declared_type,
        TokenKind::Integer => Some(ValueType::Integer),
        TokenKind::Decimal => Some(ValueType::Decimal),
        TokenKind::Str => Some(ValueType::String),
        TokenKind::Char => Some(ValueType::Char),
        _ => None,
    }
}

pub fn numeric_type(value: &NumericValue) -> ValueType {
    if value.is_decimal() {
        ValueType::Decimal
    } else {
        ValueType::Integer
    }
}

pub fn operand_type(operand: &Operand, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match operand {
        Operand::Expression(expr) => expression_type(expr, table, scope),
        Operand::Token(token) => token_type(token, table, scope),
        Operand::Numeric(value) => Some(numeric_type(value)),
    }
}

/// Concatenation yields a string, logical and relational operators a
/// boolean, arithmetic a decimal if either side is decimal and an integer
/// otherwise
pub fn expression_type(expr: &Expression, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match OperatorClass::of(expr.operator.kind)? {
        OperatorClass::Concat => Some(ValueType::String),
        OperatorClass::Logical | OperatorClass::Relational(_) => Some(ValueType::Boolean),
        OperatorClass::Arithmetic => {
            let a = expr
                .operand_a
                .as_ref()
                .and_then(|operand| operand_type(operand, table, scope));
            let b = operand_type(&expr.operand_b, table, scope);
            if a == Some(ValueType::Decimal) || b == Some(ValueType::Decimal) {
                Some(ValueType::Decimal)
            } else {
                Some(ValueType::Integer)
            }
        }
    }
}

/// Return type of the called function
pub fn call_type(call: &FunctionCall, table: &SymbolTable) -> Option<ValueType> {
    table.lookup_function(&call.name.lexeme)?.declared_type
}

/// An array has the type of its first element
pub fn array_type(array: &Array, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    element_type(array.elements.first()?, table, scope)
}

pub fn element_type(element: &ArrayElement, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match element {
        ArrayElement::Value(operand) => operand_type(operand, table, scope),
        ArrayElement::Array(array) => array_type(array, table, scope),
    }
}

pub fn assign_data_type(data: &AssignData, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match data {
        AssignData::Call(call) => call_type(call, table),
        AssignData::Array(array) => array_type(array, table, scope),
        AssignData::Value(operand) => operand_type(operand, table, scope),
    }
}

pub fn payload_type(payload: &Payload, table: &SymbolTable, scope: &str) -> Option<ValueType> {
    match payload {
        Payload::Call(call) => call_type(call, table),
        Payload::Value(operand) => operand_type(operand, table, scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Location, Span};
    use crate::lexer::{ArithOp, LogicalOp};
    use crate::sema::symbols::{Symbol, UNIT_SCOPE};

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Location::new(0, 0, Span::default()))
    }

    fn number(lexeme: &str) -> Operand {
        let kind = if lexeme.contains('.') { TokenKind::Decimal } else { TokenKind::Integer };
        Operand::Numeric(NumericValue::new(None, token(kind, lexeme)))
    }

    fn binary(a: Operand, op: TokenKind, lexeme: &str, b: Operand) -> Operand {
        Operand::Expression(Box::new(Expression::binary(a, token(op, lexeme), b)))
    }

    #[test]
    fn test_arithmetic_widens_to_decimal() {
        let table = SymbolTable::new();
        let add = TokenKind::Arithmetic(ArithOp::Add);
        assert_eq!(
            operand_type(&binary(number("1"), add, "+", number("2")), &table, UNIT_SCOPE),
            Some(ValueType::Integer)
        );
        assert_eq!(
            operand_type(&binary(number("1"), add, "+", number("2.5")), &table, UNIT_SCOPE),
            Some(ValueType::Decimal)
        );
    }

    #[test]
    fn test_operator_classes() {
        let table = SymbolTable::new();
        let text = Operand::Token(token(TokenKind::Str, "~a~"));
        let concat = binary(text.clone(), TokenKind::Concat, "·", number("1"));
        assert_eq!(operand_type(&concat, &table, UNIT_SCOPE), Some(ValueType::String));

        let less = binary(number("1"), TokenKind::Relational(RelOp::Less), "<", number("2"));
        assert_eq!(operand_type(&less, &table, UNIT_SCOPE), Some(ValueType::Boolean));

        let not = Operand::Expression(Box::new(Expression::unary(
            token(TokenKind::Logical(LogicalOp::Not), "!"),
            text,
        )));
        assert_eq!(operand_type(&not, &table, UNIT_SCOPE), Some(ValueType::Boolean));
    }

    #[test]
    fn test_identifier_uses_symbol_type() {
        let mut table = SymbolTable::new();
        let mut diagnostics = Vec::new();
        let x = token(TokenKind::Identifier, "@x");
        table.insert(Symbol::value(&x, UNIT_SCOPE, Some(ValueType::Char)), &mut diagnostics);

        assert_eq!(token_type(&x, &table, UNIT_SCOPE), Some(ValueType::Char));
        assert_eq!(token_type(&x, &table, "function:@f"), None);
    }
}
