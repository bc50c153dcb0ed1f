//! Expression AST nodes

use crate::lexer::{Token, TokenKind};
use std::fmt;

/// Number literal with an optional explicit sign: `5`, `- 2.5`
#[derive(Debug, Clone, PartialEq)]
pub struct NumericValue {
    pub sign: Option<Token>,
    pub number: Token,
}

impl NumericValue {
    pub fn new(sign: Option<Token>, number: Token) -> Self {
        Self { sign, number }
    }

    pub fn is_decimal(&self) -> bool {
        self.number.kind == TokenKind::Decimal
    }

    pub fn first_token(&self) -> &Token {
        self.sign.as_ref().unwrap_or(&self.number)
    }

    /// Source text of the value, sign included
    pub fn text(&self) -> String {
        match &self.sign {
            Some(sign) => format!("{}{}", sign.lexeme, self.number.lexeme),
            None => self.number.lexeme.clone(),
        }
    }
}

/// One side of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Expression(Box<Expression>),
    /// Identifier, string or char literal
    Token(Token),
    Numeric(NumericValue),
}

impl Operand {
    /// Leftmost token; diagnostics about the operand point here
    pub fn first_token(&self) -> &Token {
        match self {
            Operand::Expression(expr) => expr.first_token(),
            Operand::Token(token) => token,
            Operand::Numeric(value) => value.first_token(),
        }
    }
}

/// Binary or unary operation. `operand_a` is absent only for `!`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub operand_a: Option<Operand>,
    pub operator: Token,
    pub operand_b: Operand,
}

impl Expression {
    pub fn binary(operand_a: Operand, operator: Token, operand_b: Operand) -> Self {
        Self {
            operand_a: Some(operand_a),
            operator,
            operand_b,
        }
    }

    pub fn unary(operator: Token, operand: Operand) -> Self {
        Self {
            operand_a: None,
            operator,
            operand_b: operand,
        }
    }

    pub fn first_token(&self) -> &Token {
        match &self.operand_a {
            Some(operand) => operand.first_token(),
            None => &self.operator,
        }
    }
}

/// Array literal: `[` elements `]`
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub open: Token,
    pub elements: Vec<ArrayElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Value(Operand),
    Array(Array),
}

impl ArrayElement {
    pub fn first_token(&self) -> &Token {
        match self {
            ArrayElement::Value(operand) => operand.first_token(),
            ArrayElement::Array(array) => &array.open,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: Operand,
}

/// Call: `@name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Token,
    pub arguments: Vec<Argument>,
}

/// Right-hand side of a declaration or assignment
#[derive(Debug, Clone, PartialEq)]
pub enum AssignData {
    Call(FunctionCall),
    Array(Array),
    Value(Operand),
}

impl AssignData {
    pub fn first_token(&self) -> &Token {
        match self {
            AssignData::Call(call) => &call.name,
            AssignData::Array(array) => &array.open,
            AssignData::Value(operand) => operand.first_token(),
        }
    }
}

/// Value of a print, read or return statement
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Call(FunctionCall),
    Value(Operand),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Expression(expr) => write!(f, "{expr}"),
            Operand::Token(token) => write!(f, "{}", token.lexeme),
            Operand::Numeric(value) => write!(f, "{}", value.text()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand_a {
            Some(a) => write!(f, "({} {} {})", a, self.operator.lexeme, self.operand_b),
            None => write!(f, "({}{})", self.operator.lexeme, self.operand_b),
        }
    }
}
