//! Statement AST nodes

use super::{AssignData, ConstantDeclaration, FunctionCall, Operand, Payload, VariableDeclaration};
use crate::lexer::Token;

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `muestre` value `#`
    Print(Print),
    /// `devolucion` value `#`
    Return(Return),
    /// `leer` value `#`
    Read(Read),
    /// `si (cond) { ... } [sino { ... }]`
    Decision(Decision),
    Variable(VariableDeclaration),
    Constant(ConstantDeclaration),
    /// `@x = value #`
    Assignment(Assignment),
    /// `hacer { ... } mientras (cond) #`
    DoWhile(DoWhileLoop),
    /// `@f(args) [#]`
    Call(FunctionCall),
    /// `@x++ [#]`
    Increment(Increment),
    /// `@x-- [#]`
    Decrement(Decrement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub keyword: Token,
    pub value: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub keyword: Token,
    pub value: Payload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Read {
    pub keyword: Token,
    pub value: Payload,
}

/// Conditional with an optional else branch
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub keyword: Token,
    pub condition: Operand,
    pub then_branch: Vec<Statement>,
    pub else_branch: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileLoop {
    pub keyword: Token,
    pub body: Vec<Statement>,
    pub condition: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Token,
    pub operator: Token,
    pub value: AssignData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Increment {
    pub target: Token,
    pub operator: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decrement {
    pub target: Token,
    pub operator: Token,
}
