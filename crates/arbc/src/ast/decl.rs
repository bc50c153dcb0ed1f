//! Declaration AST nodes

use super::{AssignData, Statement};
use crate::lexer::Token;
use crate::types::ValueType;

/// Top-level declaration, before any function
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Constant(ConstantDeclaration),
}

/// `variable @x [= value] #`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub keyword: Token,
    pub name: Token,
    pub value: Option<AssignData>,
}

/// `constante @x = value #`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDeclaration {
    pub keyword: Token,
    pub name: Token,
    pub value: AssignData,
}

/// `entero @a`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_keyword: Token,
    pub ty: ValueType,
    pub name: Token,
}

/// `accion @f(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub keyword: Token,
    pub name: Token,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
}

impl FunctionDeclaration {
    pub fn parameter_types(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|p| p.ty).collect()
    }
}
