//! Abstract Syntax Tree definitions

mod decl;
mod expr;
mod stmt;
mod tree;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use tree::{ToTree, TreeNode};

/// Root of one compilation: declarations, then functions, then statements,
/// each in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationUnit {
    pub declarations: Vec<Declaration>,
    pub functions: Vec<FunctionDeclaration>,
    pub statements: Vec<Statement>,
}

impl CompilationUnit {
    pub fn new(
        declarations: Vec<Declaration>,
        functions: Vec<FunctionDeclaration>,
        statements: Vec<Statement>,
    ) -> Self {
        Self {
            declarations,
            functions,
            statements,
        }
    }
}
