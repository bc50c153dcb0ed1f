//! First pass: register every declared symbol

use super::infer;
use super::symbols::{Symbol, SymbolTable, UNIT_SCOPE, function_scope};
use crate::ast::*;
use crate::common::Diagnostic;

/// Walks the tree depth-first and fills the symbol table
pub struct Extractor<'a> {
    table: &'a mut SymbolTable,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Extractor<'a> {
    pub fn new(table: &'a mut SymbolTable, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self { table, diagnostics }
    }

    pub fn extract_unit(&mut self, unit: &CompilationUnit) {
        for decl in &unit.declarations {
            match decl {
                Declaration::Variable(var) => self.extract_variable(var, UNIT_SCOPE),
                Declaration::Constant(constant) => self.extract_constant(constant, UNIT_SCOPE),
            }
        }
        for func in &unit.functions {
            self.extract_function(func, UNIT_SCOPE);
        }
        self.extract_statements(&unit.statements, UNIT_SCOPE);
    }

    fn extract_variable(&mut self, var: &VariableDeclaration, scope: &str) {
        let ty = var
            .value
            .as_ref()
            .and_then(|value| infer::assign_data_type(value, self.table, scope));
        self.table.insert(Symbol::value(&var.name, scope, ty), self.diagnostics);
    }

    fn extract_constant(&mut self, constant: &ConstantDeclaration, scope: &str) {
        let ty = infer::assign_data_type(&constant.value, self.table, scope);
        let symbol = Symbol::value(&constant.name, scope, ty).with_mutability(false);
        self.table.insert(symbol, self.diagnostics);
    }

    /// Parameters and body go into the function's own scope; the function
    /// itself is registered last, typed by its first `return`
    fn extract_function(&mut self, func: &FunctionDeclaration, scope: &str) {
        let body_scope = function_scope(&func.name.lexeme);

        for param in &func.parameters {
            let symbol = Symbol::value(&param.name, &body_scope, Some(param.ty));
            self.table.insert(symbol, self.diagnostics);
        }
        self.extract_statements(&func.body, &body_scope);

        let return_type = first_return(&func.body)
            .and_then(|ret| infer::payload_type(&ret.value, self.table, &body_scope));
        let symbol = Symbol::function(&func.name, scope, return_type, func.parameter_types());
        self.table.insert(symbol, self.diagnostics);
    }

    fn extract_statements(&mut self, statements: &[Statement], scope: &str) {
        for stmt in statements {
            match stmt {
                Statement::Variable(var) => self.extract_variable(var, scope),
                Statement::Constant(constant) => self.extract_constant(constant, scope),
                Statement::Decision(decision) => {
                    self.extract_statements(&decision.then_branch, scope);
                    if let Some(else_branch) = &decision.else_branch {
                        self.extract_statements(else_branch, scope);
                    }
                }
                Statement::DoWhile(lp) => self.extract_statements(&lp.body, scope),
                Statement::Print(_)
                | Statement::Return(_)
                | Statement::Read(_)
                | Statement::Assignment(_)
                | Statement::Call(_)
                | Statement::Increment(_)
                | Statement::Decrement(_) => {}
            }
        }
    }
}

/// First `return` in source order, looking inside nested blocks
fn first_return(statements: &[Statement]) -> Option<&Return> {
    statements.iter().find_map(|stmt| match stmt {
        Statement::Return(ret) => Some(ret),
        Statement::Decision(decision) => first_return(&decision.then_branch).or_else(|| {
            decision
                .else_branch
                .as_deref()
                .and_then(first_return)
        }),
        Statement::DoWhile(lp) => first_return(&lp.body),
        _ => None,
    })
}
