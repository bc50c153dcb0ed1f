//! Second pass: check every node against the filled symbol table
//!
//! No check stops the walk. An undeclared name is reported once where it
//! is referenced and is then left out of operator and argument checks. A
//! declared name without a known type takes part in them as "untyped".

use super::infer::{self, OperatorClass};
use super::symbols::{SymbolTable, UNIT_SCOPE, function_scope};
use crate::ast::*;
use crate::common::Diagnostic;
use crate::lexer::{Token, TokenKind};
use crate::types::ValueType;

pub struct Validator<'a> {
    table: &'a mut SymbolTable,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Validator<'a> {
    pub fn new(table: &'a mut SymbolTable, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self { table, diagnostics }
    }

    pub fn validate_unit(&mut self, unit: &CompilationUnit) {
        for decl in &unit.declarations {
            match decl {
                Declaration::Variable(var) => self.validate_variable(var, UNIT_SCOPE),
                Declaration::Constant(constant) => self.validate_constant(constant, UNIT_SCOPE),
            }
        }
        for func in &unit.functions {
            self.validate_statements(&func.body, &function_scope(&func.name.lexeme));
        }
        self.validate_statements(&unit.statements, UNIT_SCOPE);
    }

    fn error(&mut self, message: String, at: &Token) {
        self.diagnostics.push(Diagnostic::semantic(message, at.location));
    }

    // ==================== Declarations ====================

    fn validate_variable(&mut self, var: &VariableDeclaration, scope: &str) {
        if let Some(value) = &var.value {
            self.validate_assign_data(value, scope);
        }
    }

    fn validate_constant(&mut self, constant: &ConstantDeclaration, scope: &str) {
        self.validate_assign_data(&constant.value, scope);
    }

    // ==================== Statements ====================

    fn validate_statements(&mut self, statements: &[Statement], scope: &str) {
        for stmt in statements {
            self.validate_statement(stmt, scope);
        }
    }

    fn validate_statement(&mut self, stmt: &Statement, scope: &str) {
        match stmt {
            Statement::Print(print) => self.validate_payload(&print.value, scope),
            Statement::Return(ret) => self.validate_payload(&ret.value, scope),
            Statement::Read(read) => self.validate_payload(&read.value, scope),
            Statement::Decision(decision) => {
                self.validate_operand(&decision.condition, scope);
                self.validate_statements(&decision.then_branch, scope);
                if let Some(else_branch) = &decision.else_branch {
                    self.validate_statements(else_branch, scope);
                }
            }
            Statement::Variable(var) => self.validate_variable(var, scope),
            Statement::Constant(constant) => self.validate_constant(constant, scope),
            Statement::Assignment(assign) => self.validate_assignment(assign, scope),
            Statement::DoWhile(lp) => {
                self.validate_statements(&lp.body, scope);
                self.validate_operand(&lp.condition, scope);
            }
            Statement::Call(call) => self.validate_call(call, scope),
            Statement::Increment(inc) => self.validate_step(&inc.target, "increment", scope),
            Statement::Decrement(dec) => self.validate_step(&dec.target, "decrement", scope),
        }
    }

    /// The target must be a declared, mutable variable. After the value is
    /// checked the variable takes on the value's type.
    fn validate_assignment(&mut self, assign: &Assignment, scope: &str) {
        let target = &assign.target;
        let symbol = self.table.lookup_value(&target.lexeme, scope).cloned();
        match &symbol {
            None => self.error(undeclared_variable(target, scope), target),
            Some(symbol) if !symbol.mutable => {
                self.error(format!("cannot assign to constant '{}'", target.lexeme), target);
            }
            Some(_) => {}
        }

        self.validate_assign_data(&assign.value, scope);

        let Some(mut symbol) = symbol.filter(|s| s.mutable) else {
            return;
        };
        let inferred = infer::assign_data_type(&assign.value, self.table, scope);
        if inferred.is_some() && inferred != symbol.declared_type {
            log::trace!(
                "'{}' in '{}' retyped from {:?} to {:?}",
                symbol.name,
                scope,
                symbol.declared_type,
                inferred
            );
            symbol.declared_type = inferred;
            self.table.update(symbol);
        }
    }

    /// Operand of `++`/`--`: declared, mutable and numeric, each checked on its own
    fn validate_step(&mut self, target: &Token, action: &str, scope: &str) {
        let Some(symbol) = self.table.lookup_value(&target.lexeme, scope).cloned() else {
            self.error(undeclared_variable(target, scope), target);
            return;
        };
        if !symbol.mutable {
            self.error(format!("cannot {action} constant '{}'", target.lexeme), target);
        }
        if !symbol.declared_type.is_some_and(ValueType::is_numeric) {
            self.error(
                format!(
                    "cannot {action} '{}' of type {}",
                    target.lexeme,
                    describe(symbol.declared_type)
                ),
                target,
            );
        }
    }

    // ==================== Values ====================

    fn validate_payload(&mut self, payload: &Payload, scope: &str) {
        match payload {
            Payload::Call(call) => self.validate_call(call, scope),
            Payload::Value(operand) => self.validate_operand(operand, scope),
        }
    }

    fn validate_assign_data(&mut self, data: &AssignData, scope: &str) {
        match data {
            AssignData::Call(call) => {
                self.validate_call(call, scope);
                self.check_call_has_value(call);
            }
            AssignData::Array(array) => self.validate_array(array, scope),
            AssignData::Value(operand) => self.validate_operand(operand, scope),
        }
    }

    /// A call used as a value must reach a function that returns something
    fn check_call_has_value(&mut self, call: &FunctionCall) {
        let returns_nothing = self
            .table
            .lookup_function(&call.name.lexeme)
            .is_some_and(|func| func.declared_type.is_none());
        if returns_nothing {
            self.error(
                format!("function '{}' does not return a value", call.name.lexeme),
                &call.name,
            );
        }
    }

    fn validate_operand(&mut self, operand: &Operand, scope: &str) {
        match operand {
            Operand::Expression(expr) => self.validate_expression(expr, scope),
            Operand::Token(token) => self.validate_reference(token, scope),
            Operand::Numeric(_) => {}
        }
    }

    /// Inferred type of `operand`; `None` for an undeclared name, which
    /// has already been reported
    fn checked_type(&self, operand: &Operand, scope: &str) -> Option<Option<ValueType>> {
        let undeclared = matches!(
            operand,
            Operand::Token(token)
                if token.kind == TokenKind::Identifier
                    && self.table.lookup_value(&token.lexeme, scope).is_none()
        );
        (!undeclared).then(|| infer::operand_type(operand, self.table, scope))
    }

    fn validate_reference(&mut self, token: &Token, scope: &str) {
        if token.kind == TokenKind::Identifier && self.table.lookup_value(&token.lexeme, scope).is_none() {
            self.error(undeclared_variable(token, scope), token);
        }
    }

    fn validate_expression(&mut self, expr: &Expression, scope: &str) {
        if let Some(operand_a) = &expr.operand_a {
            self.validate_operand(operand_a, scope);
        }
        self.validate_operand(&expr.operand_b, scope);

        let Some(operand_a) = &expr.operand_a else {
            return;
        };
        let (Some(a), Some(b)) = (
            self.checked_type(operand_a, scope),
            self.checked_type(&expr.operand_b, scope),
        ) else {
            return;
        };
        let operator = &expr.operator;

        match OperatorClass::of(operator.kind) {
            // one numeric side is enough
            Some(OperatorClass::Arithmetic) => {
                let numeric = |ty: Option<ValueType>| ty.is_some_and(ValueType::is_numeric);
                if !numeric(a) && !numeric(b) {
                    self.error(
                        format!(
                            "operator '{}' requires numeric operands, found {} and {}",
                            operator.lexeme,
                            describe(a),
                            describe(b)
                        ),
                        operator,
                    );
                }
            }
            Some(OperatorClass::Relational(op)) if op.is_inclusive_ordering() => {
                let textual = |ty: Option<ValueType>| ty.is_some_and(ValueType::is_textual);
                if textual(a) || textual(b) {
                    self.error(
                        format!(
                            "operator '{}' cannot order {} and {} values",
                            operator.lexeme,
                            describe(a),
                            describe(b)
                        ),
                        operator,
                    );
                }
            }
            _ => {}
        }
    }

    /// Every element must have the type of the first one
    fn validate_array(&mut self, array: &Array, scope: &str) {
        for element in &array.elements {
            match element {
                ArrayElement::Value(operand) => self.validate_operand(operand, scope),
                ArrayElement::Array(nested) => self.validate_array(nested, scope),
            }
        }

        let Some((first, rest)) = array.elements.split_first() else {
            return;
        };
        let Some(expected) = infer::element_type(first, self.table, scope) else {
            return;
        };
        for element in rest {
            let Some(found) = infer::element_type(element, self.table, scope) else {
                continue;
            };
            if found != expected {
                let at = element.first_token();
                self.error(
                    format!(
                        "array element '{}' is {found}, expected {expected} like the first element",
                        at.lexeme
                    ),
                    at,
                );
            }
        }
    }

    fn validate_call(&mut self, call: &FunctionCall, scope: &str) {
        let name = &call.name;
        match self.table.lookup_function(&name.lexeme).cloned() {
            None => self.error(format!("undeclared function '{}'", name.lexeme), name),
            Some(func) => {
                let expected = func.parameter_types.len();
                let found = call.arguments.len();
                if expected != found {
                    self.error(
                        format!(
                            "function '{}' expects {expected} argument(s), found {found}",
                            name.lexeme
                        ),
                        name,
                    );
                }

                for (position, (argument, &param)) in
                    call.arguments.iter().zip(&func.parameter_types).enumerate()
                {
                    let Some(arg_type) = self.checked_type(&argument.value, scope) else {
                        continue;
                    };
                    if arg_type != Some(param) {
                        self.error(
                            format!(
                                "argument {} of '{}' must be {param}, found {}",
                                position + 1,
                                name.lexeme,
                                describe(arg_type)
                            ),
                            argument.value.first_token(),
                        );
                    }
                }
            }
        }

        for argument in &call.arguments {
            self.validate_operand(&argument.value, scope);
        }
    }
}

fn undeclared_variable(token: &Token, scope: &str) -> String {
    format!("undeclared variable '{}' in scope '{scope}'", token.lexeme)
}

fn describe(ty: Option<ValueType>) -> String {
    ty.map_or_else(|| "untyped".to_string(), |ty| ty.to_string())
}
