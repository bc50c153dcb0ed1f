//! Generic labeled tree for display
//!
//! Every node kind converts itself into a [`TreeNode`]; renderers only ever
//! see labels and children.

use super::*;
use crate::lexer::Token;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn new(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    fn group(label: &str, items: &[impl ToTree]) -> Self {
        Self::new(label, items.iter().map(ToTree::to_tree).collect())
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.label, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Conversion of a syntax node into its display tree
pub trait ToTree {
    fn to_tree(&self) -> TreeNode;
}

impl ToTree for CompilationUnit {
    fn to_tree(&self) -> TreeNode {
        let mut children = Vec::new();
        if !self.declarations.is_empty() {
            children.push(TreeNode::group("Declarations", &self.declarations));
        }
        if !self.functions.is_empty() {
            children.push(TreeNode::group("Functions", &self.functions));
        }
        if !self.statements.is_empty() {
            children.push(TreeNode::group("Statements", &self.statements));
        }
        TreeNode::new("Compilation unit", children)
    }
}

// ==================== Declarations ====================

impl ToTree for Declaration {
    fn to_tree(&self) -> TreeNode {
        match self {
            Declaration::Variable(decl) => decl.to_tree(),
            Declaration::Constant(decl) => decl.to_tree(),
        }
    }
}

impl ToTree for VariableDeclaration {
    fn to_tree(&self) -> TreeNode {
        let children = self.value.iter().map(ToTree::to_tree).collect();
        TreeNode::new(format!("Variable declaration: {}", self.name.lexeme), children)
    }
}

impl ToTree for ConstantDeclaration {
    fn to_tree(&self) -> TreeNode {
        TreeNode::new(
            format!("Constant declaration: {}", self.name.lexeme),
            vec![self.value.to_tree()],
        )
    }
}

impl ToTree for FunctionDeclaration {
    fn to_tree(&self) -> TreeNode {
        TreeNode::new(
            format!("Function declaration: {}", self.name.lexeme),
            vec![
                TreeNode::group("Parameters", &self.parameters),
                TreeNode::group("Body", &self.body),
            ],
        )
    }
}

impl ToTree for Parameter {
    fn to_tree(&self) -> TreeNode {
        TreeNode::leaf(format!("Parameter: {} {}", self.ty, self.name.lexeme))
    }
}

// ==================== Statements ====================

impl ToTree for Statement {
    fn to_tree(&self) -> TreeNode {
        match self {
            Statement::Print(stmt) => TreeNode::new("Print", vec![stmt.value.to_tree()]),
            Statement::Return(stmt) => TreeNode::new("Return", vec![stmt.value.to_tree()]),
            Statement::Read(stmt) => TreeNode::new("Read", vec![stmt.value.to_tree()]),
            Statement::Decision(stmt) => stmt.to_tree(),
            Statement::Variable(decl) => decl.to_tree(),
            Statement::Constant(decl) => decl.to_tree(),
            Statement::Assignment(stmt) => TreeNode::new(
                format!("Assignment: {}", stmt.target.lexeme),
                vec![stmt.value.to_tree()],
            ),
            Statement::DoWhile(stmt) => TreeNode::new(
                "Do-while loop",
                vec![
                    TreeNode::group("Body", &stmt.body),
                    TreeNode::new("Condition", vec![stmt.condition.to_tree()]),
                ],
            ),
            Statement::Call(call) => call.to_tree(),
            Statement::Increment(stmt) => {
                TreeNode::leaf(format!("Increment: {}", stmt.target.lexeme))
            }
            Statement::Decrement(stmt) => {
                TreeNode::leaf(format!("Decrement: {}", stmt.target.lexeme))
            }
        }
    }
}

impl ToTree for Decision {
    fn to_tree(&self) -> TreeNode {
        let mut children = vec![
            TreeNode::new("Condition", vec![self.condition.to_tree()]),
            TreeNode::group("Then", &self.then_branch),
        ];
        if let Some(else_branch) = &self.else_branch {
            children.push(TreeNode::group("Else", else_branch));
        }
        TreeNode::new("Decision", children)
    }
}

// ==================== Expressions ====================

impl ToTree for Token {
    fn to_tree(&self) -> TreeNode {
        TreeNode::leaf(format!("{}: {}", self.kind, self.lexeme))
    }
}

impl ToTree for NumericValue {
    fn to_tree(&self) -> TreeNode {
        TreeNode::leaf(format!("Numeric value: {}", self.text()))
    }
}

impl ToTree for Operand {
    fn to_tree(&self) -> TreeNode {
        match self {
            Operand::Expression(expr) => expr.to_tree(),
            Operand::Token(token) => token.to_tree(),
            Operand::Numeric(value) => value.to_tree(),
        }
    }
}

impl ToTree for Expression {
    fn to_tree(&self) -> TreeNode {
        let mut children = Vec::with_capacity(3);
        if let Some(operand_a) = &self.operand_a {
            children.push(operand_a.to_tree());
        }
        children.push(TreeNode::leaf(format!("Operator: {}", self.operator.lexeme)));
        children.push(self.operand_b.to_tree());
        TreeNode::new("Expression", children)
    }
}

impl ToTree for Array {
    fn to_tree(&self) -> TreeNode {
        TreeNode::group("Array", &self.elements)
    }
}

impl ToTree for ArrayElement {
    fn to_tree(&self) -> TreeNode {
        match self {
            ArrayElement::Value(operand) => operand.to_tree(),
            ArrayElement::Array(array) => array.to_tree(),
        }
    }
}

impl ToTree for Argument {
    fn to_tree(&self) -> TreeNode {
        TreeNode::new("Argument", vec![self.value.to_tree()])
    }
}

impl ToTree for FunctionCall {
    fn to_tree(&self) -> TreeNode {
        TreeNode::new(
            format!("Function call: {}", self.name.lexeme),
            self.arguments.iter().map(ToTree::to_tree).collect(),
        )
    }
}

impl ToTree for AssignData {
    fn to_tree(&self) -> TreeNode {
        match self {
            AssignData::Call(call) => call.to_tree(),
            AssignData::Array(array) => array.to_tree(),
            AssignData::Value(operand) => operand.to_tree(),
        }
    }
}

impl ToTree for Payload {
    fn to_tree(&self) -> TreeNode {
        match self {
            Payload::Call(call) => call.to_tree(),
            Payload::Value(operand) => operand.to_tree(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Location;
    use crate::lexer::{ArithOp, TokenKind};

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Location::default())
    }

    #[test]
    fn test_render_indented() {
        let tree = TreeNode::new(
            "Print",
            vec![TreeNode::new("Expression", vec![TreeNode::leaf("Operator: +")])],
        );
        assert_eq!(tree.to_string(), "Print\n  Expression\n    Operator: +\n");
    }

    #[test]
    fn test_expression_tree() {
        let expr = Expression::binary(
            Operand::Token(token(TokenKind::Identifier, "@a")),
            token(TokenKind::Arithmetic(ArithOp::Add), "+"),
            Operand::Numeric(NumericValue::new(None, token(TokenKind::Integer, "1"))),
        );
        let tree = expr.to_tree();
        assert_eq!(tree.label, "Expression");
        let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["identifier: @a", "Operator: +", "Numeric value: 1"]);
    }

    #[test]
    fn test_empty_unit() {
        let tree = CompilationUnit::default().to_tree();
        assert_eq!(tree, TreeNode::leaf("Compilation unit"));
    }
}
