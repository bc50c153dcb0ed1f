//! Semantic analysis
//!
//! Two passes over a finished tree: [`Extractor`] registers declarations,
//! then [`Validator`] checks names, mutability and types against the table.
//! The table and the diagnostics list are passed in explicitly; nothing is
//! kept between runs.

mod extract;
pub mod infer;
mod symbols;
mod validate;

pub use extract::Extractor;
pub use symbols::{Symbol, SymbolKind, SymbolTable, UNIT_SCOPE, function_scope};
pub use validate::Validator;

use crate::ast::CompilationUnit;
use crate::common::Diagnostic;

/// Run both passes over `unit`, starting from an empty `table`
pub fn analyze(unit: &CompilationUnit, table: &mut SymbolTable) -> Vec<Diagnostic> {
    table.reset();
    let mut diagnostics = Vec::new();

    Extractor::new(table, &mut diagnostics).extract_unit(unit);
    log::debug!(
        "extracted {} symbols, {} diagnostics",
        table.len(),
        diagnostics.len()
    );

    let before = diagnostics.len();
    Validator::new(table, &mut diagnostics).validate_unit(unit);
    log::debug!("validation reported {} diagnostics", diagnostics.len() - before);

    diagnostics
}

/// Semantic analyzer that owns its symbol table
#[derive(Default)]
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a compilation unit; the table is rebuilt on every call
    pub fn analyze(&mut self, unit: &CompilationUnit) -> Vec<Diagnostic> {
        analyze(unit, &mut self.symbols)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::types::ValueType;
    use pretty_assertions::assert_eq;

    fn parse_clean(source: &str) -> CompilationUnit {
        let tokens = tokenize(source);
        let (unit, syntax) = parse(&tokens, source.len());
        assert!(syntax.is_empty(), "unexpected syntax diagnostics: {syntax:?}");
        unit
    }

    fn check(source: &str) -> (SemanticAnalyzer, Vec<String>) {
        let unit = parse_clean(source);
        let mut analyzer = SemanticAnalyzer::new();
        let messages = analyzer.analyze(&unit).into_iter().map(|d| d.message).collect();
        (analyzer, messages)
    }

    #[test]
    fn test_assignment_retypes_variable() {
        let (analyzer, messages) = check("variable @x = 5#\n@x = ~hola~#");
        assert!(messages.is_empty(), "{messages:?}");
        let x = analyzer.symbols().lookup_value("@x", UNIT_SCOPE).unwrap();
        assert_eq!(x.declared_type, Some(ValueType::String));
    }

    #[test]
    fn test_assign_to_constant() {
        let source = "constante @pi = 3.14#\n@pi = 1#";
        let unit = parse_clean(source);
        let mut table = SymbolTable::new();
        let diagnostics = analyze(&unit, &mut table);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "cannot assign to constant '@pi'");
        assert_eq!((diagnostics[0].row, diagnostics[0].col), (1, 0));
        // a constant keeps its type
        assert_eq!(
            table.lookup_value("@pi", UNIT_SCOPE).and_then(|s| s.declared_type),
            Some(ValueType::Decimal)
        );
    }

    #[test]
    fn test_call_argument_type_mismatch() {
        let (_, messages) = check(
            "accion @suma(entero @a, entero @b){ devolucion @a + @b #}\n@suma(~x~, 2)",
        );
        assert_eq!(messages, vec!["argument 1 of '@suma' must be integer, found string"]);
    }

    #[test]
    fn test_call_argument_count() {
        let (_, messages) = check("accion @f(entero @a){ devolucion @a # } @f(1, 2)#");
        assert_eq!(messages, vec!["function '@f' expects 1 argument(s), found 2"]);
    }

    #[test]
    fn test_undeclared_function_and_argument() {
        let (_, messages) = check("@g(@y)#");
        assert_eq!(
            messages,
            vec![
                "undeclared function '@g'",
                "undeclared variable '@y' in scope 'unit'",
            ]
        );
    }

    #[test]
    fn test_array_element_mismatch() {
        let (_, messages) = check("variable @v = [1, 2.5, 3]#");
        assert_eq!(
            messages,
            vec!["array element '2.5' is decimal, expected integer like the first element"]
        );
    }

    #[test]
    fn test_array_reports_every_mismatch() {
        let (_, messages) = check("variable @v = [~a~, 1, ^b^, ~c~]#");
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_function_scope_is_isolated() {
        let (_, messages) = check("variable @g = 1# accion @f(){ muestre @g # }");
        assert_eq!(messages, vec!["undeclared variable '@g' in scope 'function:@f'"]);
    }

    #[test]
    fn test_arithmetic_needs_one_numeric_side() {
        let (_, messages) = check("variable @a = ~x~ - 1# variable @b = ~x~ * ^y^#");
        assert_eq!(
            messages,
            vec!["operator '*' requires numeric operands, found string and char"]
        );
    }

    #[test]
    fn test_ordering_rejects_text() {
        let (_, messages) = check("variable @s = ~a~# si (@s <= ~b~) { muestre 1 # } si (@s == ~b~) { muestre 2 # }");
        assert_eq!(messages, vec!["operator '<=' cannot order string and string values"]);
    }

    #[test]
    fn test_strict_ordering_accepts_text() {
        let (_, messages) = check(
            "variable @s = ~a~# si (@s < ~b~) { muestre 1 # } si (^x^ > @s) { muestre 2 # }",
        );
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_untyped_variable_is_not_numeric() {
        let (_, messages) = check("variable @y# variable @z = @y * ~s~#");
        assert_eq!(
            messages,
            vec!["operator '*' requires numeric operands, found untyped and string"]
        );
    }

    #[test]
    fn test_untyped_argument_mismatch() {
        let (_, messages) = check("accion @f(entero @a){ devolucion @a # } variable @u# @f(@u)#");
        assert_eq!(messages, vec!["argument 1 of '@f' must be integer, found untyped"]);
    }

    #[test]
    fn test_undeclared_operand_skips_type_checks() {
        let (_, messages) = check("accion @f(entero @a){ devolucion @a # } variable @z = @q * ~s~# @f(@q)#");
        assert_eq!(
            messages,
            vec![
                "undeclared variable '@q' in scope 'unit'",
                "undeclared variable '@q' in scope 'unit'",
            ]
        );
    }

    #[test]
    fn test_increment_checks() {
        let (_, messages) = check("constante @k = ~t~# variable @n = 1# @k++ @n-- @z++");
        assert_eq!(
            messages,
            vec![
                "cannot increment constant '@k'",
                "cannot increment '@k' of type string",
                "undeclared variable '@z' in scope 'unit'",
            ]
        );
    }

    #[test]
    fn test_call_without_return_value() {
        let (_, messages) = check("accion @log(){ muestre 1 # } variable @x = 0# @x = @log()#");
        assert_eq!(messages, vec!["function '@log' does not return a value"]);
    }

    #[test]
    fn test_undeclared_assignment_target() {
        let (_, messages) = check("@q = 1#");
        assert_eq!(messages, vec!["undeclared variable '@q' in scope 'unit'"]);
    }

    #[test]
    fn test_recursive_call_is_known() {
        let (_, messages) =
            check("accion @f(entero @n){ si (@n > 0) { @f(@n - 1) # } devolucion @n # }");
        assert!(messages.is_empty(), "{messages:?}");
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let unit = parse_clean("variable @x = 1# @x = ~s~# @y = 2# constante @c = 1# @c = 2#");
        let mut analyzer = SemanticAnalyzer::new();
        let first = analyzer.analyze(&unit);
        let second = analyzer.analyze(&unit);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(analyzer.symbols().len(), 2);
    }
}
