//! End-to-end runs of the front end through `compile`

use arroba_compiler::ast::{AssignData, Declaration, Operand};
use arroba_compiler::common::DiagnosticKind;
use arroba_compiler::lexer::TokenKind;
use arroba_compiler::sema::{SymbolKind, UNIT_SCOPE};
use arroba_compiler::types::ValueType;
use arroba_compiler::{CompilerConfig, compile};
use pretty_assertions::assert_eq;

fn messages(source: &str) -> Vec<String> {
    compile(source)
        .diagnostics
        .into_iter()
        .map(|d| d.message)
        .collect()
}

#[test]
fn test_integer_literal_is_one_token() {
    for literal in ["0", "7", "42", "1000"] {
        for follow in ["#", ")", "]", "}", ","] {
            let source = format!("{literal}{follow}");
            let tokens = compile(&source).tokens;
            assert_eq!(tokens[0].kind, TokenKind::Integer, "{source}");
            assert_eq!(tokens[0].lexeme, literal);
        }
    }
}

#[test]
fn test_parse_is_deterministic() {
    let source = "accion @f(entero @n){ si (@n > 1) { devolucion @n * 2 # } sino { devolucion 1 # } }\n\
                  variable @r = @f(5)#\nmuestre ~r = ~ · @r #";
    let first = compile(source);
    let second = compile(source);
    assert!(!first.has_errors(), "{:?}", first.diagnostics);
    assert_eq!(first.unit, second.unit);
    assert_eq!(first.tree().to_string(), second.tree().to_string());
}

#[test]
fn test_subtraction_folds_left() {
    let compilation = compile("variable @a = 1# variable @b = 2# variable @c = 3# variable @r = @a + @b - @c#");
    assert!(!compilation.has_errors(), "{:?}", compilation.diagnostics);

    let Declaration::Variable(decl) = &compilation.unit.declarations[3] else {
        panic!("expected a variable declaration");
    };
    let Some(AssignData::Value(Operand::Expression(root))) = &decl.value else {
        panic!("expected an expression");
    };
    assert_eq!(root.operator.lexeme, "-");
    assert_eq!(root.operand_b.to_string(), "@c");
    assert_eq!(
        root.operand_a.as_ref().map(ToString::to_string).as_deref(),
        Some("(@a + @b)")
    );
}

#[test]
fn test_reassignment_retypes_variable() {
    let compilation = compile("variable @x = 5#\n@x = ~hola~#");
    assert!(compilation.diagnostics.is_empty());

    let x = compilation.symbols.lookup_value("@x", UNIT_SCOPE).unwrap();
    assert_eq!(x.kind, SymbolKind::Value);
    assert!(x.mutable);
    assert_eq!(x.declared_type, Some(ValueType::String));
}

#[test]
fn test_constant_assignment() {
    let compilation = compile("constant @pi = 3.14#\n@pi = 1#");
    assert_eq!(compilation.diagnostics.len(), 1);

    let diagnostic = &compilation.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::Semantic);
    assert_eq!(diagnostic.message, "cannot assign to constant '@pi'");
    assert_eq!((diagnostic.row, diagnostic.col), (1, 0));
}

#[test]
fn test_argument_type_mismatch() {
    assert_eq!(
        messages("accion @suma(entero @a, entero @b){ devolucion @a + @b #}\n@suma(~x~, 2)"),
        vec!["argument 1 of '@suma' must be integer, found string"]
    );
}

#[test]
fn test_array_element_mismatch() {
    let compilation = compile("variable @v = [1, 2.5, 3]#");
    assert_eq!(compilation.diagnostics.len(), 1);
    assert_eq!(compilation.diagnostics[0].col, 18);
    assert_eq!(
        compilation.diagnostics[0].message,
        "array element '2.5' is decimal, expected integer like the first element"
    );
}

#[test]
fn test_unterminated_string() {
    let compilation = compile("variable @s = ~abc");
    assert_eq!(compilation.tokens.last().map(|t| t.kind), Some(TokenKind::Unknown));
    assert!(compilation.diagnostics[0].is_syntax());
    assert_eq!(
        compilation.diagnostics[0].message,
        "expected value after '=', found '~abc'"
    );
}

#[test]
fn test_syntax_and_semantic_diagnostics_together() {
    let compilation = compile("@y = 1#\nmuestre 2 # )");
    let kinds: Vec<DiagnosticKind> = compilation.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::Syntax, DiagnosticKind::Semantic]);
}

#[test]
fn test_symbol_dump_lists_functions() {
    let compilation = compile("accion @doble(entero @n){ devolucion @n * 2 # }");
    let config = CompilerConfig {
        dump_symbols: true,
        ..CompilerConfig::default()
    };
    let mut out = Vec::new();
    compilation.write_dumps(&config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("@doble"));
    assert!(text.contains("function:@doble"));
    assert!(text.contains("(integer)"));
}
