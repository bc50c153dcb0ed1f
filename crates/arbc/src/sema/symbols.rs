//! Symbol table
//!
//! Scopes are flat labels, not nested frames: `"unit"` for top level and
//! `"function:<name>"` inside a function body. Values are keyed by
//! `(name, scope)`; functions by name alone and are visible everywhere once
//! registered.

use crate::common::{Diagnostic, Location, Span};
use crate::lexer::Token;
use crate::types::ValueType;
use std::collections::HashMap;
use std::fmt;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Scope label of top-level declarations and statements
pub const UNIT_SCOPE: &str = "unit";

/// Scope label of a function body
pub fn function_scope(name: &str) -> String {
    format!("function:{name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Value,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Value => f.pad("value"),
            SymbolKind::Function => f.pad("function"),
        }
    }
}

/// A declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Value type, or return type for functions; `None` when unknown
    pub declared_type: Option<ValueType>,
    pub mutable: bool,
    pub scope: String,
    pub row: usize,
    pub col: usize,
    pub span: Span,
    pub parameter_types: Vec<ValueType>,
}

impl Symbol {
    /// Mutable value declared by `name` in `scope`
    pub fn value(name: &Token, scope: &str, declared_type: Option<ValueType>) -> Self {
        Self {
            name: name.lexeme.clone(),
            kind: SymbolKind::Value,
            declared_type,
            mutable: true,
            scope: scope.to_string(),
            row: name.location.row,
            col: name.location.col,
            span: name.span(),
            parameter_types: Vec::new(),
        }
    }

    pub fn function(
        name: &Token,
        scope: &str,
        return_type: Option<ValueType>,
        parameter_types: Vec<ValueType>,
    ) -> Self {
        Self {
            kind: SymbolKind::Function,
            mutable: false,
            parameter_types,
            ..Self::value(name, scope, return_type)
        }
    }

    pub fn with_mutability(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    pub fn location(&self) -> Location {
        Location::new(self.row, self.col, self.span)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mutability = if self.mutable { "mutable" } else { "immutable" };
        let ty = self
            .declared_type
            .map_or_else(|| "-".to_string(), |ty| ty.to_string());
        write!(
            f,
            "{:<10} {:<8} {:<9} {:<20} {:<7}",
            self.name, self.kind, mutability, self.scope, ty
        )?;
        if self.kind == SymbolKind::Function {
            let params: Vec<String> = self.parameter_types.iter().map(ToString::to_string).collect();
            write!(f, " ({})", params.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SymbolKey {
    kind: SymbolKind,
    name: DefaultSymbol,
    /// Always `None` for functions
    scope: Option<DefaultSymbol>,
}

/// Registry of every symbol declared in one compilation
#[derive(Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    names: DefaultStringInterner,
    index: HashMap<SymbolKey, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol`. A symbol with the same key is a duplicate
    /// declaration: it is reported and the table is left unchanged.
    pub fn insert(&mut self, symbol: Symbol, diagnostics: &mut Vec<Diagnostic>) -> bool {
        let key = self.intern_key(symbol.kind, &symbol.name, &symbol.scope);
        if self.index.contains_key(&key) {
            diagnostics.push(Diagnostic::semantic(
                format!(
                    "symbol '{}' already exists in scope '{}'",
                    symbol.name, symbol.scope
                ),
                symbol.location(),
            ));
            return false;
        }

        log::trace!("registered {} '{}' in '{}'", symbol.kind, symbol.name, symbol.scope);
        self.index.insert(key, self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    /// Find a symbol. `scope` must match exactly for values and is ignored
    /// for functions.
    pub fn lookup(&self, kind: SymbolKind, name: &str, scope: &str) -> Option<&Symbol> {
        let key = self.find_key(kind, name, scope)?;
        self.index.get(&key).map(|&i| &self.symbols[i])
    }

    pub fn lookup_mut(&mut self, kind: SymbolKind, name: &str, scope: &str) -> Option<&mut Symbol> {
        let key = self.find_key(kind, name, scope)?;
        let index = *self.index.get(&key)?;
        self.symbols.get_mut(index)
    }

    pub fn lookup_value(&self, name: &str, scope: &str) -> Option<&Symbol> {
        self.lookup(SymbolKind::Value, name, scope)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Symbol> {
        self.lookup(SymbolKind::Function, name, UNIT_SCOPE)
    }

    /// Replace the stored symbol that has the same key as `symbol`
    pub fn update(&mut self, symbol: Symbol) -> bool {
        match self.lookup_mut(symbol.kind, &symbol.name, &symbol.scope) {
            Some(slot) => {
                *slot = symbol;
                true
            }
            None => false,
        }
    }

    /// Forget everything; every analysis run starts from an empty table
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.index.clear();
        self.names = DefaultStringInterner::default();
    }

    /// Symbols in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn intern_key(&mut self, kind: SymbolKind, name: &str, scope: &str) -> SymbolKey {
        let name = self.names.get_or_intern(name);
        let scope = match kind {
            SymbolKind::Value => Some(self.names.get_or_intern(scope)),
            SymbolKind::Function => None,
        };
        SymbolKey { kind, name, scope }
    }

    /// Key of an existing entry; `None` if a part was never interned
    fn find_key(&self, kind: SymbolKind, name: &str, scope: &str) -> Option<SymbolKey> {
        let name = self.names.get(name)?;
        let scope = match kind {
            SymbolKind::Value => Some(self.names.get(scope)?),
            SymbolKind::Function => None,
        };
        Some(SymbolKey { kind, name, scope })
    }
}
