//! Compilation driver and pipeline orchestration
//!
//! [`compile`] runs lex, parse and both semantic passes over one source
//! text and always returns everything it built, diagnostics included.

use crate::ast::{CompilationUnit, ToTree, TreeNode};
use crate::common::Diagnostic;
use crate::lexer::{Token, tokenize};
use crate::parser::parse;
use crate::sema::{SymbolTable, analyze};
use std::io::{self, Write};

/// Which intermediate results to print after a compile
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerConfig {
    pub dump_tokens: bool,
    pub dump_tree: bool,
    pub dump_symbols: bool,
}

/// Result of compiling one source text
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub unit: CompilationUnit,
    /// Syntax diagnostics first, then semantic ones, each in discovery order
    pub diagnostics: Vec<Diagnostic>,
    pub symbols: SymbolTable,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn tree(&self) -> TreeNode {
        self.unit.to_tree()
    }

    /// Print the dumps selected in `config`
    pub fn write_dumps(&self, config: &CompilerConfig, out: &mut impl Write) -> io::Result<()> {
        if config.dump_tokens {
            writeln!(out, "=== Tokens ===")?;
            for token in &self.tokens {
                writeln!(
                    out,
                    "{:>4}:{:<4} {:<24} {}",
                    token.location.row,
                    token.location.col,
                    token.kind.to_string(),
                    token.lexeme
                )?;
            }
        }
        if config.dump_tree {
            writeln!(out, "=== Tree ===")?;
            write!(out, "{}", self.tree())?;
        }
        if config.dump_symbols {
            writeln!(out, "=== Symbols ===")?;
            for symbol in self.symbols.iter() {
                writeln!(out, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// Compile `source` from scratch
pub fn compile(source: &str) -> Compilation {
    log::info!("lexing {} bytes", source.len());
    let tokens = tokenize(source);

    log::info!("parsing {} tokens", tokens.len());
    let (unit, mut diagnostics) = parse(&tokens, source.len());
    log::debug!("{} syntax diagnostics", diagnostics.len());

    log::info!("analyzing");
    let mut symbols = SymbolTable::new();
    diagnostics.extend(analyze(&unit, &mut symbols));

    Compilation {
        tokens,
        unit,
        diagnostics,
        symbols,
    }
}
