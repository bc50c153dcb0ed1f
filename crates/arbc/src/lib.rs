//! Arroba compiler front end
//!
//! Lexes, parses and checks programs written in Arroba, a small teaching
//! language with Spanish keywords and `@`-prefixed identifiers.
//!
//! ## Architecture
//!
//! - **Lexer** (`lexer/`): priority-ordered matchers producing positioned tokens
//! - **Parser** (`parser/`): backtracking recursive descent over a token cursor
//! - **AST** (`ast/`): tagged syntax tree and its printable form
//! - **Sema** (`sema/`): symbol extraction, then validation against the table
//! - **Driver** (`driver/`): runs the phases and collects their output
//! - **Common** (`common/`): spans, diagnostics and error reporting
//! - **Types** (`types/`): the language's value types

pub mod ast;
pub mod common;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod types;

pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, Span};
pub use driver::{Compilation, CompilerConfig, compile};
