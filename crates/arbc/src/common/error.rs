//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::{Diagnostic, DiagnosticKind};

/// Tool-level failure. Language problems are [`Diagnostic`]s, not errors.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("cannot read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compilation failed with {count} diagnostic(s)")]
    Failed { count: usize },
}

impl CompileError {
    pub fn input(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    pub fn failed(count: usize) -> Self {
        Self::Failed { count }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Render one language diagnostic against the file it came from
    pub fn report(&self, file_id: usize, diagnostic: &Diagnostic) {
        let title = match diagnostic.kind {
            DiagnosticKind::Syntax => "Syntax error",
            DiagnosticKind::Semantic => "Semantic error",
        };
        let report = Report::error()
            .with_message(title)
            .with_labels(vec![
                Label::primary(file_id, diagnostic.span.start..diagnostic.span.end)
                    .with_message(diagnostic.message.clone()),
            ])
            .with_notes(vec![format!("row {}, col {}", diagnostic.row, diagnostic.col)]);

        self.emit(&report);
    }

    pub fn report_all(&self, file_id: usize, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.report(file_id, diagnostic);
        }
    }

    fn emit(&self, report: &Report<usize>) {
        if let Err(err) = term::emit(&mut self.writer.lock(), &self.config, &self.files, report) {
            log::warn!("failed to render diagnostic: {err}");
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
