//! Diagnostic reporting.
//!
//! Every compiler-detected problem falls into one of two buckets:
//! *diagnostic* (recoverable — reported, pipeline continues) and *fatal*
//! (process exits non-zero). This module is the home for the first bucket;
//! [`crate::FatalError`] is the second. A [`Handler`] is created once per
//! [`crate::span::SourceMap`]-owning session and threaded by `&mut` reference
//! through the lexer, parser, and type pass.

mod builder;
mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::*;

use std::fmt;

use crate::Span;

/// Severity of a [`Diagnostic`]. Only `Error` is produced today (every
/// diagnosable condition is a mistake in the input program), but `Warning`
/// exists for forward compatibility and isn't currently emitted by any
/// wispc pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// One reported problem: a severity, a stable code, a human message, and
/// (when available) the source span that triggered it.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.code.name, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}:{})", span.line + 1, span.column + 1)?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// Collects diagnostics for one compiler invocation.
///
/// Every pass gets `&mut Handler` rather than owning one, so that lexer,
/// parser, and type-pass diagnostics all land in the same ordered list and
/// the driver can decide, after the whole pipeline has run, whether any
/// `Error`-level diagnostic should turn into a non-zero exit code.
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic {
            level: Level::Error,
            code,
            message: message.into(),
            span: Some(span),
            help: None,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Prints every collected diagnostic to stderr, one per line, in the
    /// order they were emitted.
    pub fn print_all(&self) {
        for diag in &self.diagnostics {
            eprintln!("{diag}");
        }
    }
}
