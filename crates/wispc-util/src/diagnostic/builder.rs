use super::{Diagnostic, DiagnosticCode, Level};
use crate::Span;

/// Fluent construction for a [`Diagnostic`] that needs more than a bare
/// message and span (a `help` suggestion, a non-`Error` level). Plain
/// `Handler::error` covers the common case; this exists for the few call
/// sites that want to attach a suggestion (e.g. the missing-`)` recovery in
/// `wispc-par`, which can say what it assumed).
pub struct DiagnosticBuilder {
    level: Level,
    code: DiagnosticCode,
    message: String,
    span: Option<Span>,
    help: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self { level, code, message: message.into(), span: None, help: None }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Level::Error, code, message)
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            code: self.code,
            message: self.message,
            span: self.span,
            help: self.help,
        }
    }
}
