//! wispc-util - shared foundation for the wispc pipeline
//!
//! Every other `wispc-*` crate depends on this one for three things that cut
//! across every pass: interned identifiers ([`Symbol`]), source locations
//! ([`span::Span`]), and diagnostic reporting ([`diagnostic::Handler`]). None
//! of these types carry language semantics; they exist so that the lexer,
//! parser, type pass, evaluator, and IR emitter can all point back at "where
//! in the source did this come from" and "what should we tell the user"
//! without duplicating the bookkeeping five times.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use error::FatalError;
pub use span::{FileId, Span};
pub use symbol::{Interner, Symbol};

pub use rustc_hash::{FxHashMap, FxHashSet};
