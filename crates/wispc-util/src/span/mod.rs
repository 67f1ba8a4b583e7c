//! Source location tracking.
//!
//! A [`Span`] is a byte range plus the line/column of its start, identified
//! against a [`SourceMap`] by [`FileId`]. Every [`crate::Diagnostic`] carries
//! one, so the offending token's line and column are available whenever a
//! diagnostic is printed.

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies one loaded source file. wispc only ever compiles a single file
/// per invocation, but the id still disambiguates spans produced during
/// tests that load more than one source into the same `SourceMap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub const DUMMY: FileId = FileId(0);
}

/// A byte range in source text, with the 0-based line/column of its start
/// already resolved by the lexer (column resets on `\n`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(file: FileId, start: u32, end: u32, line: u32, column: u32) -> Self {
        Self { file, start, end, line, column }
    }

    /// A placeholder span for synthetic nodes that don't come from source
    /// text (e.g. an implicit `Void` result). Never shown to the user as a
    /// real location.
    pub const DUMMY: Span = Span { file: FileId::DUMMY, start: 0, end: 0, line: 0, column: 0 };

    /// Smallest span covering both `self` and `other`. Used when a
    /// multi-token construct (a block, a call) wants to report a span
    /// covering its whole extent rather than just its first token.
    pub fn to(self, other: Span) -> Span {
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line,
            column: self.column,
        }
    }
}
