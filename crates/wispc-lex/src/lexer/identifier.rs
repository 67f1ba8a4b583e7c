//! Keyword handlers, then plain identifiers.
//!
//! Keywords are matched *before* the generic identifier scan, and only when
//! immediately followed by whitespace or end-of-input. This is stricter
//! than the usual "scan the identifier, then look it up in a keyword
//! table" approach: a keyword glued to punctuation — `if(x)`, `true!` —
//! fails the boundary check here and falls through to the identifier scan
//! instead, which tokenizes the same text as a plain `IDENTIFIER`. This is
//! a deliberate, narrow quirk, not an oversight; callers in `wispc-par`
//! write `if x` with a space.
use crate::cursor::{is_ident_continue, is_ident_start, is_whitespace};
use crate::{Cursor, TokenKind};

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("is", TokenKind::Is),
    ("as", TokenKind::As),
    ("of", TokenKind::Of),
    ("for", TokenKind::For),
    ("while", TokenKind::While),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("ret", TokenKind::Ret),
];

/// Tries each keyword in spec order; returns the kind only if the keyword
/// text is followed by whitespace or EOF. Does not consume on failure.
pub fn try_keyword(cursor: &Cursor) -> Option<(TokenKind, usize)> {
    for (word, kind) in KEYWORDS {
        if cursor.starts_with(word) {
            let next = cursor.peek_at(word.len());
            if next == 0 || is_whitespace(next) {
                return Some((*kind, word.len()));
            }
        }
    }
    None
}

/// Scans a maximal identifier: `[a-zA-Z_][a-zA-Z0-9_]*`. Caller has already
/// checked `is_ident_start` on the current byte.
pub fn scan(cursor: &mut Cursor) {
    debug_assert!(is_ident_start(cursor.peek()));
    cursor.bump();
    while is_ident_continue(cursor.peek()) {
        cursor.bump();
    }
}
