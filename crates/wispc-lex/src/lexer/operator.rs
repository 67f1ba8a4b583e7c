//! Multi-char symbols, then single-char symbols.

use crate::{Cursor, TokenKind};

/// Multi-char symbols, checked in the disambiguating order
/// `!=, ==, >=, <=, :=, ->`. (`//` is handled earlier, by
/// [`super::comment::try_consume`] — it never reaches here.)
const MULTI: &[(&str, TokenKind)] = &[
    ("!=", TokenKind::BangEqual),
    ("==", TokenKind::EqualEqual),
    (">=", TokenKind::GreaterEqual),
    ("<=", TokenKind::LessEqual),
    (":=", TokenKind::ColonEqual),
    ("->", TokenKind::MinusGreater),
];

const SINGLE: &[(u8, TokenKind)] = &[
    (b'(', TokenKind::LeftParen),
    (b')', TokenKind::RightParen),
    (b'{', TokenKind::LeftBrace),
    (b'}', TokenKind::RightBrace),
    (b',', TokenKind::Comma),
    (b'.', TokenKind::Dot),
    (b'*', TokenKind::Star),
    (b'+', TokenKind::Plus),
    (b'-', TokenKind::Minus),
    (b'/', TokenKind::Slash),
    (b'!', TokenKind::Bang),
    (b'=', TokenKind::Equal),
    (b'>', TokenKind::Greater),
    (b'<', TokenKind::Less),
    (b':', TokenKind::Colon),
];

pub fn try_multi(cursor: &mut Cursor) -> Option<TokenKind> {
    for (text, kind) in MULTI {
        if cursor.starts_with(text) {
            for _ in 0..text.len() {
                cursor.bump();
            }
            return Some(*kind);
        }
    }
    None
}

pub fn try_single(cursor: &mut Cursor) -> Option<TokenKind> {
    let b = cursor.peek();
    for (byte, kind) in SINGLE {
        if b == *byte {
            cursor.bump();
            return Some(*kind);
        }
    }
    None
}
