//! Tokenizes wisp source text into a flat [`Token`] stream.
//!
//! A byte [`cursor::Cursor`] feeds an ordered-dispatch [`lexer`] that never
//! backtracks across handlers. There is no significant-whitespace handling
//! here beyond skipping it — indentation is a parser concern
//! (`wispc-par::block`), not a lexer one.

mod cursor;
pub mod lexer;

pub use cursor::Cursor;
pub use lexer::Lexer;

use wispc_util::{Span, Symbol};

/// One token of the language's ASCII grapheme set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    EndOfFile,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Star,
    Plus,
    Minus,
    Slash,
    SlashSlash,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Colon,
    ColonEqual,
    MinusGreater,

    Identifier,
    String,
    Number,

    True,
    False,
    And,
    Or,
    Is,
    As,
    Of,
    For,
    While,
    If,
    Else,
    Ret,
}

/// A lexed token: its kind, its source span, and its literal text as an
/// interned [`Symbol`] (identifiers, string bodies and number literals all
/// need their text later; interning it uniformly keeps `Token` one shape
/// instead of a kind-dependent union).
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Symbol,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: Symbol, span: Span) -> Self {
        Self { kind, text, span }
    }
}
