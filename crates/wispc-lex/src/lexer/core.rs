//! The ordered-dispatch loop.
//!
//! Each iteration tries, in order: (1) line comment, (2) multi-char symbol,
//! (3) single-char symbol, (4) keyword, (5) number, (6) string, (7)
//! identifier. A byte matching none of these is unmatched and is silently
//! skipped — see DESIGN.md for why this is looser than a typical lexer's
//! "unknown byte" handling.

use wispc_util::{FatalError, FileId, Handler, Interner, Span};

use super::{comment, identifier, number, operator, string};
use crate::cursor::{is_digit, is_ident_start, is_whitespace};
use crate::{Cursor, Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file: FileId,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId) -> Self {
        Self { cursor: Cursor::new(source), file }
    }

    /// Tokenizes the whole source, appending a trailing `EndOfFile` token.
    /// Returns `Err` only on [`FatalError`] (an unterminated string);
    /// anything else diagnosable is pushed to `handler` and lexing
    /// continues.
    pub fn tokenize(
        mut self,
        interner: &mut Interner,
        handler: &mut Handler,
    ) -> Result<Vec<Token>, FatalError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if comment::try_consume(&mut self.cursor) {
                continue;
            }
            if self.cursor.is_at_end() {
                let span = self.point_span();
                tokens.push(Token::new(TokenKind::EndOfFile, interner.intern(""), span));
                return Ok(tokens);
            }

            let start_pos = self.cursor.pos();
            let start_line = self.cursor.line();
            let start_col = self.cursor.column();

            if let Some(kind) = operator::try_multi(&mut self.cursor) {
                let span = self.span_from(start_pos, start_line, start_col);
                let text = self.cursor.slice(start_pos, self.cursor.pos());
                tokens.push(Token::new(kind, interner.intern(text), span));
                continue;
            }

            if let Some(kind) = operator::try_single(&mut self.cursor) {
                let span = self.span_from(start_pos, start_line, start_col);
                let text = self.cursor.slice(start_pos, self.cursor.pos());
                tokens.push(Token::new(kind, interner.intern(text), span));
                continue;
            }

            if let Some((kind, len)) = identifier::try_keyword(&self.cursor) {
                for _ in 0..len {
                    self.cursor.bump();
                }
                let span = self.span_from(start_pos, start_line, start_col);
                let text = self.cursor.slice(start_pos, self.cursor.pos());
                tokens.push(Token::new(kind, interner.intern(text), span));
                continue;
            }

            let b = self.cursor.peek();

            if is_digit(b) {
                let scanned = number::scan(&mut self.cursor, handler, self.file);
                let span = self.span_from(start_pos, start_line, start_col);
                tokens.push(Token::new(TokenKind::Number, interner.intern(&scanned.text), span));
                continue;
            }

            if b == b'"' {
                let text = string::scan(&mut self.cursor, self.file)?;
                let span = self.span_from(start_pos, start_line, start_col);
                tokens.push(Token::new(TokenKind::String, interner.intern(&text), span));
                continue;
            }

            if is_ident_start(b) {
                identifier::scan(&mut self.cursor);
                let span = self.span_from(start_pos, start_line, start_col);
                let text = self.cursor.slice(start_pos, self.cursor.pos());
                tokens.push(Token::new(TokenKind::Identifier, interner.intern(text), span));
                continue;
            }

            // Unmatched byte: advance and try again.
            self.cursor.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.cursor.is_at_end() && is_whitespace(self.cursor.peek()) {
            self.cursor.bump();
        }
    }

    fn span_from(&self, start: u32, line: u32, column: u32) -> Span {
        Span::new(self.file, start, self.cursor.pos(), line, column)
    }

    fn point_span(&self) -> Span {
        Span::new(self.file, self.cursor.pos(), self.cursor.pos(), self.cursor.line(), self.cursor.column())
    }
}
