//! Indentation-structured blocks.
//!
//! Blocks here are indentation-delimited rather than brace-delimited: a
//! block is every expression sharing the column of the first expression
//! after the opening construct (`->`, `if`, `else`), ending at the first
//! expression indented less than that anchor.

use std::cell::Cell;

use wispc_lex::TokenKind;

use crate::ast::{Expr, Type};
use crate::Parser;

impl<'arena, 'a> Parser<'arena, 'a> {
    pub(crate) fn parse_block(&mut self) -> &'arena Expr<'arena> {
        let span = self.current_span();
        if self.is_at_end() || self.current_kind() == TokenKind::EndOfFile {
            return self.alloc(Expr::Block { exprs: &[], span, ty: Cell::new(Type::Void) });
        }

        let anchor = self.current_column();
        let mut exprs = Vec::new();
        loop {
            exprs.push(self.parse_expression());
            if self.is_at_end()
                || self.current_kind() == TokenKind::EndOfFile
                || self.current_column() < anchor
            {
                break;
            }
        }

        let end_span = exprs.last().map(|e| e.span()).unwrap_or(span);
        self.alloc(Expr::Block {
            exprs: self.arena.alloc_slice_copy(&exprs),
            span: span.to(end_span),
            ty: Cell::new(Type::Void),
        })
    }

    pub(crate) fn current_column(&self) -> u32 {
        self.current_span().column
    }
}
