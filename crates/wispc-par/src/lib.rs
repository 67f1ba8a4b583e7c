//! wispc-par - Recursive-descent parser for the wisp language
//!
//! Turns a [`Token`] stream into an [`ast::Ast`] allocated from a
//! [`bumpalo::Bump`] arena owned by the caller for the lifetime of the
//! whole pipeline. Two-token lookahead (`current`, `peek`) is enough for
//! every production except the function-head test, which scans ahead to
//! the matching `->` without consuming.

pub mod ast;
mod block;
mod expr;
#[cfg(test)]
mod edge_cases;

use std::cell::{Cell, RefCell};

use bumpalo::Bump;
use wispc_lex::{Token, TokenKind};
use wispc_util::diagnostic::{E_PARSE_MISSING_RPAREN, E_PARSE_UNEXPECTED_TOKEN};
use wispc_util::{Handler, Interner, Span, Symbol};

use ast::{Ast, Expr, Type};

pub struct Parser<'arena, 'a> {
    tokens: Vec<Token>,
    position: usize,
    handler: &'a mut Handler,
    interner: &'a Interner,
    arena: &'arena Bump,
}

impl<'arena, 'a> Parser<'arena, 'a> {
    pub fn new(
        tokens: Vec<Token>,
        handler: &'a mut Handler,
        interner: &'a Interner,
        arena: &'arena Bump,
    ) -> Self {
        Self { tokens, position: 0, handler, interner, arena }
    }

    /// Parses the whole token stream into the top-level expression
    /// sequence. A syntactically unrecognizable top-level position
    /// advances one token and retries.
    pub fn parse(&mut self) -> Ast<'arena> {
        let mut items = Vec::new();
        while !self.is_at_end() && self.current_kind() != TokenKind::EndOfFile {
            let before = self.position;
            items.push(self.parse_expression());
            if self.position == before {
                // No production consumed a token; force progress.
                self.advance();
            }
        }
        items
    }

    pub(crate) fn alloc(&self, expr: Expr<'arena>) -> &'arena Expr<'arena> {
        self.arena.alloc(expr)
    }

    pub(crate) fn current_token(&self) -> Token {
        self.tokens.get(self.position).copied().unwrap_or_else(|| {
            self.tokens.last().copied().expect("token stream always has an EndOfFile sentinel")
        })
    }

    pub(crate) fn peek_token(&self, offset: usize) -> Token {
        self.tokens.get(self.position + offset).copied().unwrap_or_else(|| self.current_token())
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current_token().span
    }

    pub(crate) fn current_text(&self) -> &str {
        self.interner.resolve(self.current_token().text)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.current_kind() == TokenKind::EndOfFile
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current_token();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        tok
    }

    /// Consumes a `)` if present; otherwise reports it missing and
    /// continues as though it had been there. Returns the span to use as
    /// the end of whatever was being closed.
    pub(crate) fn expect_rparen(&mut self) -> Span {
        if self.current_kind() == TokenKind::RightParen {
            return self.advance().span;
        }
        let span = self.current_span();
        self.handler.error(E_PARSE_MISSING_RPAREN, "expected ')'", span);
        span
    }

    /// Top-level dispatch for the `expression` production:
    /// `assign | decl | println | func | if | logicalOr`. The function-head
    /// test runs first, since it can otherwise be confused with a bare
    /// identifier or parenthesized group.
    pub(crate) fn parse_expression(&mut self) -> &'arena Expr<'arena> {
        if self.is_function_head() {
            return self.parse_func();
        }
        if self.current_kind() == TokenKind::Identifier
            && self.peek_token(1).kind == TokenKind::Equal
        {
            return self.parse_assign();
        }
        if self.current_kind() == TokenKind::Identifier
            && self.peek_token(1).kind == TokenKind::ColonEqual
        {
            return self.parse_decl();
        }
        if self.current_kind() == TokenKind::Identifier && self.current_text() == "println" {
            return self.parse_println();
        }
        if self.current_kind() == TokenKind::If {
            return self.parse_if();
        }
        self.parse_logical_or()
    }

    fn parse_assign(&mut self) -> &'arena Expr<'arena> {
        let start = self.current_span();
        let name = self.advance().text;
        self.advance(); // '='
        let value = self.parse_expression();
        let span = start.to(value.span());
        self.alloc(Expr::VarAssign { name, value, span, ty: Cell::new(Type::Void) })
    }

    fn parse_decl(&mut self) -> &'arena Expr<'arena> {
        let start = self.current_span();
        let name = self.advance().text;
        self.advance(); // ':='
        let init = self.parse_expression();
        let span = start.to(init.span());
        self.alloc(Expr::NewVar { name, init, span, ty: Cell::new(Type::Void) })
    }

    fn parse_if(&mut self) -> &'arena Expr<'arena> {
        let start = self.current_span();
        self.advance(); // 'if'
        let cond = self.parse_expression();
        let then_block = self.parse_block();
        let else_block = if self.current_kind() == TokenKind::Else {
            self.advance();
            Some(self.parse_block())
        } else {
            None
        };
        let end = else_block.map(|b| b.span()).unwrap_or_else(|| then_block.span());
        self.alloc(Expr::IfElse {
            cond,
            then_block,
            else_block,
            span: start.to(end),
            ty: Cell::new(Type::Void),
        })
    }

    fn parse_println(&mut self) -> &'arena Expr<'arena> {
        let start = self.current_span();
        self.advance(); // 'println'

        let wrapped =
            self.current_kind() == TokenKind::LeftParen && self.parenthesized_args_follow();

        let mut values = Vec::new();
        if wrapped {
            self.advance(); // '('
            if self.current_kind() != TokenKind::RightParen {
                values.push(self.parse_expression());
                while self.current_kind() == TokenKind::Comma {
                    self.advance();
                    values.push(self.parse_expression());
                }
            }
            self.expect_rparen();
        } else {
            values.push(self.parse_expression());
            while self.current_kind() == TokenKind::Comma {
                self.advance();
                values.push(self.parse_expression());
            }
        }

        let end = values.last().map(|e| e.span()).unwrap_or(start);
        self.alloc(Expr::Println {
            values: self.arena.alloc_slice_copy(&values),
            span: start.to(end),
            ty: Cell::new(Type::I32),
        })
    }

    /// Distinguishes `println(a, b)` (a parenthesized, comma-separated
    /// argument list) from `println (a == b) and c` (a bare argument that
    /// merely happens to start with a parenthesized primary). Scans to the
    /// matching `)` without parsing, then checks whether the following
    /// token could continue an expression — if it can, the `(` we saw
    /// belongs to an inner primary, not to println's own argument list.
    fn parenthesized_args_follow(&self) -> bool {
        debug_assert_eq!(self.current_kind(), TokenKind::LeftParen);
        let mut depth = 0i32;
        let mut idx = self.position;
        loop {
            let kind = self.tokens.get(idx).map(|t| t.kind).unwrap_or(TokenKind::EndOfFile);
            match kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::EndOfFile => return true,
                _ => {}
            }
            idx += 1;
        }
        let after = self.tokens.get(idx + 1).map(|t| t.kind).unwrap_or(TokenKind::EndOfFile);
        !is_continuation_operator(after)
    }

    /// Tests whether the upcoming tokens form a function parameter list
    /// terminated by `->`. Tolerates an optional enclosing `(...)` and
    /// allows zero parameters.
    fn is_function_head(&self) -> bool {
        let mut idx = self.position;
        let kind_at = |i: usize| self.tokens.get(i).map(|t| t.kind).unwrap_or(TokenKind::EndOfFile);

        let has_paren = kind_at(idx) == TokenKind::LeftParen;
        if has_paren {
            idx += 1;
        }

        if kind_at(idx) == TokenKind::Identifier {
            idx += 1;
            while kind_at(idx) == TokenKind::Comma {
                idx += 1;
                if kind_at(idx) != TokenKind::Identifier {
                    return false;
                }
                idx += 1;
            }
        }

        if has_paren {
            if kind_at(idx) != TokenKind::RightParen {
                return false;
            }
            idx += 1;
        }

        kind_at(idx) == TokenKind::MinusGreater
    }

    fn parse_func(&mut self) -> &'arena Expr<'arena> {
        let start = self.current_span();
        let has_paren = self.current_kind() == TokenKind::LeftParen;
        if has_paren {
            self.advance();
        }

        let mut params: Vec<Symbol> = Vec::new();
        if self.current_kind() == TokenKind::Identifier {
            params.push(self.advance().text);
            while self.current_kind() == TokenKind::Comma {
                self.advance();
                if self.current_kind() == TokenKind::Identifier {
                    params.push(self.advance().text);
                } else {
                    self.error_unexpected_token();
                    break;
                }
            }
        }

        if has_paren {
            self.expect_rparen();
        }

        if self.current_kind() == TokenKind::MinusGreater {
            self.advance();
        } else {
            self.error_unexpected_token();
        }

        let body = self.parse_block();
        let span = start.to(body.span());
        self.alloc(Expr::Func {
            params: self.arena.alloc_slice_copy(&params),
            body,
            span,
            ty: Cell::new(Type::Func),
            param_types: RefCell::new(Vec::new()),
            ret_type: Cell::new(Type::Void),
            specialized: Cell::new(false),
        })
    }
}

fn is_continuation_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::LeftParen
    )
}
