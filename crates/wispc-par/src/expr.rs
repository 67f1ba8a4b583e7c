//! The precedence chain, weakest to tightest:
//! `logicalOr > logicalAnd > equality > comparison > term > factor > unary
//! > call > primary`. Each level is one function, calling the next-tighter
//! level for its operands; this grammar is already fully parenthesized by
//! precedence level, so a binding-power table buys nothing a direct
//! recursive descent doesn't already give for free.

use std::cell::Cell;

use wispc_lex::TokenKind;
use wispc_util::diagnostic::E_PARSE_UNEXPECTED_TOKEN;

use crate::ast::{BinaryOp, CompareOp, Expr, LogicalOp, Type, UnaryOp};
use crate::Parser;

impl<'arena, 'a> Parser<'arena, 'a> {
    pub(crate) fn parse_logical_or(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_logical_and();
        while self.current_kind() == TokenKind::Or {
            self.advance();
            let right = self.parse_logical_and();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Logical {
                op: LogicalOp::Or,
                left,
                right,
                span,
                ty: Cell::new(Type::Bool),
            });
        }
        left
    }

    pub(crate) fn parse_logical_and(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_equality();
        while self.current_kind() == TokenKind::And {
            self.advance();
            let right = self.parse_equality();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Logical {
                op: LogicalOp::And,
                left,
                right,
                span,
                ty: Cell::new(Type::Bool),
            });
        }
        left
    }

    pub(crate) fn parse_equality(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_comparison();
        loop {
            let op = match self.current_kind() {
                TokenKind::EqualEqual => CompareOp::Eq,
                TokenKind::BangEqual => CompareOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Comparison { op, left, right, span, ty: Cell::new(Type::Bool) });
        }
        left
    }

    pub(crate) fn parse_comparison(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_term();
        loop {
            let op = match self.current_kind() {
                TokenKind::Less => CompareOp::Lt,
                TokenKind::LessEqual => CompareOp::Le,
                TokenKind::Greater => CompareOp::Gt,
                TokenKind::GreaterEqual => CompareOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_term();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Comparison { op, left, right, span, ty: Cell::new(Type::Bool) });
        }
        left
    }

    pub(crate) fn parse_term(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_factor();
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Binary { op, left, right, span, ty: Cell::new(Type::Void) });
        }
        left
    }

    pub(crate) fn parse_factor(&mut self) -> &'arena Expr<'arena> {
        let mut left = self.parse_unary();
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary();
            let span = left.span().to(right.span());
            left = self.alloc(Expr::Binary { op, left, right, span, ty: Cell::new(Type::Void) });
        }
        left
    }

    pub(crate) fn parse_unary(&mut self) -> &'arena Expr<'arena> {
        let op = match self.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.current_span();
            self.advance();
            let operand = self.parse_unary();
            let span = start.to(operand.span());
            return self.alloc(Expr::Unary { op, operand, span, ty: Cell::new(Type::Void) });
        }
        self.parse_call()
    }

    pub(crate) fn parse_call(&mut self) -> &'arena Expr<'arena> {
        let mut expr = self.parse_primary();
        while self.current_kind() == TokenKind::LeftParen {
            let start = expr.span();
            self.advance();
            let mut args = Vec::new();
            if self.current_kind() != TokenKind::RightParen {
                args.push(self.parse_expression());
                while self.current_kind() == TokenKind::Comma {
                    self.advance();
                    args.push(self.parse_expression());
                }
            }
            let end = self.expect_rparen();
            expr = self.alloc(Expr::Call {
                callee: expr,
                args: self.arena.alloc_slice_copy(&args),
                span: start.to(end),
                ty: Cell::new(Type::Void),
            });
        }
        expr
    }

    pub(crate) fn parse_primary(&mut self) -> &'arena Expr<'arena> {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::True => {
                self.advance();
                self.alloc(Expr::Bool { value: true, span, ty: Cell::new(Type::Bool) })
            }
            TokenKind::False => {
                self.advance();
                self.alloc(Expr::Bool { value: false, span, ty: Cell::new(Type::Bool) })
            }
            TokenKind::Number => {
                let text = self.current_text();
                self.advance();
                if text.contains('.') {
                    let value = text.parse::<f64>().unwrap_or(0.0);
                    self.alloc(Expr::Real64 { value, span, ty: Cell::new(Type::R64) })
                } else {
                    let value = text.parse::<i32>().unwrap_or(0);
                    self.alloc(Expr::Int32 { value, span, ty: Cell::new(Type::I32) })
                }
            }
            TokenKind::String => {
                let sym = self.current_token().text;
                self.advance();
                self.alloc(Expr::Str { value: sym, span, ty: Cell::new(Type::Str) })
            }
            TokenKind::Identifier => {
                let sym = self.current_token().text;
                self.advance();
                self.alloc(Expr::Var { name: sym, span, ty: Cell::new(Type::Void) })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect_rparen();
                inner
            }
            _ => {
                self.error_unexpected_token();
                self.advance();
                self.alloc(Expr::Bool { value: false, span, ty: Cell::new(Type::Void) })
            }
        }
    }

    pub(crate) fn error_unexpected_token(&mut self) {
        let span = self.current_span();
        self.handler.error(
            E_PARSE_UNEXPECTED_TOKEN,
            format!("unexpected token {:?}", self.current_kind()),
            span,
        );
    }
}
