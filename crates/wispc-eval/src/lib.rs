//! wispc-eval - tree-walking evaluator
//!
//! The environment ([`env::Env`]) is a parent-chain of
//! `Rc<RefCell<...>>` scopes, letting closures share a captured environment
//! cheaply. The walker itself follows the same recursive per-variant
//! `match` shape `wispc-sem::TypeChecker` already uses for its own single
//! AST traversal.

pub mod env;
pub mod value;

use std::io::Write;

use wispc_par::ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use wispc_util::diagnostic::{E_EVAL_NOT_CALLABLE, E_EVAL_TYPE_MISMATCH, E_EVAL_UNDEFINED_VAR};
use wispc_util::{Handler, Interner};

use env::Env;
use value::Value;

pub struct Evaluator<'a, 'h> {
    env: Env<'a>,
    handler: &'h mut Handler,
    interner: &'a Interner,
    out: &'h mut dyn Write,
}

impl<'a, 'h> Evaluator<'a, 'h> {
    pub fn new(handler: &'h mut Handler, interner: &'a Interner, out: &'h mut dyn Write) -> Self {
        Self { env: Env::new(), handler, interner, out }
    }

    /// Evaluates every top-level expression in textual order, discarding
    /// each result but the last.
    pub fn run(&mut self, program: &[&'a Expr<'a>]) -> Value<'a> {
        let mut last = Value::Void;
        for expr in program {
            last = self.eval(expr);
        }
        last
    }

    pub fn eval(&mut self, expr: &'a Expr<'a>) -> Value<'a> {
        match expr {
            Expr::Bool { value, .. } => Value::Bool(*value),
            Expr::Int32 { value, .. } => Value::Int32(*value),
            Expr::Real64 { value, .. } => Value::Real64(*value),
            Expr::Str { value, .. } => Value::Str(*value),

            Expr::Var { name, span, .. } => match self.env.get(*name) {
                Some(v) => v,
                None => {
                    self.handler.error(E_EVAL_UNDEFINED_VAR, "undefined variable", *span);
                    Value::Void
                }
            },

            Expr::NewVar { name, init, .. } => {
                let v = self.eval(init);
                self.env.define(*name, v.clone());
                v
            }

            Expr::VarAssign { name, value, span, .. } => {
                let v = self.eval(value);
                if !self.env.set(*name, v.clone()) {
                    self.handler.error(
                        E_EVAL_UNDEFINED_VAR,
                        "assignment to undeclared variable",
                        *span,
                    );
                }
                v
            }

            Expr::Unary { op, operand, span, .. } => self.eval_unary(*op, operand, *span),

            Expr::Binary { op, left, right, span, .. } => self.eval_binary(*op, left, right, *span),

            Expr::Comparison { op, left, right, span, .. } => {
                self.eval_comparison(*op, left, right, *span)
            }

            Expr::Logical { op, left, right, span, .. } => {
                self.eval_logical(*op, left, right, *span)
            }

            Expr::IfElse { cond, then_block, else_block, span, .. } => {
                match self.eval(cond) {
                    Value::Bool(true) => self.eval(then_block),
                    Value::Bool(false) => match else_block {
                        Some(e) => self.eval(e),
                        None => Value::Void,
                    },
                    _ => {
                        self.handler.error(
                            E_EVAL_TYPE_MISMATCH,
                            "if condition is not a bool",
                            *span,
                        );
                        Value::Void
                    }
                }
            }

            Expr::Block { exprs, .. } => {
                let mut last = Value::Void;
                for e in *exprs {
                    last = self.eval(e);
                }
                last
            }

            Expr::Func { .. } => Value::FuncValue { expr, closure_env: self.env.clone() },

            Expr::Call { callee, args, span, .. } => self.eval_call(callee, args, *span),

            Expr::Println { values, .. } => self.eval_println(values),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &'a Expr<'a>, span: wispc_util::Span) -> Value<'a> {
        let v = self.eval(operand);
        match (op, &v) {
            (UnaryOp::Plus, Value::Int32(_) | Value::Real64(_)) => v,
            (UnaryOp::Minus, Value::Int32(i)) => Value::Int32(-i),
            (UnaryOp::Minus, Value::Real64(r)) => Value::Real64(-r),
            (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
            _ => {
                self.handler.error(E_EVAL_TYPE_MISMATCH, "operator applied to wrong type", span);
                Value::Void
            }
        }
    }

    /// Mixed `I32`/`R64` lifts `I32` to `R64`; same-type operations stay in
    /// type. Integer division truncates toward zero; real division is IEEE
    /// (Rust's `/` already gives both for free).
    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: wispc_util::Span,
    ) -> Value<'a> {
        let lv = self.eval(left);
        let rv = self.eval(right);
        match (lv, rv) {
            (Value::Int32(l), Value::Int32(r)) => match op {
                BinaryOp::Add => Value::Int32(l.wrapping_add(r)),
                BinaryOp::Sub => Value::Int32(l.wrapping_sub(r)),
                BinaryOp::Mul => Value::Int32(l.wrapping_mul(r)),
                // Integer division by zero has no result in this language;
                // evaluate to `Void` rather than panicking.
                BinaryOp::Div => {
                    if r == 0 {
                        Value::Void
                    } else {
                        Value::Int32(l / r)
                    }
                }
            },
            (l, r) => match (as_f64(&l), as_f64(&r)) {
                (Some(l), Some(r)) => Value::Real64(match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                }),
                _ => {
                    self.handler.error(
                        E_EVAL_TYPE_MISMATCH,
                        "arithmetic operator applied to non-numeric operand",
                        span,
                    );
                    Value::Void
                }
            },
        }
    }

    fn eval_comparison(
        &mut self,
        op: CompareOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: wispc_util::Span,
    ) -> Value<'a> {
        let lv = self.eval(left);
        let rv = self.eval(right);
        if let (Some(l), Some(r)) = (as_f64(&lv), as_f64(&rv)) {
            return Value::Bool(match op {
                CompareOp::Eq => l == r,
                CompareOp::Ne => l != r,
                CompareOp::Lt => l < r,
                CompareOp::Le => l <= r,
                CompareOp::Gt => l > r,
                CompareOp::Ge => l >= r,
            });
        }
        match (op, &lv, &rv) {
            (CompareOp::Eq, Value::Bool(l), Value::Bool(r)) => Value::Bool(l == r),
            (CompareOp::Ne, Value::Bool(l), Value::Bool(r)) => Value::Bool(l != r),
            (CompareOp::Eq, Value::Str(l), Value::Str(r)) => Value::Bool(l == r),
            (CompareOp::Ne, Value::Str(l), Value::Str(r)) => Value::Bool(l != r),
            _ => {
                self.handler.error(
                    E_EVAL_TYPE_MISMATCH,
                    "comparison operator applied to incompatible types",
                    span,
                );
                Value::Void
            }
        }
    }

    /// `and`/`or` short-circuit: the right operand is evaluated only when
    /// the left doesn't already determine the result.
    fn eval_logical(
        &mut self,
        op: LogicalOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
        span: wispc_util::Span,
    ) -> Value<'a> {
        let lv = self.eval(left);
        let Value::Bool(l) = lv else {
            self.handler.error(E_EVAL_TYPE_MISMATCH, "logical operand is not a bool", span);
            return Value::Void;
        };
        match (op, l) {
            (LogicalOp::Or, true) => Value::Bool(true),
            (LogicalOp::And, false) => Value::Bool(false),
            _ => match self.eval(right) {
                Value::Bool(r) => Value::Bool(r),
                _ => {
                    self.handler.error(E_EVAL_TYPE_MISMATCH, "logical operand is not a bool", span);
                    Value::Void
                }
            },
        }
    }

    /// Constructs a fresh environment: a child of the closure environment
    /// extended with parameter bindings to the evaluated arguments.
    /// Arguments are evaluated in the *caller's* environment, before the
    /// callee's environment is entered.
    fn eval_call(&mut self, callee: &'a Expr<'a>, args: &'a [&'a Expr<'a>], span: wispc_util::Span) -> Value<'a> {
        let callee_v = self.eval(callee);
        let arg_values: Vec<Value<'a>> = args.iter().map(|a| self.eval(a)).collect();

        let Value::FuncValue { expr: func_expr, closure_env } = callee_v else {
            self.handler.error(E_EVAL_NOT_CALLABLE, "called value is not a function", span);
            return Value::Void;
        };
        let Expr::Func { params, body, .. } = func_expr else {
            unreachable!("FuncValue always wraps a Func node");
        };

        let call_env = Env::child_of(&closure_env);
        for (param, arg) in params.iter().zip(arg_values.into_iter()) {
            call_env.define(*param, arg);
        }

        let saved = std::mem::replace(&mut self.env, call_env);
        let result = self.eval(body);
        self.env = saved;
        result
    }

    /// Prints one line, comma-separated. Returns the byte count written
    /// (including the trailing newline), mirroring the underlying C
    /// `printf`'s return value.
    fn eval_println(&mut self, values: &'a [&'a Expr<'a>]) -> Value<'a> {
        let rendered: Vec<Value<'a>> = values.iter().map(|v| self.eval(v)).collect();
        let line = rendered
            .iter()
            .map(|v| v.display(self.interner))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(self.out, "{line}");
        Value::Int32((line.len() + 1) as i32)
    }
}

fn as_f64(v: &Value<'_>) -> Option<f64> {
    match v {
        Value::Int32(i) => Some(*i as f64),
        Value::Real64(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use wispc_lex::Lexer;
    use wispc_sem::TypeChecker;
    use wispc_util::{FileId, Handler, Interner};

    use super::Evaluator;

    fn run(source: &str) -> (String, Handler) {
        let arena = Bump::new();
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(source, FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .expect("no fatal error");
        let ast = wispc_par::Parser::new(tokens, &mut handler, &interner, &arena).parse();
        TypeChecker::new(&mut handler).check_program(&ast);

        let mut out = Vec::new();
        {
            let mut evaluator = Evaluator::new(&mut handler, &interner, &mut out);
            evaluator.run(&ast);
        }
        (String::from_utf8(out).unwrap(), handler)
    }

    #[test]
    fn arithmetic_precedence() {
        let (out, handler) = run("println 1 + 2 * 3");
        assert_eq!(out, "7\n");
        assert!(!handler.has_errors());
    }

    #[test]
    fn declaration_reassignment_mixed_arithmetic() {
        let (out, _) = run("a := 1 + 2 * 3\nprintln a\na = (a - 1) * (a + 1)\nprintln a");
        assert_eq!(out, "7\n48\n");
    }

    #[test]
    fn and_short_circuits_without_dividing_by_zero() {
        let (out, handler) = run("println (1 == 2) and (1/0 == 0)");
        assert_eq!(out, "0\n");
        assert!(!handler.has_errors(), "right operand must not be evaluated");
    }

    #[test]
    fn if_else_with_real_promotion() {
        let (out, _) = run("x := 2\nif x > 1\n    println 3.5\nelse\n    println 0");
        assert_eq!(out, "3.500000\n");
    }

    #[test]
    fn first_class_function_and_call() {
        let (out, _) =
            run("add := a, b -> a + b\nprintln add(2, 3)\nprintln add(2.5, 3)");
        assert_eq!(out, "5\n5.500000\n");
    }

    #[test]
    fn indentation_delimited_block_function_body() {
        let (out, _) = run("f := x ->\n    y := x * 2\n    y + 1\nprintln f(4)");
        assert_eq!(out, "9\n");
    }

    #[test]
    fn undefined_variable_is_diagnosed_and_evaluates_to_void() {
        let (out, handler) = run("println x");
        assert_eq!(out, "\n");
        assert!(handler.has_errors());
    }

    #[test]
    fn calling_a_non_function_is_diagnosed() {
        let (_, handler) = run("a := 1\nprintln a(2)");
        assert!(handler.has_errors());
    }
}
