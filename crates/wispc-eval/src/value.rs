//! Runtime values produced by the evaluator.

use std::fmt;

use wispc_par::ast::Expr;
use wispc_util::{Interner, Symbol};

use crate::env::Env;

/// A tagged runtime value. `FuncValue` pairs the `Func` AST node with the
/// environment captured at the point the function literal was evaluated,
/// giving closures over enclosing bindings.
#[derive(Clone)]
pub enum Value<'a> {
    Bool(bool),
    Int32(i32),
    Real64(f64),
    Str(Symbol),
    FuncValue { expr: &'a Expr<'a>, closure_env: Env<'a> },
    Void,
}

impl<'a> Value<'a> {
    /// Renders this value the way `println` does: booleans as `0`/`1`,
    /// reals with a fixed six-digit formatter matching the IR emitter's
    /// `%f` so the evaluator and the compiled IR print byte-identical
    /// output, strings verbatim, functions as the literal token `function`.
    pub fn display(&self, interner: &Interner) -> String {
        match self {
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int32(i) => i.to_string(),
            Value::Real64(r) => format!("{r:.6}"),
            Value::Str(s) => interner.resolve(*s).to_string(),
            Value::FuncValue { .. } => "function".to_string(),
            Value::Void => String::new(),
        }
    }
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int32(i) => write!(f, "Int32({i})"),
            Value::Real64(r) => write!(f, "Real64({r})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::FuncValue { .. } => write!(f, "FuncValue"),
            Value::Void => write!(f, "Void"),
        }
    }
}
