//! wispc-sem - the type pass
//!
//! A single pre-order traversal that sets every AST node's `type` slot and
//! populates a lexical symbol environment as it goes, using a parent-chain
//! scope tree ([`scope::ScopeTree`]). The inference itself is direct
//! table-driven typing rather than Hindley-Milner unification — this
//! language has no generics to perform inference over, just a fixed set of
//! per-node typing rules.

pub mod scope;

use wispc_par::ast::{BinaryOp, Expr, Type};
use wispc_util::diagnostic::{
    E_SEM_ARITY_MISMATCH, E_SEM_ASSIGN_UNDECLARED, E_SEM_DUPLICATE_DECL, E_SEM_ELSE_TYPE_MISMATCH,
    E_SEM_UNDEFINED_VAR,
};
use wispc_util::Handler;

use scope::ScopeTree;

pub struct TypeChecker<'a, 'h> {
    scope: ScopeTree<'a>,
    handler: &'h mut Handler,
}

impl<'a, 'h> TypeChecker<'a, 'h> {
    pub fn new(handler: &'h mut Handler) -> Self {
        Self { scope: ScopeTree::new(), handler }
    }

    /// Types every top-level expression in textual order, in the program's
    /// root scope.
    pub fn check_program(&mut self, program: &[&'a Expr<'a>]) {
        for expr in program {
            self.check_expr(expr);
        }
    }

    /// Types one node and every node it contains, returning the node's own
    /// resulting type. Idempotent: calling this twice on an already-typed
    /// AST recomputes the same types, since every rule is a pure function
    /// of already-typed children plus the (stable, by this point)
    /// environment.
    pub fn check_expr(&mut self, expr: &'a Expr<'a>) -> Type {
        let ty = match expr {
            Expr::Bool { .. } => Type::Bool,
            Expr::Int32 { .. } => Type::I32,
            Expr::Real64 { .. } => Type::R64,
            Expr::Str { .. } => Type::Str,

            Expr::Var { name, span, .. } => match self.scope.resolve(*name) {
                Some(bound) => bound.ty(),
                None => {
                    self.handler.error(E_SEM_UNDEFINED_VAR, "undefined variable", *span);
                    Type::Void
                }
            },

            Expr::NewVar { name, init, .. } => {
                let init_ty = self.check_expr(init);
                if self.scope.bind(*name, init) {
                    self.handler.error(
                        E_SEM_DUPLICATE_DECL,
                        "duplicate declaration in this scope",
                        expr.span(),
                    );
                }
                init_ty
            }

            Expr::VarAssign { name, value, span, .. } => {
                let value_ty = self.check_expr(value);
                if self.scope.resolve(*name).is_none() {
                    self.handler.error(
                        E_SEM_ASSIGN_UNDECLARED,
                        "assignment to undeclared variable",
                        *span,
                    );
                } else {
                    self.scope.bind(*name, value);
                }
                value_ty
            }

            Expr::Unary { operand, .. } => self.check_expr(operand),

            Expr::Binary { op, left, right, .. } => {
                let lt = self.check_expr(left);
                let rt = self.check_expr(right);
                binary_result_type(*op, lt, rt)
            }

            Expr::Comparison { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
                Type::Bool
            }

            Expr::Logical { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
                Type::Bool
            }

            Expr::IfElse { cond, then_block, else_block, .. } => {
                self.check_expr(cond);
                let then_ty = self.check_expr(then_block);
                if let Some(else_block) = else_block {
                    let else_ty = self.check_expr(else_block);
                    if else_ty != then_ty {
                        self.handler.error(
                            E_SEM_ELSE_TYPE_MISMATCH,
                            "if/else branches have different types",
                            expr.span(),
                        );
                    }
                }
                then_ty
            }

            Expr::Block { exprs, .. } => {
                let mut last = Type::Void;
                for e in *exprs {
                    last = self.check_expr(e);
                }
                last
            }

            Expr::Func { .. } => Type::Func,

            Expr::Call { callee, args, .. } => self.check_call(callee, args, expr),

            Expr::Println { values, .. } => {
                for v in *values {
                    self.check_expr(v);
                }
                Type::I32
            }
        };
        expr.set_ty(ty);
        ty
    }

    /// Call-site monomorphization: the callee's `Func` node is re-typed
    /// under a fresh scope binding each parameter to its argument
    /// *expression*, but only on the first call. Later calls reuse the
    /// first specialization's `ret_type` even if argument types now
    /// differ — a known, deliberately preserved hazard rather than
    /// generalizing to per-call monomorphization.
    fn check_call(&mut self, callee: &'a Expr<'a>, args: &[&'a Expr<'a>], call: &'a Expr<'a>) -> Type {
        self.check_expr(callee);
        let arg_types: Vec<Type> = args.iter().map(|a| self.check_expr(a)).collect();

        let Some(func) = self.resolve_func_node(callee) else {
            return Type::Void;
        };

        let Expr::Func { params, body, param_types, ret_type, specialized, .. } = func else {
            unreachable!("resolve_func_node only returns Func nodes");
        };

        if params.len() != args.len() {
            self.handler.error(
                E_SEM_ARITY_MISMATCH,
                format!("expected {} argument(s), found {}", params.len(), args.len()),
                call.span(),
            );
            if !specialized.get() {
                return Type::Void;
            }
            return ret_type.get();
        }

        if specialized.get() {
            return ret_type.get();
        }

        self.scope.enter_scope();
        for (param, arg) in params.iter().zip(args.iter()) {
            self.scope.bind(*param, *arg);
        }
        let body_ty = self.check_expr(body);
        self.scope.exit_scope();

        *param_types.borrow_mut() = arg_types;
        ret_type.set(body_ty);
        specialized.set(true);
        body_ty
    }

    /// Follows a callee expression to the `Func` node it denotes: directly,
    /// if the callee is itself a function literal, or through one `Var`
    /// indirection if it names a declared function. Anything else (calling
    /// a non-function value) is left for the evaluator to diagnose at
    /// runtime rather than the type pass.
    fn resolve_func_node(&self, callee: &'a Expr<'a>) -> Option<&'a Expr<'a>> {
        match callee {
            Expr::Func { .. } => Some(callee),
            Expr::Var { name, .. } => match self.scope.resolve(*name) {
                Some(bound @ Expr::Func { .. }) => Some(bound),
                _ => None,
            },
            _ => None,
        }
    }
}

/// `Binary(+,-,*,/)` is `R64` if either operand is `R64`, else `I32`.
fn binary_result_type(_op: BinaryOp, left: Type, right: Type) -> Type {
    if left == Type::R64 || right == Type::R64 {
        Type::R64
    } else {
        Type::I32
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use wispc_lex::Lexer;
    use wispc_util::{FileId, Handler, Interner};

    use super::TypeChecker;
    use wispc_par::ast::Type;
    use wispc_par::Parser;

    fn check<'a>(source: &str, arena: &'a Bump) -> (wispc_par::ast::Ast<'a>, Handler) {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let tokens = Lexer::new(source, FileId::DUMMY)
            .tokenize(&mut interner, &mut handler)
            .expect("no fatal error");
        let ast = Parser::new(tokens, &mut handler, &interner, arena).parse();
        let mut checker = TypeChecker::new(&mut handler);
        checker.check_program(&ast);
        (ast, handler)
    }

    #[test]
    fn mixed_arithmetic_promotes_to_real() {
        let arena = Bump::new();
        let (ast, handler) = check("println 1 + 2.5", &arena);
        match ast[0] {
            wispc_par::ast::Expr::Println { values, .. } => assert_eq!(values[0].ty(), Type::R64),
            other => panic!("expected Println, got {other:?}"),
        }
        assert!(!handler.has_errors());
    }

    #[test]
    fn undefined_variable_is_diagnosed() {
        let arena = Bump::new();
        let (_, handler) = check("println x", &arena);
        assert!(handler.has_errors());
    }

    #[test]
    fn duplicate_declaration_is_diagnosed() {
        let arena = Bump::new();
        let (_, handler) = check("a := 1\na := 2", &arena);
        assert!(handler.has_errors());
    }

    #[test]
    fn assign_to_undeclared_is_diagnosed() {
        let arena = Bump::new();
        let (_, handler) = check("a = 1", &arena);
        assert!(handler.has_errors());
    }

    #[test]
    fn if_else_type_mismatch_is_diagnosed() {
        let arena = Bump::new();
        let (_, handler) = check("if true\n    1\nelse\n    \"s\"", &arena);
        assert!(handler.has_errors());
    }

    #[test]
    fn if_else_matching_types_is_clean() {
        let arena = Bump::new();
        let (_, handler) = check("if true\n    1\nelse\n    2", &arena);
        assert!(!handler.has_errors());
    }

    #[test]
    fn call_specializes_on_first_use() {
        let arena = Bump::new();
        let (_, handler) = check("add := a, b -> a + b\nprintln add(2, 3)", &arena);
        assert!(!handler.has_errors());
    }

    #[test]
    fn call_arity_mismatch_is_diagnosed() {
        let arena = Bump::new();
        let (_, handler) =
            check("add := a, b -> a + b\nprintln add(2, 3)\nprintln add(2)", &arena);
        assert!(handler.has_errors());
    }
}
