//! Lexical environment for the type pass.
//!
//! A parent-chain of ribs mapping `Symbol -> &'a Expr<'a>` rather than to a
//! type: a declaration binds a name to an *expression*, and `check_call`
//! needs the bound expression itself (not just its type) to find the
//! `Func` node to specialize at a call site.

use wispc_par::ast::Expr;
use wispc_util::{FxHashMap, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RibId(u32);

struct Rib<'a> {
    bindings: FxHashMap<Symbol, &'a Expr<'a>>,
    parent: Option<RibId>,
}

/// Parent-chain scope stack. The root rib is the top-level program scope;
/// `enter_scope`/`exit_scope` bracket a function call's parameter scope, a
/// fresh environment extended with that call's parameter bindings.
pub struct ScopeTree<'a> {
    ribs: Vec<Rib<'a>>,
    current: RibId,
}

impl<'a> ScopeTree<'a> {
    pub fn new() -> Self {
        Self { ribs: vec![Rib { bindings: FxHashMap::default(), parent: None }], current: RibId(0) }
    }

    pub fn enter_scope(&mut self) {
        let parent = self.current;
        self.ribs.push(Rib { bindings: FxHashMap::default(), parent: Some(parent) });
        self.current = RibId((self.ribs.len() - 1) as u32);
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.ribs[self.current.0 as usize].parent {
            self.current = parent;
        }
    }

    /// Binds `name` in the *current* rib, overwriting any existing binding
    /// there (reassignment semantics). Returns `true` if this shadowed an
    /// existing binding in the same rib (used to diagnose duplicate
    /// declarations).
    pub fn bind(&mut self, name: Symbol, expr: &'a Expr<'a>) -> bool {
        self.ribs[self.current.0 as usize].bindings.insert(name, expr).is_some()
    }

    pub fn resolve(&self, name: Symbol) -> Option<&'a Expr<'a>> {
        let mut rib_id = self.current;
        loop {
            let rib = &self.ribs[rib_id.0 as usize];
            if let Some(expr) = rib.bindings.get(&name) {
                return Some(*expr);
            }
            rib_id = rib.parent?;
        }
    }
}

impl<'a> Default for ScopeTree<'a> {
    fn default() -> Self {
        Self::new()
    }
}
