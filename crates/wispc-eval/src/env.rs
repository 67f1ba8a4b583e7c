//! Evaluator environment.
//!
//! A parent-chain `Rc<RefCell<...>>` environment mapping `Symbol -> Value`.
//! A call constructs a fresh environment: a child rib whose parent is the
//! closure environment, giving the same lookup behavior as a shallow copy
//! while costing one allocation instead of cloning every binding already
//! visible in the closure.

use std::cell::RefCell;
use std::rc::Rc;

use wispc_util::{FxHashMap, Symbol};

use crate::value::Value;

struct EnvInner<'a> {
    bindings: RefCell<FxHashMap<Symbol, Value<'a>>>,
    parent: Option<Env<'a>>,
}

/// A reference-counted environment handle. Cheap to clone: closures capture
/// an `Env` by `Rc::clone`, not by deep-copying bindings.
#[derive(Clone)]
pub struct Env<'a>(Rc<EnvInner<'a>>);

impl<'a> Env<'a> {
    pub fn new() -> Self {
        Env(Rc::new(EnvInner { bindings: RefCell::new(FxHashMap::default()), parent: None }))
    }

    pub fn child_of(parent: &Env<'a>) -> Self {
        Env(Rc::new(EnvInner {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(parent.clone()),
        }))
    }

    /// Binds `name` in this rib, overwriting any existing binding here.
    pub fn define(&self, name: Symbol, value: Value<'a>) {
        self.0.bindings.borrow_mut().insert(name, value);
    }

    pub fn get(&self, name: Symbol) -> Option<Value<'a>> {
        if let Some(value) = self.0.bindings.borrow().get(&name) {
            return Some(value.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Updates an existing binding, walking the parent chain to find where
    /// `name` lives. Returns `false` if `name` is bound nowhere in the
    /// chain, so the caller can diagnose an assignment to an undeclared
    /// name.
    pub fn set(&self, name: Symbol, value: Value<'a>) -> bool {
        if self.0.bindings.borrow().contains_key(&name) {
            self.0.bindings.borrow_mut().insert(name, value);
            return true;
        }
        match &self.0.parent {
            Some(parent) => parent.set(name, value),
            None => false,
        }
    }
}

impl<'a> Default for Env<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym() -> Symbol {
        // Symbol's fields are private, so tests go through a real Interner
        // instead of constructing one directly.
        wispc_util::Interner::new().intern("x")
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Env::new();
        let name = sym();
        parent.define(name, Value::Int32(1));
        let child = Env::child_of(&parent);
        assert!(matches!(child.get(name), Some(Value::Int32(1))));
    }

    #[test]
    fn child_binding_shadows_parent() {
        let parent = Env::new();
        let name = sym();
        parent.define(name, Value::Int32(1));
        let child = Env::child_of(&parent);
        child.define(name, Value::Int32(2));
        assert!(matches!(child.get(name), Some(Value::Int32(2))));
        assert!(matches!(parent.get(name), Some(Value::Int32(1))));
    }

    #[test]
    fn set_writes_through_to_defining_scope() {
        let parent = Env::new();
        let name = sym();
        parent.define(name, Value::Int32(1));
        let child = Env::child_of(&parent);
        assert!(child.set(name, Value::Int32(9)));
        assert!(matches!(parent.get(name), Some(Value::Int32(9))));
    }

    #[test]
    fn set_on_undeclared_name_fails() {
        let env = Env::new();
        assert!(!env.set(sym(), Value::Int32(1)));
    }
}
