// ABOUTME: Environment module — scope frames with parallel binding arrays

use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// The Environment data model (SPEC_FULL.md §3) is specified as ordered parallel
/// arrays rather than a map, because several testable diagnostics (redeclaration,
/// const-violation, type-annotation mismatch) are defined in terms of a frame's
/// own declaration order and own-frame membership, not just name resolution.
struct Bindings {
    names: Vec<String>,
    values: Vec<Value>,
    const_flags: Vec<bool>,
    type_names: Vec<Option<String>>,
}

impl Bindings {
    fn new() -> Self {
        Bindings {
            names: Vec::new(),
            values: Vec::new(),
            const_flags: Vec::new(),
            type_names: Vec::new(),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

pub struct Environment {
    bindings: RefCell<Bindings>,
    pub parent: Option<Rc<Environment>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.bindings.borrow().names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Outcome of a declaration attempt in the current frame.
#[derive(Debug, PartialEq)]
pub enum DeclareError {
    /// The name is already declared in this same frame.
    AlreadyDeclared,
    /// A type annotation was given and it doesn't match the value's inferred type.
    TypeMismatch { expected: String, actual: String },
}

/// Outcome of a plain `=` or compound assignment.
#[derive(Debug, PartialEq)]
pub enum AssignError {
    /// No binding with this name exists in any frame of the parent chain.
    Undeclared,
    /// The binding exists but is marked `const`.
    ConstViolation,
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Bindings::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Bindings::new()),
            parent: Some(parent),
        })
    }

    /// Defines a binding in THIS scope unconditionally, overwriting any existing
    /// binding of the same name. Used for internal bookkeeping (e.g. namespace
    /// re-publication, enum members) where redeclaration diagnostics don't apply.
    pub fn define(&self, name: &str, value: Value) {
        self.define_typed(name, value, false);
    }

    pub fn define_const(&self, name: &str, value: Value) {
        self.define_typed(name, value, true);
    }

    fn define_typed(&self, name: &str, value: Value, is_const: bool) {
        let mut b = self.bindings.borrow_mut();
        if let Some(idx) = b.index_of(name) {
            b.values[idx] = value;
            b.const_flags[idx] = is_const;
            b.type_names[idx] = None;
        } else {
            b.names.push(name.to_string());
            b.values.push(value);
            b.const_flags.push(is_const);
            b.type_names.push(None);
        }
    }

    /// Declares a new binding in THIS frame only, per `&insert`/`const` semantics:
    /// redeclaration in the same frame is rejected, and a type annotation (if
    /// given) must match the value's inferred type name.
    pub fn declare(
        &self,
        name: &str,
        value: Value,
        is_const: bool,
        type_annotation: Option<&str>,
    ) -> Result<(), DeclareError> {
        let mut b = self.bindings.borrow_mut();
        if b.index_of(name).is_some() {
            return Err(DeclareError::AlreadyDeclared);
        }
        if let Some(expected) = type_annotation {
            let actual = value.type_name();
            if expected != actual {
                return Err(DeclareError::TypeMismatch {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        b.names.push(name.to_string());
        b.values.push(value);
        b.const_flags.push(is_const);
        b.type_names.push(type_annotation.map(|s| s.to_string()));
        Ok(())
    }

    /// Looks up a symbol in this scope and parent scopes recursively.
    pub fn get(&self, name: &str) -> Option<Value> {
        let b = self.bindings.borrow();
        if let Some(idx) = b.index_of(name) {
            return Some(b.values[idx].clone());
        }
        drop(b);
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// True if `name` is bound in THIS frame only (not parents).
    pub fn has_own(&self, name: &str) -> bool {
        self.bindings.borrow().index_of(name).is_some()
    }

    /// All bindings owned by this frame, in declaration order, with const flags —
    /// used by namespace re-publication (SPEC_FULL.md §4.3).
    pub fn own_bindings(&self) -> Vec<(String, Value, bool)> {
        let b = self.bindings.borrow();
        b.names
            .iter()
            .cloned()
            .zip(b.values.iter().cloned())
            .zip(b.const_flags.iter().copied())
            .map(|((n, v), c)| (n, v, c))
            .collect()
    }

    /// Updates an existing binding, walking the parent chain. Rejects writes to
    /// `const` slots.
    pub fn set(&self, name: &str, value: Value) -> Result<(), AssignError> {
        {
            let mut b = self.bindings.borrow_mut();
            if let Some(idx) = b.index_of(name) {
                if b.const_flags[idx] {
                    return Err(AssignError::ConstViolation);
                }
                b.values[idx] = value;
                return Ok(());
            }
        }
        match &self.parent {
            Some(p) => p.set(name, value),
            None => Err(AssignError::Undeclared),
        }
    }

    /// Overwrites the type annotation on an existing binding in the current
    /// frame, per `system.annotate` (§4.4). No-op if the name isn't bound here.
    pub fn annotate(&self, name: &str, type_name: &str) {
        let mut b = self.bindings.borrow_mut();
        if let Some(idx) = b.index_of(name) {
            b.type_names[idx] = Some(type_name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0));
        match env.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 42.0),
            _ => panic!("expected Number(42.0)"),
        }
    }

    #[test]
    fn undefined_symbol() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn shadowing() {
        let parent = Environment::new();
        parent.define("x", Value::Number(42.0));
        let child = Environment::with_parent(parent);
        child.define("x", Value::Number(100.0));
        match child.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 100.0),
            _ => panic!("expected Number(100.0)"),
        }
    }

    #[test]
    fn parent_lookup() {
        let parent = Environment::new();
        parent.define("x", Value::Number(42.0));
        let child = Environment::with_parent(parent);
        match child.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 42.0),
            _ => panic!("expected Number(42.0)"),
        }
    }

    #[test]
    fn multiple_levels() {
        let grandparent = Environment::new();
        grandparent.define("a", Value::Number(1.0));
        let parent = Environment::with_parent(grandparent);
        parent.define("b", Value::Number(2.0));
        let child = Environment::with_parent(parent);
        child.define("c", Value::Number(3.0));
        assert!(matches!(child.get("a"), Some(Value::Number(n)) if n == 1.0));
        assert!(matches!(child.get("b"), Some(Value::Number(n)) if n == 2.0));
        assert!(matches!(child.get("c"), Some(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn redeclaration_in_same_frame_rejected_and_keeps_first_value() {
        let env = Environment::new();
        assert!(env.declare("x", Value::Number(1.0), false, None).is_ok());
        let err = env.declare("x", Value::Number(2.0), false, None);
        assert_eq!(err, Err(DeclareError::AlreadyDeclared));
        assert!(matches!(env.get("x"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn type_annotation_mismatch_rejected() {
        let env = Environment::new();
        let err = env.declare("x", Value::Number(1.0), false, Some("string"));
        assert_eq!(
            err,
            Err(DeclareError::TypeMismatch {
                expected: "string".to_string(),
                actual: "number".to_string()
            })
        );
        assert!(env.get("x").is_none());
    }

    #[test]
    fn type_annotation_match_succeeds() {
        let env = Environment::new();
        assert!(env.declare("x", Value::Number(1.0), false, Some("number")).is_ok());
    }

    #[test]
    fn const_violation_on_set() {
        let env = Environment::new();
        env.declare("x", Value::Number(1.0), true, None).unwrap();
        let err = env.set("x", Value::Number(2.0));
        assert_eq!(err, Err(AssignError::ConstViolation));
        assert!(matches!(env.get("x"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn set_walks_parent_chain() {
        let parent = Environment::new();
        parent.declare("x", Value::Number(1.0), false, None).unwrap();
        let child = Environment::with_parent(parent.clone());
        assert!(child.set("x", Value::Number(9.0)).is_ok());
        assert!(matches!(parent.get("x"), Some(Value::Number(n)) if n == 9.0));
    }

    #[test]
    fn set_undeclared_is_error() {
        let env = Environment::new();
        assert_eq!(env.set("nope", Value::Null), Err(AssignError::Undeclared));
    }

    #[test]
    fn own_bindings_preserve_declaration_order() {
        let env = Environment::new();
        env.declare("a", Value::Number(1.0), false, None).unwrap();
        env.declare("b", Value::Number(2.0), true, None).unwrap();
        let owned = env.own_bindings();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].0, "a");
        assert_eq!(owned[1].0, "b");
        assert!(!owned[0].2);
        assert!(owned[1].2);
    }

    #[test]
    fn has_own_does_not_see_parent() {
        let parent = Environment::new();
        parent.define("x", Value::Null);
        let child = Environment::with_parent(parent);
        assert!(!child.has_own("x"));
        child.define("y", Value::Null);
        assert!(child.has_own("y"));
    }
}
