//! Tree-walking evaluator: walks `ast::Node` against an `Environment`,
//! threading non-local control flow through `Flow`/`Result<Flow, Value>`
//! rather than letting `break`/`continue`/`return`/thrown errors live inside
//! `Value` itself.

use crate::ast::{AssignOp, BinOp, DeclKind, Node, UnOp};
use crate::builtins;
use crate::env::{AssignError, DeclareError, Environment};
use crate::error::diagnostic;
use crate::parser;
use crate::value::{ErrorValue, FunctionValue, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// What a statement produced, beyond an ordinary value: a loop-breaking
/// `break`/`continue`, or a function-unwinding `return`. A thrown error is
/// NOT a variant here — it travels as `Err(Value)` alongside this type.
#[derive(Debug, Clone)]
pub enum Flow {
    Value(Value),
    Break,
    Continue,
    Return(Value),
}

/// Owns the two pieces of process-wide mutable state the built-in library
/// needs (calculator memory, command history) plus the global scope. A
/// script's `main()`, if present, is invoked explicitly by the caller.
pub struct Interpreter {
    pub(crate) global: Rc<Environment>,
    pub(crate) memory: RefCell<Rc<Environment>>,
    pub(crate) history: RefCell<Vec<Value>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            global: Environment::new(),
            memory: RefCell::new(Environment::new()),
            history: RefCell::new(Vec::new()),
        }
    }

    /// Parses and evaluates a whole source string at top level (the global
    /// scope itself, not a child frame of it, so top-level declarations
    /// persist across successive `run` calls in a REPL).
    pub fn run(&self, source: &str) -> Result<Value, Value> {
        let ast = parser::parse(source);
        let env = self.global.clone();
        let flow = self.eval_statements_in(&ast, &env)?;
        Ok(self.collapse_top_level(flow))
    }

    /// Looks up a zero-or-more-arg function in the global scope and calls
    /// it; used by the CLI driver to synthesize the `main()` call in script
    /// mode. Returns `Value::Null` if no such function is defined.
    pub fn call_function(&self, name: &str, args: Vec<Value>) -> Result<Value, Value> {
        match self.global.get(name) {
            Some(Value::Function(f)) => self.invoke(&f, &args),
            _ => Ok(Value::Null),
        }
    }

    fn collapse_top_level(&self, flow: Flow) -> Value {
        match flow {
            Flow::Value(v) => v,
            Flow::Return(v) => v,
            Flow::Break | Flow::Continue => {
                diagnostic(0, "break/continue used outside of a loop");
                Value::Null
            }
        }
    }

    /// Evaluates a statement list directly in `env`, with no additional
    /// child scope — used for top-level execution and for namespace/class
    /// bodies, whose declarations must land in the scope the caller passed
    /// in so they can be read back via `Environment::own_bindings`.
    fn eval_statements_in(&self, node: &Node, env: &Rc<Environment>) -> Result<Flow, Value> {
        let owned;
        let stmts: &[Node] = match node {
            Node::Block(stmts) => stmts,
            other => {
                owned = [other.clone()];
                &owned
            }
        };
        let mut last = Value::Null;
        for stmt in stmts {
            match self.eval_node(stmt, env)? {
                Flow::Value(v) => last = v,
                other => return Ok(other),
            }
        }
        Ok(Flow::Value(last))
    }

    /// Evaluates `node` for its value, collapsing any `Flow` variant down to
    /// a `Value`. Only reachable in practice for `Return` (a call's body
    /// finishing early) — `Break`/`Continue` in expression position indicate
    /// a malformed program and degrade to `null` with a diagnostic.
    fn eval_expr(&self, node: &Node, env: &Rc<Environment>) -> Result<Value, Value> {
        match self.eval_node(node, env)? {
            Flow::Value(v) => Ok(v),
            Flow::Return(v) => Ok(v),
            Flow::Break | Flow::Continue => {
                diagnostic(0, "break/continue used in expression position");
                Ok(Value::Null)
            }
        }
    }

    fn eval_node(&self, node: &Node, env: &Rc<Environment>) -> Result<Flow, Value> {
        match node {
            Node::NumberLit(n) => Ok(Flow::Value(Value::Number(*n))),
            Node::StringLit(s) => Ok(Flow::Value(Value::String(s.clone()))),
            Node::BoolLit(b) => Ok(Flow::Value(Value::Bool(*b))),
            Node::NullLit | Node::Null => Ok(Flow::Value(Value::Null)),

            Node::Identifier(name) => match env.get(name) {
                Some(v) => Ok(Flow::Value(v)),
                None => {
                    diagnostic(0, &format!("undefined identifier '{}'", name));
                    Ok(Flow::Value(Value::Null))
                }
            },

            Node::Binary { op, left, right } => self.eval_binary(op, left, right, env),
            Node::Unary { op, operand } => self.eval_unary(op, operand, env),

            Node::Assign {
                op,
                decl,
                type_name,
                target,
                value,
            } => self.eval_assign(op, decl, type_name.as_deref(), target, value, env),

            Node::IncDec { increment, target } => {
                let current = self.eval_expr(target, env)?;
                let new_val = match current {
                    Value::Number(n) => Value::Number(if *increment { n + 1.0 } else { n - 1.0 }),
                    other => {
                        diagnostic(0, &format!("cannot increment/decrement a {}", other.type_name()));
                        other
                    }
                };
                self.assign_target(target, new_val.clone(), env)?;
                Ok(Flow::Value(new_val))
            }

            Node::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(cond, env)?.is_truthy() {
                    self.eval_node(then_branch, env)
                } else if let Some(eb) = else_branch {
                    self.eval_node(eb, env)
                } else {
                    Ok(Flow::Value(Value::Null))
                }
            }

            Node::While { cond, body } => {
                loop {
                    if !self.eval_expr(cond, env)?.is_truthy() {
                        break;
                    }
                    match self.eval_node(body, env)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Value(_) => {}
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::For { init, cond, step, body } => {
                let loop_env = Environment::with_parent(env.clone());
                if let Some(init) = init {
                    self.eval_node(init, &loop_env)?;
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_expr(cond, &loop_env)?.is_truthy() {
                            break;
                        }
                    }
                    match self.eval_node(body, &loop_env)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Value(_) => {}
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                    }
                    if let Some(step) = step {
                        self.eval_node(step, &loop_env)?;
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::ForIn { var, iterable, body } => {
                let items = match self.eval_expr(iterable, env)? {
                    Value::Array(items) => items,
                    Value::Map(entries) => entries
                        .into_iter()
                        .map(|(k, v)| {
                            Value::Map(vec![("key".to_string(), Value::String(k)), ("value".to_string(), v)])
                        })
                        .collect(),
                    other => {
                        diagnostic(0, &format!("cannot iterate over a {}", other.type_name()));
                        Vec::new()
                    }
                };
                for item in items {
                    let loop_env = Environment::with_parent(env.clone());
                    loop_env.define(var, item);
                    match self.eval_node(body, &loop_env)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Value(_) => {}
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::FunctionDecl { name, params, body } => {
                let func = Value::Function(Rc::new(FunctionValue {
                    name: Some(name.clone()),
                    params: params.clone(),
                    body: Rc::new(body.as_ref().clone()),
                    closure: env.clone(),
                }));
                env.define(name, func);
                Ok(Flow::Value(Value::Null))
            }

            Node::Lambda { params, body } => {
                let func = Value::Function(Rc::new(FunctionValue {
                    name: None,
                    params: params.clone(),
                    body: Rc::new(body.as_ref().clone()),
                    closure: env.clone(),
                }));
                Ok(Flow::Value(func))
            }

            Node::Call { name, args } => {
                let mut arg_values = Vec::with_capacity(args.len());
                for a in args {
                    arg_values.push(self.eval_expr(a, env)?);
                }
                if let Some(result) = builtins::dispatch(self, name, &arg_values, env)? {
                    return Ok(Flow::Value(result));
                }
                match env.get(name) {
                    Some(Value::Function(f)) => Ok(Flow::Value(self.invoke(&f, &arg_values)?)),
                    Some(other) => {
                        diagnostic(0, &format!("'{}' is not callable ({})", name, other.type_name()));
                        Ok(Flow::Value(Value::Null))
                    }
                    None => {
                        diagnostic(0, &format!("undefined function '{}'", name));
                        Ok(Flow::Value(Value::Null))
                    }
                }
            }

            Node::Return(value) => {
                let v = match value {
                    Some(n) => self.eval_expr(n, env)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(v))
            }
            Node::Break => Ok(Flow::Break),
            Node::Continue => Ok(Flow::Continue),

            Node::Block(_) => {
                let block_env = Environment::with_parent(env.clone());
                self.eval_statements_in(node, &block_env)
            }

            Node::ArrayLit(items) => {
                let mut vals = Vec::with_capacity(items.len());
                for it in items {
                    vals.push(self.eval_expr(it, env)?);
                }
                Ok(Flow::Value(Value::Array(vals)))
            }
            Node::MapLit(entries) => {
                let mut vals = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = self.eval_expr(k, env)?.display_form();
                    let value = self.eval_expr(v, env)?;
                    vals.push((key, value));
                }
                Ok(Flow::Value(Value::Map(vals)))
            }
            Node::Index { target, index } => {
                let t = self.eval_expr(target, env)?;
                let i = self.eval_expr(index, env)?;
                Ok(Flow::Value(self.index_value(&t, &i)))
            }

            Node::Namespace { name, body } => {
                let ns_env = Environment::with_parent(env.clone());
                self.eval_statements_in(body, &ns_env)?;
                for (member_name, value, is_const) in ns_env.own_bindings() {
                    let qualified = format!("{}.{}", name, member_name);
                    if is_const {
                        env.define_const(&qualified, value);
                    } else {
                        env.define(&qualified, value);
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::EnumDecl { name, members } => {
                let mut next_value = 0.0;
                for (member_name, expr) in members {
                    let value = match expr {
                        Some(e) => self.eval_expr(e, env)?,
                        None => Value::Number(next_value),
                    };
                    if let Value::Number(n) = value {
                        next_value = n + 1.0;
                    }
                    env.define_const(&format!("{}.{}", name, member_name), value);
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::ClassDecl { name, base: _, body } => {
                // Inheritance is not modeled at runtime; `base` only guided parsing.
                let cls_env = Environment::with_parent(env.clone());
                self.eval_statements_in(body, &cls_env)?;
                for (member_name, value, is_const) in cls_env.own_bindings() {
                    let qualified = format!("{}.{}", name, member_name);
                    if is_const {
                        env.define_const(&qualified, value);
                    } else {
                        env.define(&qualified, value);
                    }
                }
                Ok(Flow::Value(Value::Null))
            }

            Node::Match {
                scrutinee,
                cases,
                default,
            } => {
                let s = self.eval_expr(scrutinee, env)?;
                for (pat, body) in cases {
                    let p = self.eval_expr(pat, env)?;
                    if values_equal(&s, &p) {
                        return self.eval_node(body, env);
                    }
                }
                match default {
                    Some(d) => self.eval_node(d, env),
                    None => Ok(Flow::Value(Value::Null)),
                }
            }

            Node::TryCatchFinally {
                try_body,
                catch_name,
                catch_body,
                finally_body,
            } => self.eval_try(try_body, catch_name.as_deref(), catch_body, finally_body, env),
        }
    }

    fn eval_try(
        &self,
        try_body: &Node,
        catch_name: Option<&str>,
        catch_body: &Option<Box<Node>>,
        finally_body: &Option<Box<Node>>,
        env: &Rc<Environment>,
    ) -> Result<Flow, Value> {
        let outcome = match self.eval_node(try_body, env) {
            Err(thrown) => match catch_body {
                Some(cbody) => {
                    let catch_env = Environment::with_parent(env.clone());
                    if let Some(cname) = catch_name {
                        catch_env.define(cname, thrown);
                    }
                    self.eval_node(cbody, &catch_env)
                }
                None => Err(thrown),
            },
            ok => ok,
        };
        match finally_body {
            Some(fbody) => match self.eval_node(fbody, env) {
                // `finally` ran to completion without its own escaping effect:
                // the try/catch outcome stands.
                Ok(Flow::Value(_)) => outcome,
                // `finally`'s own break/continue/return/throw overrides it.
                other => other,
            },
            None => outcome,
        }
    }

    fn invoke(&self, f: &Rc<FunctionValue>, args: &[Value]) -> Result<Value, Value> {
        let call_env = Environment::with_parent(f.closure.clone());
        for (i, param) in f.params.iter().enumerate() {
            let value = if i < args.len() {
                args[i].clone()
            } else if let Some(default) = &param.default {
                self.eval_expr(default, &call_env)?
            } else {
                Value::Null
            };
            call_env.define(&param.name, value);
        }
        let flow = self.eval_node(f.body.as_ref(), &call_env)?;
        Ok(match flow {
            Flow::Value(v) => v,
            Flow::Return(v) => v,
            Flow::Break | Flow::Continue => {
                diagnostic(0, "break/continue escaped a function body");
                Value::Null
            }
        })
    }

    fn eval_binary(&self, op: &BinOp, left: &Node, right: &Node, env: &Rc<Environment>) -> Result<Flow, Value> {
        // Per SPEC_FULL.md §4.3, `&&`/`||` are not short-circuiting: both
        // operands are always evaluated (for their side effects), and only
        // the combination of their truthiness is skipped when unnecessary.
        let l = self.eval_expr(left, env)?;
        let r = self.eval_expr(right, env)?;
        match op {
            BinOp::And => Ok(Flow::Value(Value::Bool(l.is_truthy() && r.is_truthy()))),
            BinOp::Or => Ok(Flow::Value(Value::Bool(l.is_truthy() || r.is_truthy()))),
            _ => Ok(Flow::Value(self.apply_binop(op, l, r))),
        }
    }

    fn apply_binop(&self, op: &BinOp, l: Value, r: Value) -> Value {
        match op {
            BinOp::Add => {
                if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                    Value::String(format!("{}{}", l.display_form(), r.display_form()))
                } else {
                    match (l, r) {
                        (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                        (a, b) => {
                            diagnostic(0, &format!("cannot add {} and {}", a.type_name(), b.type_name()));
                            Value::Null
                        }
                    }
                }
            }
            BinOp::Sub => self.numeric_binop(l, r, |a, b| a - b, "subtract"),
            BinOp::Mul => self.numeric_binop(l, r, |a, b| a * b, "multiply"),
            BinOp::Div => self.numeric_binop(l, r, |a, b| a / b, "divide"),
            BinOp::Mod => self.numeric_binop(l, r, |a, b| a % b, "take the remainder of"),
            BinOp::Eq => Value::Bool(values_equal(&l, &r)),
            BinOp::NotEq => Value::Bool(!values_equal(&l, &r)),
            BinOp::Lt => self.compare(l, r, |a, b| a < b),
            BinOp::LtEq => self.compare(l, r, |a, b| a <= b),
            BinOp::Gt => self.compare(l, r, |a, b| a > b),
            BinOp::GtEq => self.compare(l, r, |a, b| a >= b),
            BinOp::And | BinOp::Or => unreachable!("handled directly in eval_binary"),
        }
    }

    fn numeric_binop(&self, l: Value, r: Value, f: impl Fn(f64, f64) -> f64, verb: &str) -> Value {
        match (l, r) {
            (Value::Number(a), Value::Number(b)) => Value::Number(f(a, b)),
            (a, b) => {
                diagnostic(0, &format!("cannot {} {} and {}", verb, a.type_name(), b.type_name()));
                Value::Null
            }
        }
    }

    fn compare(&self, l: Value, r: Value, f: impl Fn(f64, f64) -> bool) -> Value {
        match (l, r) {
            (Value::Number(a), Value::Number(b)) => Value::Bool(f(a, b)),
            (a, b) => {
                diagnostic(0, &format!("cannot compare {} and {}", a.type_name(), b.type_name()));
                Value::Bool(false)
            }
        }
    }

    fn eval_unary(&self, op: &UnOp, operand: &Node, env: &Rc<Environment>) -> Result<Flow, Value> {
        let v = self.eval_expr(operand, env)?;
        let result = match op {
            UnOp::Not => Value::Bool(!v.is_truthy()),
            UnOp::Neg => match v {
                Value::Number(n) => Value::Number(-n),
                other => {
                    diagnostic(0, &format!("cannot negate a {}", other.type_name()));
                    Value::Null
                }
            },
        };
        Ok(Flow::Value(result))
    }

    fn eval_assign(
        &self,
        op: &AssignOp,
        decl: &Option<DeclKind>,
        type_name: Option<&str>,
        target: &Node,
        value: &Node,
        env: &Rc<Environment>,
    ) -> Result<Flow, Value> {
        let val = self.eval_expr(value, env)?;
        match decl {
            Some(kind) => {
                if let Node::Identifier(name) = target {
                    let is_const = matches!(kind, DeclKind::Const);
                    match env.declare(name, val.clone(), is_const, type_name) {
                        Ok(()) => {}
                        Err(DeclareError::AlreadyDeclared) => {
                            diagnostic(0, &format!("'{}' is already declared in this scope", name));
                        }
                        Err(DeclareError::TypeMismatch { expected, actual }) => {
                            diagnostic(
                                0,
                                &format!(
                                    "type mismatch declaring '{}': expected {}, got {}",
                                    name, expected, actual
                                ),
                            );
                        }
                    }
                } else {
                    diagnostic(0, "declaration target must be a plain identifier");
                }
                Ok(Flow::Value(val))
            }
            None => {
                let final_value = if *op == AssignOp::Assign {
                    val
                } else {
                    let current = self.eval_expr(target, env)?;
                    let bin_op = match op {
                        AssignOp::AddAssign => BinOp::Add,
                        AssignOp::SubAssign => BinOp::Sub,
                        AssignOp::MulAssign => BinOp::Mul,
                        AssignOp::DivAssign => BinOp::Div,
                        AssignOp::ModAssign => BinOp::Mod,
                        AssignOp::Assign => unreachable!(),
                    };
                    self.apply_binop(&bin_op, current, val)
                };
                self.assign_target(target, final_value.clone(), env)?;
                Ok(Flow::Value(final_value))
            }
        }
    }

    fn assign_target(&self, target: &Node, value: Value, env: &Rc<Environment>) -> Result<(), Value> {
        match target {
            Node::Identifier(name) => {
                if let Err(e) = env.set(name, value) {
                    match e {
                        AssignError::Undeclared => diagnostic(0, &format!("'{}' is not declared", name)),
                        AssignError::ConstViolation => {
                            diagnostic(0, &format!("cannot assign to const '{}'", name))
                        }
                    }
                }
                Ok(())
            }
            Node::Index { target: base, index } => self.assign_index(base, index, value, env),
            _ => {
                diagnostic(0, "invalid assignment target");
                Ok(())
            }
        }
    }

    fn assign_index(&self, base: &Node, index: &Node, value: Value, env: &Rc<Environment>) -> Result<(), Value> {
        let idx_val = self.eval_expr(index, env)?;
        let mut container = self.eval_expr(base, env)?;
        match &mut container {
            Value::Array(items) => match idx_val {
                Value::Number(n) => {
                    let i = n as usize;
                    if i < items.len() {
                        items[i] = value;
                    } else {
                        diagnostic(0, "array index out of bounds");
                        return Ok(());
                    }
                }
                _ => {
                    diagnostic(0, "array index must be a number");
                    return Ok(());
                }
            },
            Value::Map(entries) => {
                let key = idx_val.display_form();
                if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                    entry.1 = value;
                } else {
                    entries.push((key, value));
                }
            }
            other => {
                diagnostic(0, &format!("cannot index into a {}", other.type_name()));
                return Ok(());
            }
        }
        self.assign_target(base, container, env)
    }

    fn index_value(&self, target: &Value, index: &Value) -> Value {
        match (target, index) {
            (Value::Array(items), Value::Number(n)) => {
                let idx = *n as usize;
                items.get(idx).cloned().unwrap_or_else(|| {
                    diagnostic(0, "array index out of bounds");
                    Value::Null
                })
            }
            (Value::String(s), Value::Number(n)) => {
                let idx = *n as usize;
                s.chars().nth(idx).map(|c| Value::String(c.to_string())).unwrap_or_else(|| {
                    diagnostic(0, "string index out of bounds");
                    Value::Null
                })
            }
            (Value::Map(entries), key) => {
                let key_str = key.display_form();
                entries
                    .iter()
                    .find(|(k, _)| *k == key_str)
                    .map(|(_, v)| v.clone())
                    .unwrap_or(Value::Null)
            }
            (other, _) => {
                diagnostic(0, &format!("cannot index into a {}", other.type_name()));
                Value::Null
            }
        }
    }
}

/// Structural value equality for `==`/`!=`/`match case`, since `Value` can't
/// derive `PartialEq` (functions aren't comparable).
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((k1, v1), (k2, v2))| k1 == k2 && values_equal(v1, v2))
        }
        (Value::Error(x), Value::Error(y)) => x == y,
        _ => false,
    }
}

/// Builds a thrown `Value::Error` for `system.throw(name, message[, code])`.
pub(crate) fn make_error(name: &str, message: &str, code: Option<f64>) -> Value {
    Value::Error(ErrorValue {
        name: name.to_string(),
        message: message.to_string(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Value {
        Interpreter::new().run(src).expect("script should not throw")
    }

    #[test]
    fn arithmetic_and_string_concat() {
        assert!(matches!(run("1 + 2 * 3;"), Value::Number(n) if n == 7.0));
        assert_eq!(run("\"n=\" + 5;").to_string(), "n=5");
    }

    #[test]
    fn logical_and_or_evaluate_both_sides_unconditionally() {
        // `false && ...` still evaluates its right side (no short-circuit, per
        // SPEC_FULL.md §4.3), observable via the side-effecting assignment.
        assert_eq!(
            run("&insert hit = false; false && (hit = true); hit;").to_string(),
            "true"
        );
        assert_eq!(
            run("&insert hit = false; true || (hit = true); hit;").to_string(),
            "true"
        );
    }

    #[test]
    fn array_plus_array_is_a_type_mismatch_not_concatenation() {
        assert_eq!(run("[1] + [2];").to_string(), "null");
    }

    #[test]
    fn declaration_and_const_violation_leaves_value_unchanged() {
        assert_eq!(
            run("const x = 1; x = 2; x;").to_string(),
            "1"
        );
    }

    #[test]
    fn redeclaration_in_same_scope_keeps_first_value() {
        assert_eq!(run("&insert x = 1; &insert x = 2; x;").to_string(), "1");
    }

    #[test]
    fn if_else_branches() {
        assert_eq!(run("if (1 < 2) { \"a\"; } else { \"b\"; }").to_string(), "a");
        assert_eq!(run("if (1 > 2) { \"a\"; } else { \"b\"; }").to_string(), "b");
    }

    #[test]
    fn while_loop_accumulates() {
        assert_eq!(
            run("&insert i = 0; &insert sum = 0; while (i < 5) { sum += i; i++; } sum;").to_string(),
            "10"
        );
    }

    #[test]
    fn for_in_with_break() {
        assert_eq!(
            run(
                "&insert found = 0; for (x in [1, 2, 3, 4]) { if (x == 3) { found = x; break; } } found;"
            )
            .to_string(),
            "3"
        );
    }

    #[test]
    fn function_default_and_closure_static_scoping() {
        let script = r#"
            function make_adder(amount) {
                function add(x) {
                    return x + amount;
                }
                return add;
            }
            &insert add5 = make_adder(5);
            &insert amount = 9999;
            add5(10);
        "#;
        assert_eq!(run(script).to_string(), "15");
    }

    #[test]
    fn function_with_default_argument() {
        assert_eq!(
            run("function add(x, y = 10) { return x + y; } add(1);").to_string(),
            "11"
        );
    }

    #[test]
    fn namespace_qualification_and_enum() {
        let script = r#"
            namespace Shapes {
                const sides = 4;
            }
            enum Color { Red, Green, Blue = 10 }
            Shapes.sides + Color.Blue;
        "#;
        assert_eq!(run(script).to_string(), "14");
    }

    #[test]
    fn namespace_does_not_bind_bare_name() {
        assert_eq!(run("namespace M { const a = 1; } system.type(M);").to_string(), "null");
    }

    #[test]
    fn match_with_default() {
        assert_eq!(
            run("match (2) { case 1: \"one\"; case 2: \"two\"; default: \"other\"; }").to_string(),
            "two"
        );
        assert_eq!(
            run("match (99) { case 1: \"one\"; default: \"other\"; }").to_string(),
            "other"
        );
    }

    #[test]
    fn structured_error_with_finally_runs_regardless() {
        let script = r#"
            &insert log = "";
            try {
                system.throw("Boom", "bad");
            } catch (e) {
                log += "caught:" + e;
            } finally {
                log += ";finally";
            }
            log;
        "#;
        let result = run(script).to_string();
        assert!(result.starts_with("caught:<Boom: bad>"));
        assert!(result.ends_with(";finally"));
    }

    #[test]
    fn finally_control_flow_overrides_try_result() {
        let script = r#"
            function f() {
                try {
                    return 1;
                } finally {
                    return 2;
                }
            }
            f();
        "#;
        assert_eq!(run(script).to_string(), "2");
    }

    #[test]
    fn for_in_over_map_binds_key_value_pairs() {
        let script = r#"
            &insert out = "";
            for (entry in {"a": 1, "b": 2}) {
                out += entry["key"] + ":" + entry["value"] + ",";
            }
            out;
        "#;
        assert_eq!(run(script).to_string(), "a:1,b:2,");
    }

    #[test]
    fn for_in_over_string_is_diagnostic_not_char_iteration() {
        assert_eq!(run(r#"for (c in "abc") { } "done";"#).to_string(), "done");
    }

    #[test]
    fn array_index_assignment() {
        assert_eq!(run("&insert a = [1, 2, 3]; a[1] = 9; a[1];").to_string(), "9");
    }

    #[test]
    fn undeclared_assignment_reports_diagnostic_and_yields_null_identifier() {
        // Assigning to an undeclared name is a no-op diagnostic, not a panic.
        run("x = 1;");
    }
}
