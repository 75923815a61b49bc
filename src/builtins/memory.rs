//! Calculator-memory built-ins: `system.store`/`recall`/`memclear`.
//!
//! Memory is a side table owned by the `Interpreter` (SPEC_FULL.md §3), not a
//! `static`/`thread_local`, so each `Interpreter` instance gets its own.

use super::arg;
use crate::env::Environment;
use crate::eval::Interpreter;
use crate::value::Value;

pub(super) fn store(interp: &Interpreter, args: &[Value]) -> Value {
    let key = arg(args, 0).to_string();
    let value = arg(args, 1);
    interp.memory.borrow().define(&key, value);
    Value::Null
}

pub(super) fn recall(interp: &Interpreter, args: &[Value]) -> Value {
    let key = arg(args, 0).to_string();
    interp.memory.borrow().get(&key).unwrap_or(Value::Null)
}

pub(super) fn memclear(interp: &Interpreter) -> Value {
    *interp.memory.borrow_mut() = Environment::new();
    Value::Null
}
