//! `system.history.add`/`.get`/`.clear` — the process-wide command history.

use super::arg;
use crate::eval::Interpreter;
use crate::value::Value;

pub(super) fn add(interp: &Interpreter, args: &[Value]) -> Value {
    interp.history.borrow_mut().push(arg(args, 0));
    Value::Null
}

/// Returns a fresh array snapshot of the whole history, not an indexed
/// lookup — `system.history.get` takes no arguments.
pub(super) fn get(interp: &Interpreter) -> Value {
    Value::Array(interp.history.borrow().clone())
}

pub(super) fn clear(interp: &Interpreter) -> Value {
    interp.history.borrow_mut().clear();
    Value::Null
}
