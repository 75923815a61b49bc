//! The built-in library (SPEC_FULL.md §4.4): every name here is checked by
//! exact string match before the evaluator ever consults an `Environment`,
//! so user code can never shadow or override a built-in.

mod convert;
mod errors;
mod file;
mod history;
mod io;
mod math;
mod memory;
mod meta;

use crate::env::Environment;
use crate::eval::Interpreter;
use crate::value::Value;
use std::rc::Rc;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Null)
}

/// Tries to handle `name` as a built-in call. `Ok(None)` means `name` isn't
/// a built-in and the evaluator should fall back to a user-defined function
/// lookup; `Ok(Some(v))` is the built-in's result; `Err(v)` is a thrown
/// structured error.
pub fn dispatch(
    interp: &Interpreter,
    name: &str,
    args: &[Value],
    env: &Rc<Environment>,
) -> Result<Option<Value>, Value> {
    let result = match name {
        "system.print" => io::print(args),
        "system.output" => io::output(args),
        "system.warning" => io::warning(args),
        "system.error" => io::error(args),
        "system.input" => io::input(args),

        "system.sin" => math::unary(args, f64::sin),
        "system.cos" => math::unary(args, f64::cos),
        "system.tan" => math::unary(args, f64::tan),
        "system.asin" => math::unary(args, f64::asin),
        "system.acos" => math::unary(args, f64::acos),
        "system.atan" => math::unary(args, f64::atan),
        "system.log" => math::unary(args, f64::log10),
        "system.ln" => math::unary(args, f64::ln),
        "system.exp" => math::unary(args, f64::exp),
        "system.sqrt" => math::unary(args, f64::sqrt),
        "system.pow" => math::pow(args),

        "system.store" => memory::store(interp, args),
        "system.recall" => memory::recall(interp, args),
        "system.memclear" => memory::memclear(interp),

        "system.convert" => convert::convert(args),

        "system.history.add" => history::add(interp, args),
        "system.history.get" => history::get(interp),
        "system.history.clear" => history::clear(interp),

        "system.len" => meta::len(args),
        "system.type" => meta::type_of(args),
        "system.annotate" => meta::annotate(args, env),

        "system.throw" => return Err(errors::throw(args)),

        "system.help" => {
            println!("{}", crate::help::lookup(&arg(args, 0).to_string()));
            Value::Null
        }

        "file.read" => file::read(args),
        "file.write" => file::write(args),

        _ => return Ok(None),
    };
    Ok(Some(result))
}
