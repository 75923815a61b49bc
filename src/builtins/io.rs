//! Console I/O built-ins: `system.print`/`output`/`warning`/`error`/`input`.
//!
//! `print` and `output` are the same built-in under two names (SPEC_FULL.md
//! §4.4): arguments are joined with a single space and a trailing newline,
//! matching the Display form each Value already renders.

use super::arg;
use crate::value::Value;
use std::io::{self, Write};

fn joined(args: &[Value]) -> String {
    args.iter()
        .map(|v| v.display_form())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn print(args: &[Value]) -> Value {
    println!("{}", joined(args));
    Value::Null
}

pub(super) fn output(args: &[Value]) -> Value {
    println!("{}", joined(args));
    Value::Null
}

pub(super) fn warning(args: &[Value]) -> Value {
    println!("Warning: {}", joined(args));
    Value::Null
}

pub(super) fn error(args: &[Value]) -> Value {
    eprintln!("Error: {}", joined(args));
    Value::Null
}

/// Writes the prompt (if any) without a newline, then reads one line from
/// stdin. Returns the empty string on EOF rather than null.
pub(super) fn input(args: &[Value]) -> Value {
    let prompt = arg(args, 0);
    if !matches!(prompt, Value::Null) {
        print!("{}", prompt.display_form());
        let _ = io::stdout().flush();
    }
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => Value::String(String::new()),
        Ok(_) => Value::String(line.trim_end_matches(['\n', '\r']).to_string()),
    }
}
