//! `file.read(path)`/`file.write(path, content)` — basic text file I/O.
//! Per SPEC_FULL.md §4.4, failures degrade to null rather than throwing; a
//! missing file is an I/O condition a script notices by checking the result,
//! not by `try`/`catch`.

use super::arg;
use crate::value::Value;
use std::fs;

pub(super) fn read(args: &[Value]) -> Value {
    let path = arg(args, 0).to_string();
    fs::read_to_string(&path)
        .map(Value::String)
        .unwrap_or(Value::Null)
}

pub(super) fn write(args: &[Value]) -> Value {
    let path = arg(args, 0).to_string();
    let content = match arg(args, 1) {
        v @ (Value::String(_) | Value::Number(_)) => v.display_form(),
        _ => return Value::Null,
    };
    let _ = fs::write(&path, content);
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let path = std::env::temp_dir().join("sharp_builtins_file_test.txt");
        let path_str = path.to_string_lossy().to_string();
        write(&[Value::String(path_str.clone()), Value::String("hello".into())]);
        let v = read(&[Value::String(path_str)]);
        assert_eq!(v.to_string(), "hello");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn read_of_missing_file_is_null() {
        let v = read(&[Value::String("/nonexistent/path/does_not_exist.sharp".into())]);
        assert!(matches!(v, Value::Null));
    }

    #[test]
    fn write_ignores_non_string_non_number_content() {
        let path = std::env::temp_dir().join("sharp_builtins_file_ignore_test.txt");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);
        write(&[Value::String(path_str.clone()), Value::Array(vec![])]);
        assert!(!path.exists());
    }
}
