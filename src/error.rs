// ABOUTME: Fatal error types and the non-fatal diagnostic reporting helper

use thiserror::Error;

/// Errors that stop the whole process, as opposed to the non-fatal diagnostics
/// handled by `diagnostic()` below. SPEC_FULL.md §7a keeps these two mechanisms
/// distinct rather than collapsing them into one type, mirroring the split
/// between exceptional-but-fatal and merely-reported conditions in the teacher.
#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("cannot read script file {path}: {source}")]
    ScriptNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize REPL: {0}")]
    ReplInit(String),

    #[error("uncaught error: {0}")]
    UncaughtThrow(String),
}

/// Writes a non-fatal runtime or parse diagnostic to stderr and returns control
/// to the caller, per SPEC_FULL.md §7's "reported and locally degraded to null"
/// policy. Never propagated as a `Result::Err`.
pub fn diagnostic(line: usize, message: &str) {
    eprintln!("{} (line {})", message, line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_not_found_display() {
        let err = InterpreterError::ScriptNotFound {
            path: "foo.sharp".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("foo.sharp"));
    }
}
