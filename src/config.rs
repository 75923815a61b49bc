// ABOUTME: Configuration and constants for the Sharp interpreter
// This module contains version info and the welcome/help banner text.

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Sharp Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A small C-like scripting language in Rust";

pub const HELP_TEXT: &str = r#"
Usage: sharp [SCRIPT]

With no arguments, starts an interactive REPL: each line is lexed,
parsed, and evaluated immediately. Type `exit` to quit.

With a script path, parses and evaluates the file, then calls a
zero-argument `main` function in it if one is defined.

  -h, --help    Show this message and exit
"#;

pub const REPL_HELP_TEXT: &str = r#"
Type any Sharp statement to evaluate it. Type `exit` to leave the REPL.
Run `system.help("dev")` from within the REPL for implementation notes.
"#;
