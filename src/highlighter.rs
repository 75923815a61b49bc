// ABOUTME: Syntax highlighter for REPL with color support
// Implements rustyline's Highlighter trait to provide ANSI color codes
// for Sharp syntax elements while preserving display width

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;
use std::collections::HashSet;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_BRACE: &str = "\x1b[1;34m"; // Bold blue
const COLOR_KEYWORD: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_BUILTIN: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_BOOLEAN: &str = "\x1b[33m"; // Yellow
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)

/// Main highlighter helper for the Sharp REPL.
pub struct SharpHelper;

impl SharpHelper {
    pub fn new() -> Self {
        SharpHelper
    }

    /// Colorizes a value's printed form the same way REPL input is colorized,
    /// so `=> 42` and `=> "hi"` get the same number/string treatment as input.
    pub fn highlight_output(text: &str) -> String {
        highlight_line(text, &keywords(), &builtins())
    }
}

impl Default for SharpHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for SharpHelper {}

impl Completer for SharpHelper {
    type Candidate = String;
}

impl Hinter for SharpHelper {
    type Hint = String;
}

impl Validator for SharpHelper {}

impl Highlighter for SharpHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line, &keywords(), &builtins());
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn highlight_line(line: &str, keywords: &HashSet<&'static str>, builtins: &HashSet<&'static str>) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '#' => {
                result.push_str(COLOR_COMMENT);
                while i < chars.len() && chars[i] != '\n' {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }

            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        result.push(chars[i]);
                        result.push(chars[i + 1]);
                        i += 2;
                    } else if chars[i] == '"' {
                        result.push('"');
                        i += 1;
                        break;
                    } else {
                        result.push(chars[i]);
                        i += 1;
                    }
                }
                result.push_str(COLOR_RESET);
            }

            '0'..='9' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num: String = chars[start..i].iter().collect();
                result.push_str(COLOR_NUMBER);
                result.push_str(&num);
                result.push_str(COLOR_RESET);
            }

            '(' | ')' | '{' | '}' | '[' | ']' => {
                result.push_str(COLOR_BRACE);
                result.push(chars[i]);
                i += 1;
                result.push_str(COLOR_RESET);
            }

            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && is_ident_continue(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if word == "true" || word == "false" {
                    result.push_str(COLOR_BOOLEAN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if keywords.contains(word.as_str()) {
                    result.push_str(COLOR_KEYWORD);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if builtins.contains(word.as_str()) {
                    result.push_str(COLOR_BUILTIN);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else {
                    result.push_str(&word);
                }
            }

            _ => {
                result.push(chars[i]);
                i += 1;
            }
        }
    }

    result
}

fn keywords() -> HashSet<&'static str> {
    [
        "if", "else", "while", "for", "function", "return", "break", "continue", "void",
        "null", "const", "namespace", "enum", "class", "struct", "new", "match", "case",
        "default", "try", "catch", "finally", "in", "help", "end", "add", "sub", "mul", "div",
        "mod",
    ]
    .iter()
    .copied()
    .collect()
}

fn builtins() -> HashSet<&'static str> {
    [
        "system.print",
        "system.output",
        "system.warning",
        "system.error",
        "system.input",
        "system.len",
        "system.type",
        "system.annotate",
        "system.sin",
        "system.cos",
        "system.tan",
        "system.asin",
        "system.acos",
        "system.atan",
        "system.log",
        "system.ln",
        "system.exp",
        "system.sqrt",
        "system.pow",
        "system.store",
        "system.recall",
        "system.memclear",
        "system.convert",
        "system.throw",
        "system.help",
        "system.history.add",
        "system.history.get",
        "system.history.clear",
        "file.read",
        "file.write",
    ]
    .iter()
    .copied()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_highlighting() {
        let highlighted = highlight_line("42", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_NUMBER));
    }

    #[test]
    fn string_highlighting() {
        let highlighted = highlight_line("\"hello\"", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_STRING));
    }

    #[test]
    fn comment_highlighting() {
        let highlighted = highlight_line("# a comment", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_COMMENT));
    }

    #[test]
    fn keyword_highlighting() {
        let highlighted = highlight_line("if (x) { return 1; }", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_KEYWORD));
        assert!(highlighted.contains(COLOR_BRACE));
    }

    #[test]
    fn builtin_highlighting() {
        let highlighted = highlight_line("system.print(1);", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_BUILTIN));
    }

    #[test]
    fn boolean_highlighting() {
        let highlighted = highlight_line("true false", &keywords(), &builtins());
        assert!(highlighted.contains(COLOR_BOOLEAN));
    }
}
