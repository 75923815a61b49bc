// ABOUTME: Help and documentation system for the Sharp interpreter
// Backs `system.help([topic])`: a small registry of topic guides looked up by name.

use std::collections::HashMap;

/// Topics accepted by `system.help`. Unknown topics fall back to `user`.
const TOPICS: &[(&str, &str)] = &[
    ("user", USER_GUIDE),
    ("help", USER_GUIDE),
    ("dev", DEV_GUIDE),
    ("developer", DEV_GUIDE),
];

const USER_GUIDE: &str = r#"Sharp user guide
----------------
Sharp is a small C-like scripting language. Declare variables with
`&insert name = value;`, write functions with `function name(params) { ... }`,
and use `if`/`while`/`for`/`match` for control flow.

Built-ins live under the `system.` namespace: system.print, system.input,
system.sin/cos/tan, system.convert, system.store/recall, system.throw, and
more. Run `system.help("dev")` for implementation notes."#;

const DEV_GUIDE: &str = r#"Sharp developer guide
----------------------
The interpreter is a straightforward lexer -> recursive-descent parser ->
tree-walking evaluator pipeline. Structured errors raised by system.throw
unwind through try/catch/finally as an Err(Value) rather than a panic.
Namespaces and classes publish their members as `Name.member` bindings in
the enclosing scope; they do not bind a bare name."#;

/// Registry mapping topic name to guide text, built once per lookup.
/// A `HashMap` (rather than a linear scan) mirrors the teacher's registry
/// shape even though four entries would find a match either way.
fn registry() -> HashMap<&'static str, &'static str> {
    TOPICS.iter().copied().collect()
}

/// Looks up a documentation topic. Unknown topics fall back to the user
/// guide; this registry never actually misses a file, but `lookup` still
/// models the "missing documentation file" case from the contract.
pub fn lookup(topic: &str) -> String {
    let reg = registry();
    if topic.is_empty() {
        return USER_GUIDE.to_string();
    }
    match reg.get(topic) {
        Some(text) => text.to_string(),
        None => reg
            .get("user")
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Documentation not found".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_topics_resolve() {
        assert!(lookup("user").contains("Sharp user guide"));
        assert!(lookup("help").contains("Sharp user guide"));
        assert!(lookup("dev").contains("developer guide"));
        assert!(lookup("developer").contains("developer guide"));
    }

    #[test]
    fn empty_topic_is_user_guide() {
        assert!(lookup("").contains("Sharp user guide"));
    }

    #[test]
    fn unknown_topic_falls_back_to_user_guide() {
        assert!(lookup("quantum-physics").contains("Sharp user guide"));
    }
}
