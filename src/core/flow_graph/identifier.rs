// src/core/flow_graph/identifier.rs - Diagram-safe identifier normalization
use regex::Regex;
use std::sync::LazyLock;

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("literal character class"));

/// Normalize an arbitrary flow name into a diagram-safe identifier.
///
/// Empty input becomes `"unknown"`; every character outside `[A-Za-z0-9_]`
/// becomes `_`; a result that does not start with a letter gets an `f_`
/// prefix. Total and deterministic for any input.
///
/// Uniqueness is NOT guaranteed: distinct names can normalize identically,
/// and the graph builder keeps the first occurrence (see `builder.rs`).
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return "unknown".to_string();
    }

    let mut safe = NON_IDENTIFIER.replace_all(raw, "_").into_owned();

    if !safe
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
    {
        safe.insert_str(0, "f_");
    }

    safe
}
