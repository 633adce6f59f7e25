// src/generate/sanitize.rs

//! Markdown fence stripping for model output.
//!
//! Models are told to answer with code only, but many still wrap the
//! answer in one or more fenced blocks, with or without a language tag.
//! The sanitizer removes every fence marker and trims the result, and is
//! idempotent: already-clean text passes through unchanged.

use regex::Regex;
use std::sync::OnceLock;

/// Opening fence with an optional language tag, e.g. ```` ```python ````.
/// The trailing newline is folded in so the code starts flush left.
fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```\w*\n?").expect("fence pattern is valid"))
}

/// Remove all markdown code-fence markers from `raw` and trim
/// surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    let without_open = opening_fence().replace_all(raw, "");
    without_open.replace("```", "").trim().to_string()
}
