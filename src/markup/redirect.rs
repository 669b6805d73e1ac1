//! Client-side redirect extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_regex_unsafe;

const JUMP_URL_PATTERN: &str = r#"var jump_url="(.*?)";"#;

static JUMP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(JUMP_URL_PATTERN, "JUMP_URL_RE"));

/// Returns the target of the first `var jump_url="…";` assignment, if any.
///
/// An empty assignment yields `Some("")`; callers decide what that means.
pub fn extract_redirect(html: &str) -> Option<String> {
    JUMP_URL_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
