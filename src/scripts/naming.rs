//! Script naming rule.

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase kebab-case: words of `[a-z0-9]` joined by single hyphens.
pub const SCRIPT_NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

static SCRIPT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SCRIPT_NAME_PATTERN).expect("valid script name regex"));

/// Check a filename against the naming rule.
pub fn is_valid_script_name(name: &str) -> bool {
    SCRIPT_NAME_RE.is_match(name)
}
