use std::sync::LazyLock;

use regex::Regex;

// Anchored at the start only: trailing text after a valid address still passes.
static EMAIL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+").expect("email pattern compiles"));

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_PREFIX_RE.is_match(candidate)
}
