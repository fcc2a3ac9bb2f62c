//! String normalization helpers shared by faults and dispatchers.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII word characters only; anything else is dropped.
    Regex::new(r"[^A-Za-z0-9_]+").expect("static pattern compiles")
});

/// Reduce a string to its word characters (`[A-Za-z0-9_]`).
pub fn strip_to_word(value: &str) -> String {
    NON_WORD.replace_all(value, "").into_owned()
}

/// Normalize a URI for case-insensitive comparison.
///
/// Absolute URIs go through [`Url`] serialization (scheme/host canonicalized,
/// dot segments removed) and are then lowercased. Input `Url` cannot parse is
/// trimmed and lowercased as-is. Blank input yields an empty string.
pub fn normalize_uri(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match Url::parse(trimmed) {
        Ok(url) => url.as_str().to_ascii_lowercase(),
        Err(_) => trimmed.to_ascii_lowercase(),
    }
}
