//! URL helpers for link classification.
//!
//! - `is_absolute_http()` - syntactic check for `http://` / `https://` URLs
//! - `host_of()` - lowercase host of an absolute URL, via the `url` crate

use std::sync::LazyLock;

use regex::Regex;

/// Absolute http(s) URL: scheme (any case), `://`, then a non-empty authority.
static ABSOLUTE_HTTP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[hH][tT][tT][pP][sS]?://[^\s/?#]+").expect("valid absolute-url pattern")
});

/// Check if a link matches the absolute http(s) URL grammar.
///
/// Relative paths, protocol-relative links (`//cdn.example.com`),
/// fragments and other schemes (`tel:`, `ftp:`) do not match.
#[inline]
pub fn is_absolute_http(link: &str) -> bool {
    ABSOLUTE_HTTP.is_match(link)
}

/// Extract the host of an absolute URL.
///
/// The `url` crate lowercases hosts of special schemes, so the result can be
/// compared directly. Returns `None` for empty, relative or malformed input.
pub fn host_of(url_str: &str) -> Option<String> {
    let url_str = url_str.trim();
    if url_str.is_empty() {
        return None;
    }

    let parsed = url::Url::parse(url_str).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
}
