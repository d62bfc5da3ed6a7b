//! Link classification utilities.

use super::url::{host_of, is_absolute_http};

/// Classification of an anchor `href` relative to the site.
///
/// Only [`LinkKind::External`] links are rewritten; every other kind is
/// passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Absolute http(s) URL pointing at another host.
    External,
    /// Absolute http(s) URL pointing at the site itself.
    Internal,
    /// `mailto:` link.
    Mailto,
    /// Anything that is not an absolute http(s) URL
    /// (relative paths, fragments, `tel:`, malformed input).
    Unparsable,
}

impl LinkKind {
    /// Classify `href` against the site's base URL.
    ///
    /// An empty or malformed `site_base_url` means "no site configured":
    /// every absolute http(s) link is then external.
    pub fn classify(href: &str, site_base_url: &str) -> Self {
        Self::classify_with_host(href, host_of(site_base_url).as_deref())
    }

    /// Classify `href` against an already extracted (lowercase) site host.
    pub fn classify_with_host(href: &str, site_host: Option<&str>) -> Self {
        let href = href.trim();

        if href.starts_with("mailto:") {
            return Self::Mailto;
        }

        if !is_absolute_http(href) {
            return Self::Unparsable;
        }

        let Some(host) = host_of(href) else {
            return Self::Unparsable;
        };

        match site_host {
            Some(site) if site == host => Self::Internal,
            _ => Self::External,
        }
    }

    /// Check if the link should be rewritten.
    #[inline]
    pub fn is_external(self) -> bool {
        matches!(self, Self::External)
    }
}
