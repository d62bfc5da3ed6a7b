//! `[site]` configuration.

use serde::{Deserialize, Serialize};

/// Site information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site URL (e.g., "https://example.com"). Links to its host are internal.
    pub url: Option<String>,
}

impl SiteSectionConfig {
    /// Check `url`, returning a warning message when it cannot be used.
    ///
    /// An unusable URL is not fatal: every absolute link is then external.
    pub fn url_warning(&self) -> Option<String> {
        let url_str = self.url.as_deref()?;
        match url::Url::parse(url_str) {
            Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => Some(format!(
                "site.url scheme '{}' not supported, all absolute links are treated as external",
                parsed.scheme()
            )),
            Ok(parsed) if parsed.host_str().is_none() => Some(
                "site.url has no host, all absolute links are treated as external".to_string(),
            ),
            Ok(_) => None,
            Err(e) => Some(format!(
                "invalid site.url '{url_str}' ({e}), all absolute links are treated as external"
            )),
        }
    }
}
