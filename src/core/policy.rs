//! Resolved link rewrite rules.

use super::link::LinkKind;
use super::url::host_of;

/// Immutable rule set for one processing run.
///
/// Built once (usually by `TargetBlankConfig::resolve`) and shared by
/// reference across every document and worker thread.
///
/// # Example
///
/// ```
/// use target_blank::LinkPolicy;
///
/// let policy = LinkPolicy::new("https://example.com")
///     .with_noopener(false)
///     .with_extra_rel(["nofollow"]);
/// assert_eq!(policy.rel_tokens(), vec!["noreferrer", "nofollow"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    site_base_url: String,
    site_host: Option<String>,
    required_css_class: Option<String>,
    add_noopener: bool,
    add_noreferrer: bool,
    extra_rel_tokens: Vec<String>,
    css_classes_to_add: Vec<String>,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self::new("")
    }
}

impl LinkPolicy {
    /// Default rules for a site: `rel="noopener noreferrer"`, no class filter,
    /// no class addition, no extra rel tokens.
    pub fn new(site_base_url: impl Into<String>) -> Self {
        let site_base_url = site_base_url.into();
        let site_host = host_of(&site_base_url);
        Self {
            site_base_url,
            site_host,
            required_css_class: None,
            add_noopener: true,
            add_noreferrer: true,
            extra_rel_tokens: Vec::new(),
            css_classes_to_add: Vec::new(),
        }
    }

    /// Only rewrite anchors already carrying this class.
    ///
    /// An empty name clears the filter.
    pub fn with_required_class(mut self, class: Option<impl Into<String>>) -> Self {
        self.required_css_class = class.map(Into::into).filter(|c| !c.is_empty());
        self
    }

    pub fn with_noopener(mut self, enabled: bool) -> Self {
        self.add_noopener = enabled;
        self
    }

    pub fn with_noreferrer(mut self, enabled: bool) -> Self {
        self.add_noreferrer = enabled;
        self
    }

    /// Extra `rel` tokens, appended after the defaults in the given order.
    pub fn with_extra_rel<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_rel_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Classes prepended to the `class` attribute of rewritten anchors.
    pub fn with_added_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.css_classes_to_add = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn site_base_url(&self) -> &str {
        &self.site_base_url
    }

    /// Lowercase host of the site URL, `None` if unset or malformed.
    pub fn site_host(&self) -> Option<&str> {
        self.site_host.as_deref()
    }

    pub fn required_css_class(&self) -> Option<&str> {
        self.required_css_class.as_deref()
    }

    pub fn add_noopener(&self) -> bool {
        self.add_noopener
    }

    pub fn add_noreferrer(&self) -> bool {
        self.add_noreferrer
    }

    pub fn extra_rel_tokens(&self) -> &[String] {
        &self.extra_rel_tokens
    }

    pub fn css_classes_to_add(&self) -> &[String] {
        &self.css_classes_to_add
    }

    /// Classify a link against this policy's site.
    #[inline]
    pub fn classify(&self, href: &str) -> LinkKind {
        LinkKind::classify_with_host(href, self.site_host())
    }

    /// Check the required-class filter against a `class` attribute value.
    ///
    /// Always passes when no class is required.
    pub fn accepts_classes(&self, class_attr: Option<&str>) -> bool {
        match self.required_css_class() {
            None => true,
            Some(required) => class_attr
                .unwrap_or_default()
                .split_whitespace()
                .any(|name| name == required),
        }
    }

    /// Composed `rel` tokens: defaults first, then extras in configured order.
    ///
    /// Extras are not de-duplicated against the defaults, so a token can be
    /// forced back in even when its default switch is off.
    pub fn rel_tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::with_capacity(2 + self.extra_rel_tokens.len());
        if self.add_noopener {
            tokens.push("noopener");
        }
        if self.add_noreferrer {
            tokens.push("noreferrer");
        }
        tokens.extend(self.extra_rel_tokens.iter().map(String::as_str));
        tokens
    }

    /// The `rel` attribute value, `None` when no token is composed.
    pub fn rel_value(&self) -> Option<String> {
        let tokens = self.rel_tokens();
        (!tokens.is_empty()).then(|| tokens.join(" "))
    }

    /// Merge added classes in front of an existing `class` value.
    ///
    /// Returns `None` when the policy adds no classes.
    pub fn merged_classes(&self, existing: Option<&str>) -> Option<String> {
        if self.css_classes_to_add.is_empty() {
            return None;
        }

        let mut merged = self.css_classes_to_add.join(" ");
        if let Some(existing) = existing.filter(|e| !e.trim().is_empty()) {
            merged.push(' ');
            merged.push_str(existing);
        }
        Some(merged)
    }
}
