//! Per-anchor policy application.
//!
//! An [`AnchorRecord`] is a snapshot of the attributes that matter for one
//! `<a href>` element. The policy decides on the snapshot; the rewriter then
//! writes the resulting [`AnchorEdit`] back onto the element.

use crate::core::{LinkKind, LinkPolicy};

/// Attribute snapshot of one anchor, alive for a single `process` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorRecord {
    pub href: String,
    /// Verbatim `class` attribute value, if present.
    pub class_attr: Option<String>,
    /// Distinct classes, in first-occurrence order.
    pub existing_classes: Vec<String>,
    pub target_set: bool,
    /// Distinct `rel` tokens, in first-occurrence order. The written `rel`
    /// value itself is the policy's composition, repeats included.
    pub rel_tokens: Vec<String>,
}

/// Attribute values to write back onto a qualifying anchor.
///
/// `None` means "leave the attribute as it is".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEdit {
    pub target: &'static str,
    pub rel: Option<String>,
    pub class: Option<String>,
}

/// Value written to the `target` attribute.
pub const TARGET_BLANK: &str = "_blank";

impl AnchorRecord {
    /// Snapshot an anchor from its raw attribute values.
    pub fn new(href: &str, class_attr: Option<String>, target: Option<&str>, rel: Option<&str>) -> Self {
        let existing_classes = unique_tokens(class_attr.as_deref().unwrap_or_default());

        Self {
            href: href.to_string(),
            class_attr,
            existing_classes,
            target_set: target == Some(TARGET_BLANK),
            rel_tokens: unique_tokens(rel.unwrap_or_default()),
        }
    }

    /// Classify the anchor's `href` under the policy.
    #[inline]
    pub fn kind(&self, policy: &LinkPolicy) -> LinkKind {
        policy.classify(&self.href)
    }

    /// Check whether the anchor qualifies for rewriting:
    /// external, and carrying the required class if one is configured.
    pub fn qualifies(&self, policy: &LinkPolicy) -> bool {
        self.kind(policy).is_external() && policy.accepts_classes(self.class_attr.as_deref())
    }

    /// Apply the policy, updating the snapshot in place.
    ///
    /// Returns the attribute edit for a qualifying anchor, `None` otherwise
    /// (the anchor is left byte-identical).
    pub fn apply(&mut self, policy: &LinkPolicy) -> Option<AnchorEdit> {
        if !self.qualifies(policy) {
            return None;
        }

        self.target_set = true;

        let rel = policy.rel_value();
        if let Some(rel) = &rel {
            self.rel_tokens = unique_tokens(rel);
        }

        let class = policy.merged_classes(self.class_attr.as_deref());
        if let Some(class) = &class {
            self.existing_classes = unique_tokens(class);
            self.class_attr = Some(class.clone());
        }

        Some(AnchorEdit {
            target: TARGET_BLANK,
            rel,
            class,
        })
    }
}

/// Whitespace-split tokens with repeats dropped, first occurrence kept.
fn unique_tokens(value: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in value.split_whitespace() {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
