//! External link rewriting pipeline.
//!
//! Turns a rendered document into the same document with its external
//! anchors opening in a new browsing context.
//!
//! # Architecture
//!
//! ```text
//! document ──► DocumentSplit ──► body fragment ──► lol_html (a[href]) ──► reassemble
//!                 │                                   │
//!                 └─ head / tail kept byte-for-byte   └─ AnchorRecord::apply(policy)
//! ```
//!
//! - `process()`: one-shot rewrite, returns the rewritten document
//! - `TargetBlank::rewrite()`: same, plus statistics and the edited anchors
//!
//! The pipeline is pure and synchronous; one `LinkPolicy` can be shared by
//! reference between any number of worker threads.

mod anchor;
mod split;

use lol_html::html_content::Element;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use thiserror::Error;

use crate::core::LinkPolicy;

pub use anchor::{AnchorEdit, AnchorRecord, TARGET_BLANK};
pub use split::DocumentSplit;

/// Substring every document with at least one anchor contains.
const ANCHOR_OPEN: &str = "<a";

// =============================================================================
// Types
// =============================================================================

/// Rewrite failure. Either the whole document is rewritten or this is
/// returned and the caller keeps the original content.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to parse HTML fragment ({len} bytes)")]
    Parse {
        /// Length of the fragment handed to the parser.
        len: usize,
        #[source]
        source: lol_html::errors::RewritingError,
    },
}

/// Per-document counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Anchors with an `href` attribute.
    pub anchors: usize,
    /// Anchors classified external.
    pub external: usize,
    /// Anchors that were rewritten.
    pub rewritten: usize,
}

impl std::ops::AddAssign for RewriteStats {
    fn add_assign(&mut self, rhs: Self) {
        self.anchors += rhs.anchors;
        self.external += rhs.external;
        self.rewritten += rhs.rewritten;
    }
}

/// Result of rewriting one document.
#[derive(Debug, Clone)]
pub struct Rewritten {
    /// Rewritten document.
    pub html: String,
    pub stats: RewriteStats,
    /// Snapshots of the rewritten anchors, in document order.
    pub edited: Vec<AnchorRecord>,
}

impl Rewritten {
    fn unchanged(document: &str) -> Self {
        Self {
            html: document.to_string(),
            stats: RewriteStats::default(),
            edited: Vec::new(),
        }
    }

    /// Whether any anchor was rewritten.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.stats.rewritten > 0
    }
}

// =============================================================================
// Rewriter
// =============================================================================

/// Rewrites external anchors of documents under one policy.
#[derive(Debug, Clone, Copy)]
pub struct TargetBlank<'a> {
    policy: &'a LinkPolicy,
}

impl<'a> TargetBlank<'a> {
    pub fn new(policy: &'a LinkPolicy) -> Self {
        Self { policy }
    }

    /// Rewrite a full document or a fragment.
    pub fn rewrite(&self, document: &str) -> Result<Rewritten, RewriteError> {
        if !document.contains(ANCHOR_OPEN) {
            return Ok(Rewritten::unchanged(document));
        }

        let split = DocumentSplit::split(document);
        let (body, stats, edited) = self.rewrite_fragment(split.body_content)?;

        Ok(Rewritten {
            html: split.reassemble(&body),
            stats,
            edited,
        })
    }

    /// Stream a fragment through the anchor handler.
    ///
    /// Only edited start tags are re-serialized; all other bytes pass through.
    fn rewrite_fragment(
        &self,
        fragment: &str,
    ) -> Result<(String, RewriteStats, Vec<AnchorRecord>), RewriteError> {
        let policy = self.policy;
        let mut stats = RewriteStats::default();
        let mut edited = Vec::new();

        let html = rewrite_str(
            fragment,
            RewriteStrSettings {
                element_content_handlers: vec![element!("a[href]", |el| {
                    stats.anchors += 1;

                    let mut record = read_anchor(el);
                    if record.kind(policy).is_external() {
                        stats.external += 1;
                    }

                    if let Some(edit) = record.apply(policy) {
                        write_anchor(el, &edit)?;
                        stats.rewritten += 1;
                        edited.push(record);
                    }
                    Ok(())
                })],
                // Raw-text tags inside <select> are valid markup, not a parse failure
                strict: false,
                ..RewriteStrSettings::new()
            },
        )
        .map_err(|source| RewriteError::Parse {
            len: fragment.len(),
            source,
        })?;

        Ok((html, stats, edited))
    }
}

/// Rewrite external anchors of `document` under `policy`.
///
/// # Example
///
/// ```
/// use target_blank::{LinkPolicy, process};
///
/// let policy = LinkPolicy::new("https://example.com");
/// let html = process(r#"<a href="https://google.com">Google</a>"#, &policy).unwrap();
/// assert_eq!(
///     html,
///     r#"<a href="https://google.com" target="_blank" rel="noopener noreferrer">Google</a>"#
/// );
/// ```
pub fn process(document: &str, policy: &LinkPolicy) -> Result<String, RewriteError> {
    TargetBlank::new(policy).rewrite(document).map(|out| out.html)
}

// =============================================================================
// Element glue
// =============================================================================

fn read_anchor(el: &Element<'_, '_>) -> AnchorRecord {
    let href = el.get_attribute("href").unwrap_or_default();
    let target = el.get_attribute("target");
    let rel = el.get_attribute("rel");
    AnchorRecord::new(&href, el.get_attribute("class"), target.as_deref(), rel.as_deref())
}

/// Existing attributes are replaced in place, new ones appended in the
/// order `target`, `rel`, `class`.
fn write_anchor(
    el: &mut Element<'_, '_>,
    edit: &AnchorEdit,
) -> Result<(), lol_html::errors::AttributeNameError> {
    el.set_attribute("target", edit.target)?;
    if let Some(rel) = &edit.rel {
        el.set_attribute("rel", rel)?;
    }
    if let Some(class) = &edit.class {
        el.set_attribute("class", class)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://keith-mifsud.me";

    fn policy() -> LinkPolicy {
        LinkPolicy::new(SITE)
    }

    fn para(content: &str) -> String {
        format!("<p>{content}</p>")
    }

    fn run(html: &str, policy: &LinkPolicy) -> String {
        process(html, policy).unwrap()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn test_external_link() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &LinkPolicy::new("https://example.com")),
            para(
                r#"Link to <a href="https://google.com" target="_blank" rel="noopener noreferrer">Google</a>."#
            )
        );
    }

    #[test]
    fn test_multiple_external_links() {
        let html = r#"<p>The first link is to <a href="https://google.com">Google</a>, the second to <a href="https://keithmifsud.github.io">my website</a> and <a href="https://github.com">GitHub</a>.</p>"#;
        let expected = r#"<p>The first link is to <a href="https://google.com" target="_blank" rel="noopener noreferrer">Google</a>, the second to <a href="https://keithmifsud.github.io" target="_blank" rel="noopener noreferrer">my website</a> and <a href="https://github.com" target="_blank" rel="noopener noreferrer">GitHub</a>.</p>"#;
        assert_eq!(run(html, &policy()), expected);
    }

    #[test]
    fn test_relative_link_unchanged() {
        let html = para(r#"Link to <a href="/contact">contact page</a>."#);
        assert_eq!(run(&html, &policy()), html);
    }

    #[test]
    fn test_absolute_internal_link_unchanged() {
        let html = r#"<p>This is an absolute internal <a href="https://keith-mifsud.me/contact">link</a>.</p>"#;
        assert_eq!(run(html, &policy()), html);
    }

    #[test]
    fn test_mailto_link_unchanged() {
        let html = para(
            r#"This is a <a href="mailto:mifsud.k@gmail.com?Subject=Just%20an%20email">mailto link</a>."#,
        );
        assert_eq!(run(&html, &policy()), html);
        assert_eq!(
            run(r#"<a href="mailto:a@b.com">mail</a>"#, &policy()),
            r#"<a href="mailto:a@b.com">mail</a>"#
        );
    }

    #[test]
    fn test_non_http_links_unchanged() {
        let html = concat!(
            r##"<a href="#top">top</a> <a href="tel:+123">call</a> "##,
            r#"<a href="//cdn.example.com/x.js">cdn</a> <a href="">empty</a> <a>no href</a>"#
        );
        assert_eq!(run(html, &policy()), html);
    }

    #[test]
    fn test_plain_text_link_unchanged() {
        let html = "<p>This is a plain text link to https://google.com.</p>";
        assert_eq!(run(html, &policy()), html);
    }

    #[test]
    fn test_missing_site_url_makes_absolute_links_external() {
        let html = r#"<a href="https://keith-mifsud.me/contact">x</a>"#;
        assert_eq!(
            run(html, &LinkPolicy::new("")),
            r#"<a href="https://keith-mifsud.me/contact" target="_blank" rel="noopener noreferrer">x</a>"#
        );
    }

    // =========================================================================
    // Rel composition
    // =========================================================================

    #[test]
    fn test_noopener_disabled() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &LinkPolicy::new("https://example.com").with_noopener(false)),
            para(r#"Link to <a href="https://google.com" target="_blank" rel="noreferrer">Google</a>."#)
        );
    }

    #[test]
    fn test_noreferrer_disabled() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &policy().with_noreferrer(false)),
            para(r#"Link to <a href="https://google.com" target="_blank" rel="noopener">Google</a>."#)
        );
    }

    #[test]
    fn test_no_rel_tokens_omits_rel() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &policy().with_noopener(false).with_noreferrer(false)),
            para(r#"Link to <a href="https://google.com" target="_blank">Google</a>."#)
        );
    }

    #[test]
    fn test_extra_rel_tokens() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &policy().with_extra_rel(["nofollow", "tag"])),
            para(
                r#"Link to <a href="https://google.com" target="_blank" rel="noopener noreferrer nofollow tag">Google</a>."#
            )
        );
        assert_eq!(
            run(
                &html,
                &policy()
                    .with_noopener(false)
                    .with_noreferrer(false)
                    .with_extra_rel(["nofollow"])
            ),
            para(r#"Link to <a href="https://google.com" target="_blank" rel="nofollow">Google</a>."#)
        );
    }

    #[test]
    fn test_extra_rel_forces_disabled_default() {
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(
                &html,
                &policy()
                    .with_noopener(false)
                    .with_extra_rel(["noopener", "nofollow"])
            ),
            para(
                r#"Link to <a href="https://google.com" target="_blank" rel="noreferrer noopener nofollow">Google</a>."#
            )
        );
    }

    #[test]
    fn test_existing_rel_is_overwritten() {
        let html = r#"<a href="https://google.com" rel="author">G</a>"#;
        assert_eq!(
            run(html, &policy()),
            r#"<a href="https://google.com" rel="noopener noreferrer" target="_blank">G</a>"#
        );
    }

    // =========================================================================
    // Class filter and class addition
    // =========================================================================

    #[test]
    fn test_required_class_missing() {
        let policy = LinkPolicy::new("https://example.com").with_required_class(Some("ext-link"));
        let html = r#"<a href="https://google.com" class="x">Google</a>"#;
        assert_eq!(run(html, &policy), html);

        let html = para(r#"<a href="https://google.com" class="random-class another-random-class">Link</a>."#);
        assert_eq!(run(&html, &policy), html);

        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(run(&html, &policy), html);
    }

    #[test]
    fn test_required_class_present() {
        let policy = policy().with_required_class(Some("ext-link"));

        assert_eq!(
            run(r#"<a href="https://google.com" class="x ext-link">Google</a>"#, &policy),
            r#"<a href="https://google.com" class="x ext-link" target="_blank" rel="noopener noreferrer">Google</a>"#
        );

        let html = para(
            r#"This is <a href="https://not-keith-mifsud.me" class="random-class ext-link another-random-class">a link</a>."#,
        );
        assert_eq!(
            run(&html, &policy),
            para(
                r#"This is <a href="https://not-keith-mifsud.me" class="random-class ext-link another-random-class" target="_blank" rel="noopener noreferrer">a link</a>."#
            )
        );
    }

    #[test]
    fn test_required_class_still_skips_internal() {
        let policy = policy().with_required_class(Some("ext-link"));
        let html = r#"<a href="/about" class="ext-link">About</a>"#;
        assert_eq!(run(html, &policy), html);
    }

    #[test]
    fn test_add_class_to_existing() {
        let policy = LinkPolicy::new("https://example.com").with_added_classes(["tag"]);
        assert_eq!(
            run(r#"<a href="https://google.com" class="x">G</a>"#, &policy),
            r#"<a href="https://google.com" class="tag x" target="_blank" rel="noopener noreferrer">G</a>"#
        );
    }

    #[test]
    fn test_add_class_without_existing() {
        let policy = policy().with_added_classes(["some-class"]);
        let html = para(r#"Link to <a href="https://google.com">Google</a>."#);
        assert_eq!(
            run(&html, &policy),
            para(
                r#"Link to <a href="https://google.com" target="_blank" rel="noopener noreferrer" class="some-class">Google</a>."#
            )
        );
    }

    #[test]
    fn test_add_multiple_classes() {
        let policy =
            policy().with_added_classes(["some-class", "other-some-class", "another-some-class"]);
        let html = para(r#"<a href="https://google.com" class="ext-link">Link</a>."#);
        assert_eq!(
            run(&html, &policy),
            para(
                r#"<a href="https://google.com" class="some-class other-some-class another-some-class ext-link" target="_blank" rel="noopener noreferrer">Link</a>."#
            )
        );
    }

    #[test]
    fn test_add_class_not_applied_to_internal() {
        let policy = policy().with_added_classes(["tag"]);
        let html = r#"<a href="/contact" class="x">c</a>"#;
        assert_eq!(run(html, &policy), html);
    }

    // =========================================================================
    // Idempotence
    // =========================================================================

    #[test]
    fn test_second_pass_is_stable() {
        let policy = policy().with_extra_rel(["nofollow"]);
        let html = r#"<p><a href="https://google.com">G</a> <a href="/x">x</a></p>"#;
        let once = run(html, &policy);
        let twice = run(&once, &policy);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("nofollow").count(), 1);
    }

    #[test]
    fn test_second_pass_repeats_class_addition() {
        let policy = policy().with_added_classes(["tag"]);
        let once = run(r#"<a href="https://google.com">G</a>"#, &policy);
        let twice = run(&once, &policy);
        assert!(twice.contains(r#"class="tag tag""#));
    }

    // =========================================================================
    // Markup preservation
    // =========================================================================

    #[test]
    fn test_no_anchor_fast_exit() {
        let html = "<div>https://google.com</div>";
        let out = TargetBlank::new(&policy()).rewrite(html).unwrap();
        assert_eq!(out.html, html);
        assert_eq!(out.stats, RewriteStats::default());
        assert!(!out.is_changed());
    }

    #[test]
    fn test_code_block_untouched() {
        let html = concat!(
            "<div class=\"highlight\"><pre class=\"highlight\"><code>",
            "<span class=\"nb\">puts</span> <span class=\"s1\">'https://google.com'</span>\n",
            "<span class=\"s\">&lt;a href=\"https://google.com\"&gt;x&lt;/a&gt;</span>",
            "</code></pre></div>\n",
            "<p>Valid <a href=\"https://google.com\">link</a></p>"
        );
        let out = run(html, &policy());
        assert!(out.contains("<span class=\"s1\">'https://google.com'</span>"));
        assert!(out.contains("&lt;a href=\"https://google.com\"&gt;x&lt;/a&gt;"));
        assert!(out.contains(
            r#"<p>Valid <a href="https://google.com" target="_blank" rel="noopener noreferrer">link</a></p>"#
        ));
    }

    #[test]
    fn test_script_and_comment_untouched() {
        let html = concat!(
            "<script>document.write('<a href=\"https://google.com\">x</a>');</script>",
            "<!-- <a href=\"https://google.com\">old</a> -->",
            "<style>a[href^=\"http\"] { color: red; }</style>"
        );
        assert_eq!(run(html, &policy()), html);
    }

    #[test]
    fn test_template_leftovers_untouched() {
        let html = r#"<p>{% raw %}{{ page.url }}{% endraw %} <a href="https://google.com">G</a></p>"#;
        assert_eq!(
            run(html, &policy()),
            r#"<p>{% raw %}{{ page.url }}{% endraw %} <a href="https://google.com" target="_blank" rel="noopener noreferrer">G</a></p>"#
        );
    }

    #[test]
    fn test_fragment_gets_no_wrapper() {
        let out = run(r#"<a href="https://google.com">G</a>"#, &policy());
        assert!(!out.contains("<html"));
        assert!(!out.contains("<body"));
    }

    #[test]
    fn test_document_shell_preserved() {
        let head = "<!DOCTYPE HTML>\n<html lang=\"en-US\">\n<head>\n    <meta charset=\"UTF-8\">\n    <link rel=\"stylesheet\" href=\"https://fonts.example.net/css\">\n    <a href=\"https://google.com\">in head</a>\n</head>\n";
        let tail = "</body>\n<a href=\"https://google.com\">after body</a>\n</html>\n";
        let document = format!(
            "{head}<body class=\"wrap\">\n    <div>Layout content started.</div>\n<p>Link to <a href=\"https://google.com\">Google</a>.</p>\n\n    <div>Layout content ended.</div>\n{tail}"
        );

        let out = run(&document, &policy());
        assert!(out.starts_with(head));
        assert!(out.ends_with(tail));
        assert_eq!(
            out,
            format!(
                "{head}<body class=\"wrap\">\n    <div>Layout content started.</div>\n<p>Link to <a href=\"https://google.com\" target=\"_blank\" rel=\"noopener noreferrer\">Google</a>.</p>\n\n    <div>Layout content ended.</div>\n{tail}"
            )
        );
    }

    #[test]
    fn test_layout_page() {
        let document = "<!DOCTYPE HTML>\n<html lang=\"en-US\">\n<head>\n    <meta charset=\"UTF-8\">\n    <title>Post with external markdown link</title>\n</head>\n<body class=\"wrap\">\n    <div>Layout content started.</div>\n<p>Link to <a href=\"https://google.com\">Google</a>.</p>\n\n    <div>Layout content ended.</div>\n</body>\n</html>\n";
        let out = run(document, &policy());
        assert!(out.contains("<html lang=\"en-US\">"));
        assert!(out.contains("<body class=\"wrap\">"));
        assert!(out.contains("<div>Layout content started.</div>"));
        assert!(out.contains("<div>Layout content ended.</div>"));
        assert_eq!(out.matches("Layout content started.").count(), 1);
        assert!(out.contains(
            r#"<p>Link to <a href="https://google.com" target="_blank" rel="noopener noreferrer">Google</a>.</p>"#
        ));
    }

    #[test]
    fn test_unrelated_markup_untouched() {
        let html = "<ul>\n  <li><img src=\"/a.png\" alt='x'><br>\n  <a  class=site-title href=\"/\" >Home</a></li>\n</ul>";
        assert_eq!(run(html, &policy()), html);
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    #[test]
    fn test_stats_and_edited_anchors() {
        let html = concat!(
            r#"<a href="https://google.com">1</a>"#,
            r#"<a href="https://github.com" class="ext-link">2</a>"#,
            r#"<a href="/local">3</a>"#,
            r#"<a href="mailto:a@b.com">4</a>"#
        );
        let policy = policy().with_required_class(Some("ext-link"));
        let out = TargetBlank::new(&policy).rewrite(html).unwrap();

        assert_eq!(
            out.stats,
            RewriteStats {
                anchors: 4,
                external: 2,
                rewritten: 1,
            }
        );
        assert!(out.is_changed());
        assert_eq!(out.edited.len(), 1);
        assert_eq!(out.edited[0].href, "https://github.com");
        assert!(out.edited[0].target_set);
    }

    #[test]
    fn test_raw_text_inside_select_is_not_an_error() {
        let rewritten = r#"<p><a href="https://google.com" target="_blank" rel="noopener noreferrer">G</a></p>"#;
        for tail in [
            "<select><xmp>x</xmp></select>",
            "<select><template><style>o{}</style></template></select>",
            "<select><textarea>t</textarea></select>",
        ] {
            let html = format!(r#"<p><a href="https://google.com">G</a></p>{tail}"#);
            assert_eq!(run(&html, &policy()), format!("{rewritten}{tail}"), "{tail}");
        }
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = RewriteStats::default();
        total += RewriteStats {
            anchors: 3,
            external: 2,
            rewritten: 1,
        };
        total += RewriteStats {
            anchors: 1,
            external: 1,
            rewritten: 1,
        };
        assert_eq!(
            total,
            RewriteStats {
                anchors: 4,
                external: 3,
                rewritten: 2,
            }
        );
    }
}
