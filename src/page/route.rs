//! Output page description and the processing gate.

use std::path::Path;

use super::PageKind;

/// The only output extension whose body is rewritten.
const HTML_EXT: &str = ".html";

/// Index file mapped to its directory permalink.
const INDEX_FILE: &str = "index.html";

/// A rendered page, as seen by the post-processor.
///
/// # Example
///
/// ```text
/// public/index.html          -> permalink: /            output_ext: .html
/// public/posts/hello/index.html -> permalink: /posts/hello/
/// public/about.html          -> permalink: /about.html
/// public/feed.xml            -> permalink: /feed.xml     output_ext: .xml
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPage {
    pub kind: PageKind,
    /// Output extension including the dot (e.g., `.html`), empty if none.
    pub output_ext: String,
    /// URL path of the page, if known.
    pub permalink: Option<String>,
}

impl OutputPage {
    pub fn new(kind: PageKind, output_ext: impl Into<String>, permalink: Option<String>) -> Self {
        Self {
            kind,
            output_ext: output_ext.into(),
            permalink,
        }
    }

    /// Describe a file found under the output directory `root`.
    pub fn from_output_file(root: &Path, path: &Path) -> Self {
        let output_ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let permalink = match rel.strip_suffix(INDEX_FILE) {
            Some(dir) if dir.is_empty() || dir.ends_with('/') => format!("/{dir}"),
            _ => format!("/{rel}"),
        };

        Self::new(PageKind::Page, output_ext, Some(permalink))
    }

    /// Whether the page's output should be rewritten.
    ///
    /// A written page with an `.html` output, or any page whose permalink
    /// ends in `/` (pretty URLs served as `index.html`).
    pub fn is_processable(&self) -> bool {
        (self.kind.is_written() && self.output_ext == HTML_EXT)
            || self.permalink.as_deref().is_some_and(|p| p.ends_with('/'))
    }
}
