//! Document shell splitting (head / body / tail).
//!
//! The split is a pattern search, not a document parse: everything outside
//! the body region is handed back byte-for-byte, whatever it contains.

use std::sync::LazyLock;

use regex::Regex;

/// Literal that decides between document mode and fragment mode.
const BODY_START_TAG: &str = "<body";
const BODY_END_TAG: &str = "</body>";

/// First `<body ...>` opening tag plus the whitespace that follows it.
static OPENING_BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<body([^>]*)>\s*").expect("valid body tag pattern"));

/// A document cut around its body region.
///
/// `head + body_open_tag + body_content + tail` always reproduces the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSplit<'a> {
    pub head: &'a str,
    pub body_open_tag: &'a str,
    pub body_content: &'a str,
    pub tail: &'a str,
}

impl<'a> DocumentSplit<'a> {
    /// Split a document at its first `<body>` tag and the first `</body>` after it.
    ///
    /// Input without a complete `<body` opening tag is a fragment: all of it
    /// becomes `body_content`.
    pub fn split(document: &'a str) -> Self {
        if !document.contains(BODY_START_TAG) {
            return Self::fragment(document);
        }

        let Some(opener) = OPENING_BODY_TAG.find(document) else {
            return Self::fragment(document);
        };

        let head = &document[..opener.start()];
        let body_open_tag = opener.as_str();
        let rest = &document[opener.end()..];

        let (body_content, tail) = match rest.find(BODY_END_TAG) {
            Some(end) => rest.split_at(end),
            None => (rest, ""),
        };

        Self {
            head,
            body_open_tag,
            body_content,
            tail,
        }
    }

    fn fragment(document: &'a str) -> Self {
        Self {
            head: "",
            body_open_tag: "",
            body_content: document,
            tail: "",
        }
    }

    /// Whether a body region was found (document mode).
    #[inline]
    pub fn has_body(&self) -> bool {
        !self.body_open_tag.is_empty()
    }

    /// Put a processed body back into the original shell.
    pub fn reassemble(&self, processed_body: &str) -> String {
        if !self.has_body() {
            return processed_body.to_string();
        }

        let mut out = String::with_capacity(
            self.head.len() + self.body_open_tag.len() + processed_body.len() + self.tail.len(),
        );
        out.push_str(self.head);
        out.push_str(self.body_open_tag);
        out.push_str(processed_body);
        out.push_str(self.tail);
        out
    }
}
