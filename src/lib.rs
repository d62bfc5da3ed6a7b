//! Open external links of rendered HTML in a new browsing context.
//!
//! Every `<a href>` in the document body whose target is an absolute
//! http(s) URL on a host other than the site's own gets `target="_blank"`,
//! a configurable `rel` (by default `noopener noreferrer`) and, optionally,
//! extra CSS classes. Everything else is left byte-for-byte untouched.
//!
//! ```
//! use target_blank::{LinkPolicy, process};
//!
//! let policy = LinkPolicy::new("https://example.com").with_extra_rel(["nofollow"]);
//! let html = process(r#"<p><a href="https://example.com/about">About</a></p>"#, &policy).unwrap();
//! assert_eq!(html, r#"<p><a href="https://example.com/about">About</a></p>"#);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod logger;
pub mod page;
pub mod pipeline;
pub mod utils;

pub use crate::core::{LinkKind, LinkPolicy};
pub use page::{OutputPage, PageKind};
pub use pipeline::{
    AnchorRecord, DocumentSplit, RewriteError, RewriteStats, Rewritten, TargetBlank, process,
};
