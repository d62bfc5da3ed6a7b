//! Core types - pure abstractions shared across the codebase.

mod link;
mod policy;
mod url;

pub use link::LinkKind;
pub use policy::LinkPolicy;
pub use self::url::{host_of, is_absolute_http};
