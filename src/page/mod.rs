//! Page types: output kind and the processing gate.

mod kind;
mod route;

pub use kind::PageKind;
pub use route::OutputPage;
