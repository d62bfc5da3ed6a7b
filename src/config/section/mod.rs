//! Configuration section definitions.
//!
//! Each module corresponds to a section in `target-blank.toml`:
//!
//! | Module         | TOML Section     | Purpose                        |
//! |----------------|------------------|--------------------------------|
//! | `build`        | `[build]`        | Output directory               |
//! | `site`         | `[site]`         | Site URL                       |
//! | `target_blank` | `[target-blank]` | Link rewrite rules             |

mod build;
mod site;
pub mod target_blank;

// Re-export section configs
pub use build::BuildSectionConfig;
pub use site::SiteSectionConfig;
pub use target_blank::TargetBlankConfig;
