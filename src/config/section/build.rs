//! `[build]` configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Built site directory (relative to the project root).
    pub output: PathBuf,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: "public".into(),
        }
    }
}
