//! Site configuration management for `target-blank.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── site       # [site]
//! │   └── target_blank # [target-blank] rule table → LinkPolicy
//! ├── types/         # ConfigError
//! ├── util.rs        # Config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"
//!
//! [build]
//! output = "public"
//!
//! [target-blank]
//! css_class = "ext-link"
//! add_css_classes = "external"
//! noopener = true
//! noreferrer = true
//! rel = "nofollow"
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{BuildSectionConfig, SiteSectionConfig, TargetBlankConfig};

// Re-export from types/
pub use types::ConfigError;

use crate::{
    cli::{Cli, Commands, RunArgs},
    core::LinkPolicy,
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file searched for when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "target-blank.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing target-blank.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// Site settings (url)
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Build settings (output directory)
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Link rewrite rules
    #[serde(default, rename = "target-blank")]
    pub target_blank: TargetBlankConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Without `--config`, searches upward from cwd for `target-blank.toml`;
    /// a missing file means all defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match &cli.config {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                };
                if !path.exists() {
                    bail!("Config file '{}' not found", path.display());
                }
                Some(path)
            }
            None => find_config_file(Path::new(DEFAULT_CONFIG)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);

        config.config_path = config_path.unwrap_or_default();
        config.root = root;
        config.apply_command_options(cli);
        config.warn_unusable_fields();

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Warn about values that are accepted but have no effect.
    fn warn_unusable_fields(&self) {
        let unknown = self.target_blank.unknown_keys();
        if !unknown.is_empty() {
            log!("warning"; "unknown link rules, ignoring:");
            for field in &unknown {
                eprintln!("- {}", field);
            }
        }

        if let Some(message) = self.site.url_warning() {
            log!("warning"; "{}", message);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Rewrite { args, .. } | Commands::Check { args } => {
                self.apply_run_args(args);
            }
        }
    }

    /// Apply shared run arguments from CLI.
    fn apply_run_args(&mut self, args: &RunArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        // Override site URL if provided via CLI
        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root_join(&self.build.output)
    }

    /// Resolve the `[target-blank]` rules into the policy for this run.
    pub fn policy(&self) -> Result<LinkPolicy, ConfigError> {
        self.target_blank.resolve(self.site.url.as_deref())
    }
}

// ============================================================================
// tests
// ============================================================================
