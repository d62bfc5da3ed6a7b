//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Open external links of a built site in a new tab
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: search upward for target-blank.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add target="_blank" and rel to external links, in place
    #[command(visible_alias = "r")]
    Rewrite {
        #[command(flatten)]
        args: RunArgs,

        /// Report what would change without writing any file
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List the links that `rewrite` would change
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: RunArgs,
    },
}

/// Arguments shared by `rewrite` and `check`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Files or directories to process. If omitted, processes the output
    /// directory. Use `-` to filter a single document from stdin to stdout.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Override the site URL used to tell internal links from external ones.
    ///
    /// Useful when the same output is deployed under several hosts, without
    /// touching target-blank.toml:
    ///   target-blank rewrite --site-url "https://staging.example.com"
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Arguments of whichever command is running.
    pub fn run_args(&self) -> &RunArgs {
        match &self.command {
            Commands::Rewrite { args, .. } | Commands::Check { args } => args,
        }
    }

    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }

    pub const fn is_dry_run(&self) -> bool {
        matches!(self.command, Commands::Rewrite { dry_run: true, .. })
    }
}
