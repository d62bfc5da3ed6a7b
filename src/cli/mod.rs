//! Command-line interface module.

mod args;
pub mod collect;
pub mod run;

pub use args::{Cli, Commands, RunArgs};

use anyhow::Result;

use crate::config::SiteConfig;
use run::Mode;

/// Dispatch the parsed command.
pub fn execute(cli: &Cli, config: &SiteConfig) -> Result<()> {
    let mode = match &cli.command {
        Commands::Rewrite { dry_run: true, .. } => Mode::DryRun,
        Commands::Rewrite { .. } => Mode::Write,
        Commands::Check { .. } => Mode::Check,
    };
    run::run(config, &cli.run_args().paths, mode)
}
