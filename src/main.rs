//! target-blank - open external links of a built site in a new tab.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use target_blank::cli::{self, Cli};
use target_blank::config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;
    cli::execute(&cli, &config)
}
