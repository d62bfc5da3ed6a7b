//! `rewrite` and `check` commands.
//!
//! Both walk the same eligible files and run them through the same
//! [`TargetBlank`] rewriter in parallel; `check` and `--dry-run` simply never
//! write. Per-file failures are reported and the run continues, failing at
//! the end.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use super::collect::Input;
use crate::config::SiteConfig;
use crate::core::LinkPolicy;
use crate::logger::ProgressLine;
use crate::pipeline::{RewriteStats, TargetBlank};
use crate::utils::plural_count;
use crate::{debug, log};

/// What to do with a rewritten file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write changed files back.
    Write,
    /// Rewrite in memory only.
    DryRun,
    /// Rewrite in memory and list the edited links.
    Check,
}

impl Mode {
    const fn label(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Write | Self::DryRun => "rewrite",
        }
    }

    const fn writes(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Result of processing one file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub stats: RewriteStats,
    /// Content differs from what is on disk.
    pub changed: bool,
    /// `href` of every rewritten anchor, in document order.
    pub edited: Vec<String>,
}

/// Totals of a batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: usize,
    pub changed: usize,
    pub failed: usize,
    pub stats: RewriteStats,
}

// =============================================================================
// Entry
// =============================================================================

/// Run `rewrite`/`check` over the inputs selected by `paths`.
pub fn run(config: &SiteConfig, paths: &[PathBuf], mode: Mode) -> Result<()> {
    let policy = config
        .policy()
        .context("invalid [target-blank] configuration")?;

    match policy.site_host() {
        Some(host) => debug!(mode.label(); "internal host: {}", host),
        None => debug!(mode.label(); "no site url, every absolute http(s) link is external"),
    }

    match Input::from_paths(paths, &config.output_dir())? {
        Input::Stdin => {
            if mode == Mode::Check {
                bail!("reading from stdin is only supported by `rewrite`");
            }
            filter_stdin(&policy)
        }
        Input::Files(files) => {
            let summary = run_files(config, &files, &policy, mode);
            if summary.failed > 0 {
                bail!("{} could not be processed", plural_count(summary.failed, "file"));
            }
            Ok(())
        }
    }
}

/// Rewrite one document from stdin to stdout.
fn filter_stdin(policy: &LinkPolicy) -> Result<()> {
    let mut document = String::new();
    io::stdin()
        .read_to_string(&mut document)
        .context("failed to read stdin")?;

    let rewritten = TargetBlank::new(policy).rewrite(&document)?;
    debug!("rewrite"; "stdin: {}", plural_count(rewritten.stats.rewritten, "link"));

    let mut out = io::stdout().lock();
    out.write_all(rewritten.html.as_bytes())
        .context("failed to write stdout")?;
    out.flush()?;
    Ok(())
}

// =============================================================================
// Batch
// =============================================================================

/// Process files in parallel, log per-file results and the summary line.
fn run_files(config: &SiteConfig, files: &[PathBuf], policy: &LinkPolicy, mode: Mode) -> RunSummary {
    let label = mode.label();
    let mut summary = RunSummary::default();

    if files.is_empty() {
        log!(label; "no html files found");
        return summary;
    }

    log!(label; "{}", plural_count(files.len(), "file"));

    let rewriter = TargetBlank::new(policy);
    let progress = ProgressLine::new(label, "html", files.len());

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = process_file(&rewriter, path, mode);
            progress.inc();
            (path, result)
        })
        .collect();

    progress.finish();

    for (path, result) in results {
        let display = config.root_relative(path);
        summary.files += 1;

        match result {
            Ok(outcome) => {
                if mode == Mode::Check {
                    for href in &outcome.edited {
                        println!("{}: {}", display.display(), href);
                    }
                } else if outcome.changed {
                    debug!(label; "{}: {}", display.display(), plural_count(outcome.stats.rewritten, "link"));
                }
                summary.changed += usize::from(outcome.changed);
                summary.stats += outcome.stats;
            }
            Err(err) => {
                summary.failed += 1;
                log!("error"; "{}: {:#}", display.display(), err);
            }
        }
    }

    log_summary(&summary, mode);
    summary
}

/// Rewrite one file, writing it back only if `mode` allows and it changed.
pub fn process_file(rewriter: &TargetBlank<'_>, path: &Path, mode: Mode) -> Result<FileOutcome> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let rewritten = rewriter.rewrite(&content)?;
    let changed = rewritten.html != content;

    if changed && mode.writes() {
        fs::write(path, &rewritten.html)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(FileOutcome {
        stats: rewritten.stats,
        changed,
        edited: rewritten.edited.into_iter().map(|a| a.href).collect(),
    })
}

fn log_summary(summary: &RunSummary, mode: Mode) {
    let verb = match mode {
        Mode::Write => "changed",
        Mode::DryRun | Mode::Check => "would change",
    };
    log!(
        "done";
        "{} scanned, {} {}, {} of {} external rewritten",
        plural_count(summary.files, "file"),
        plural_count(summary.changed, "file"),
        verb,
        plural_count(summary.stats.rewritten, "link"),
        summary.stats.external
    );
}
