//! Input selection for `rewrite` and `check`.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use jwalk::WalkDir;

use crate::page::OutputPage;

/// Path argument meaning "standard input".
const STDIN_PATH: &str = "-";

/// Where a run reads its documents from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A single document on stdin, written back to stdout.
    Stdin,
    /// Eligible files, sorted.
    Files(Vec<PathBuf>),
}

impl Input {
    /// Resolve CLI paths against the output directory.
    ///
    /// No paths means the whole output directory. Relative paths that do not
    /// exist from the cwd are retried relative to the output directory.
    pub fn from_paths(paths: &[PathBuf], output_dir: &Path) -> Result<Self> {
        if paths.iter().any(|p| p.as_os_str() == STDIN_PATH) {
            if paths.len() > 1 {
                bail!("`{STDIN_PATH}` cannot be combined with other paths");
            }
            return Ok(Self::Stdin);
        }

        if paths.is_empty() {
            if !output_dir.is_dir() {
                bail!("Output directory not found: {}", output_dir.display());
            }
            return Ok(Self::Files(collect_html_files(output_dir)));
        }

        let mut files = Vec::new();
        for path in paths {
            let resolved = resolve_path(path, output_dir);

            if resolved.is_file() {
                let root = resolved.parent().unwrap_or(Path::new(""));
                if !OutputPage::from_output_file(root, &resolved).is_processable() {
                    bail!("Not an HTML page: {}", path.display());
                }
                files.push(resolved);
            } else if resolved.is_dir() {
                files.extend(collect_html_files(&resolved));
            } else {
                bail!(
                    "Path not found: {}\n  Tried:\n    - {}\n    - {}",
                    path.display(),
                    path.display(),
                    output_dir.join(path).display()
                );
            }
        }

        files.sort();
        files.dedup();
        Ok(Self::Files(files))
    }
}

/// Recursively collect the processable pages under `dir`, sorted.
pub fn collect_html_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| OutputPage::from_output_file(dir, path).is_processable())
        .collect()
}

fn resolve_path(path: &Path, output_dir: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    let in_output = output_dir.join(path);
    if in_output.exists() {
        in_output
    } else {
        path.to_path_buf()
    }
}
