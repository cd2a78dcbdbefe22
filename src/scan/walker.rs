use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::SourceEntry;

/// Files found under a root, plus the ones that could not be read.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub entries: Vec<SourceEntry>,
    pub errors: Vec<String>,
}

/// Collect every shader source under `root`, sorted by relative path.
///
/// The logical name of a file is its file name; paths are reported relative
/// to `root`.
pub fn scan_sources(root: &Path, config: &Config) -> Result<ScanResult> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .require_git(false)
        .build();

    let mut paths: Vec<PathBuf> = Vec::new();
    for dent in walker {
        let dent = dent.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = dent.into_path();
        if is_source_file(&path, config) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut result = ScanResult::default();
    for path in paths {
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %relative, "scanned source");
                result.entries.push(SourceEntry::new(name, relative, text));
            }
            Err(e) => {
                warn!(path = %relative, "skipping unreadable source: {}", e);
                result.errors.push(format!("{}: {}", relative, e));
            }
        }
    }

    Ok(result)
}

fn is_source_file(path: &Path, config: &Config) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.source_extensions.iter().any(|e| e == ext))
}
