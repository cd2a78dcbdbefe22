mod args;
mod check;
mod report;
mod resolve;

pub use args::{Args, Command};
pub use check::run_check;
pub use report::{run_functions, run_graph};
pub use resolve::{run_builtins, run_resolve};

use anyhow::{Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::Config;
use crate::error::Diagnostic;
use crate::registry::SourceRegistry;
use crate::scan::scan_sources;

static SCANNING: Emoji<'_, '_> = Emoji("🔍 ", "");

/// A registry built from a directory, plus the files that could not be read.
pub struct LoadedSources {
    pub registry: SourceRegistry,
    pub unreadable: Vec<String>,
}

pub fn load_sources(path: &Path, config: &Config) -> Result<LoadedSources> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("{}Scanning {}...", SCANNING, path.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let scan = scan_sources(path, config)?;
    let registry = SourceRegistry::build(scan.entries, config)
        .with_context(|| format!("Failed to register sources in {}", path.display()))?;

    pb.finish_and_clear();

    Ok(LoadedSources {
        registry,
        unreadable: scan.errors,
    })
}

pub(crate) fn print_diagnostic(diagnostic: &Diagnostic) {
    println!(
        "{} {} {}",
        style(&diagnostic.location).bold(),
        style("error:").red().bold(),
        diagnostic.error
    );
    println!(
        "{} {}",
        style(format!("{:>5} |", diagnostic.location.line)).blue(),
        diagnostic.source_line
    );
    println!(
        "{} {}",
        style("      |").blue(),
        style(format!("{}^", diagnostic.caret_padding())).red().bold()
    );
}
