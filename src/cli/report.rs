use anyhow::{Context, Result};
use console::{style, Emoji};
use std::fs;
use std::path::Path;

use crate::emit::JsonOutput;
use crate::generate::generate_dependencies;
use crate::registry::SourceRegistry;

static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static FILE: Emoji<'_, '_> = Emoji("📄 ", "");

pub fn run_functions(registry: &SourceRegistry, path: &Path, json: bool) -> Result<()> {
    let output = JsonOutput::from_registry(&path.display().to_string(), registry);

    if json {
        println!("{}", serde_json::to_string_pretty(&output.functions)?);
        return Ok(());
    }

    if output.functions.is_empty() {
        println!("No exported library functions found");
        return Ok(());
    }

    for function in &output.functions {
        println!(
            "{}{} {}",
            FILE,
            style(&function.signature).green(),
            style(format!("({})", function.location)).dim()
        );
    }
    Ok(())
}

pub fn run_graph(
    registry: &SourceRegistry,
    path: &Path,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let content = if json {
        JsonOutput::from_registry(&path.display().to_string(), registry).to_json()
    } else {
        generate_dependencies(registry)
    };

    match output {
        Some(file) => {
            fs::write(file, &content)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("{}Wrote {}", SUCCESS, style(file.display()).green());
        }
        None => println!("{}", content),
    }
    Ok(())
}
