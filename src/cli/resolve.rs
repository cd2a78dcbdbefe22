use anyhow::Result;

use crate::analyze::builtin_keywords;
use crate::registry::SourceRegistry;

/// Print the build sequence of `name`, each block preceded by a source marker.
pub fn run_resolve(registry: &SourceRegistry, name: &str, list: bool) -> Result<()> {
    let sequence = registry.resolve_build_sequence(name)?;
    let mut names = registry.dependency_names(name).unwrap_or_default();
    names.push(name);

    for (owner, text) in names.into_iter().zip(sequence) {
        if list {
            println!("{}", owner);
            continue;
        }
        println!("// source: {}", owner);
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

pub fn run_builtins(registry: &SourceRegistry, name: &str) -> Result<()> {
    if registry.fragment(name).is_none() {
        anyhow::bail!("Could not find \"{}\" in the list of registered sources", name);
    }

    let keywords = builtin_keywords(registry.lookup_builtin_flags(name));
    if keywords.is_empty() {
        println!("(none)");
    }
    for keyword in keywords {
        println!("{}", keyword);
    }
    Ok(())
}
