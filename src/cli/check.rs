use console::{style, Emoji};

use super::{print_diagnostic, LoadedSources};

static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");
static ERROR: Emoji<'_, '_> = Emoji("❌ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "");

/// Print every diagnostic and a summary. Returns `false` when anything failed.
pub fn run_check(sources: &LoadedSources) -> bool {
    let registry = &sources.registry;
    let resolved = registry.fragments().filter(|f| f.is_resolved()).count();
    let rewritten = registry
        .fragments()
        .filter(|f| f.rewritten_text().is_some())
        .count();

    println!("{}Shader sources:\n", INFO);
    println!("  Fragments:       {}", style(registry.len()).green());
    println!("  Resolved:        {}", style(resolved).green());
    println!("  Enums rewritten: {}", style(rewritten).cyan());
    println!("  Functions:       {}", style(registry.functions().len()).cyan());

    if !sources.unreadable.is_empty() {
        println!("\n{}Unreadable files ({}):", ERROR, sources.unreadable.len());
        for error in &sources.unreadable {
            println!("  - {}", style(error).red());
        }
    }

    if !registry.diagnostics().is_empty() {
        println!();
        for diagnostic in registry.diagnostics() {
            print_diagnostic(diagnostic);
            println!();
        }
    }

    let errors = registry.error_count() + sources.unreadable.len();
    if errors == 0 {
        println!("\n{}No errors found", SUCCESS);
        true
    } else {
        println!("{}{} error(s) found", ERROR, style(errors).red().bold());
        false
    }
}
