use crate::registry::SourceRegistry;

/// Markdown report of what each fragment requires and what requires it.
pub fn generate_dependencies(registry: &SourceRegistry) -> String {
    let mut output = String::new();

    output.push_str("# dependencies.md\n\n");
    output.push_str("Shader fragment dependency graph, in build order.\n\n");

    if registry
        .fragments()
        .all(|f| f.dependencies().is_empty() && f.is_resolved())
    {
        output.push_str("*No require relationships detected.*\n");
        return output;
    }

    let mut fragments: Vec<_> = registry.fragments().collect();
    fragments.sort_by(|a, b| a.name().cmp(b.name()));

    for fragment in fragments {
        let requires = registry.dependency_names(fragment.name()).unwrap_or_default();
        let mut required_by: Vec<&str> = registry
            .fragments()
            .filter(|other| other.dependencies().contains(&fragment.id()))
            .map(|other| other.name())
            .collect();
        required_by.sort();

        if requires.is_empty() && required_by.is_empty() && fragment.is_resolved() {
            continue;
        }

        output.push_str(&format!("## `{}`\n\n", fragment.name()));

        if !fragment.is_resolved() {
            output.push_str("**Status:** unresolved\n\n");
        }

        if !requires.is_empty() {
            output.push_str("**Requires:** ");
            output.push_str(&requires.join(", "));
            output.push_str("\n\n");
        } else {
            output.push_str("**Requires:** (none)\n\n");
        }

        if !required_by.is_empty() {
            output.push_str("**Required by:** ");
            output.push_str(&required_by.join(", "));
            output.push_str("\n\n");
        } else {
            output.push_str("**Required by:** (none - entry point)\n\n");
        }

        output.push_str("---\n\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::SourceEntry;

    fn registry(entries: &[(&str, &str)]) -> SourceRegistry {
        SourceRegistry::build(
            entries
                .iter()
                .map(|(name, text)| SourceEntry::new(*name, *name, *text)),
            &Config::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_requires() {
        let registry = registry(&[("a.glsl", "void a() {}")]);
        let result = generate_dependencies(&registry);
        assert!(result.contains("No require relationships detected"));
    }

    #[test]
    fn test_requires_and_required_by() {
        let registry = registry(&[
            ("main.glsl", "#pragma BLENDER_REQUIRE(lib.glsl)\n"),
            ("lib.glsl", "#pragma BLENDER_REQUIRE(types.h)\n"),
            ("types.h", ""),
        ]);
        let result = generate_dependencies(&registry);
        assert!(result.contains("## `main.glsl`"));
        assert!(result.contains("**Requires:** types.h, lib.glsl"));
        assert!(result.contains("**Required by:** lib.glsl, main.glsl"));
        assert!(result.contains("(none - entry point)"));
    }

    #[test]
    fn test_unresolved_fragment_is_marked() {
        let registry = registry(&[
            ("a.glsl", "#pragma BLENDER_REQUIRE(b.glsl)\n"),
            ("b.glsl", "#pragma BLENDER_REQUIRE(missing.glsl)\n"),
        ]);
        let result = generate_dependencies(&registry);
        assert!(result.contains("**Status:** unresolved"));
    }
}
