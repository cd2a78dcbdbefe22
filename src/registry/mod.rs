//! The source registry: every named fragment, its rewritten text, builtins,
//! resolved dependencies and the library function table.

mod fragment;
mod functions;
mod resolve;
pub mod session;

pub use fragment::{Fragment, ResolveState};
pub use functions::FunctionTable;

use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::analyze::BuiltinBits;
use crate::config::Config;
use crate::error::{Diagnostic, RegistryError};
use crate::types::{FragmentId, FunctionSignature, SourceEntry};
use resolve::Resolver;

/// Immutable once built; safe to share across threads.
#[derive(Debug)]
pub struct SourceRegistry {
    fragments: Vec<Fragment>,
    by_name: HashMap<String, FragmentId>,
    functions: FunctionTable,
    diagnostics: Vec<Diagnostic>,
}

impl SourceRegistry {
    /// Register every entry, then resolve all require directives.
    ///
    /// Only duplicate logical names abort the build. Everything else is
    /// collected as a [`Diagnostic`] and the affected fragments are left
    /// unresolved.
    pub fn build<I>(entries: I, config: &Config) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        let mut fragments: Vec<Fragment> = Vec::new();
        let mut by_name: HashMap<String, FragmentId> = HashMap::new();
        let mut functions = FunctionTable::default();
        let mut diagnostics = Vec::new();

        for entry in entries {
            if let Some(existing) = by_name.get(&entry.name) {
                let first = &fragments[existing.0];
                return Err(RegistryError::DuplicateLogicalName {
                    name: entry.name,
                    first: first.path.clone(),
                    second: entry.path,
                });
            }
            let id = FragmentId(fragments.len());
            by_name.insert(entry.name.clone(), id);
            fragments.push(Fragment::new(
                id,
                entry,
                config,
                &mut functions,
                &mut diagnostics,
            ));
        }

        Resolver::new(
            &mut fragments,
            &by_name,
            &mut diagnostics,
            &config.require_directive,
        )
        .resolve_all();

        let registry = Self {
            fragments,
            by_name,
            functions,
            diagnostics,
        };
        info!(
            fragments = registry.len(),
            functions = registry.functions.len(),
            errors = registry.error_count(),
            "source registry built"
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Fail when any diagnostic was recorded during the build.
    pub fn ensure_valid(&self) -> Result<(), RegistryError> {
        match self.error_count() {
            0 => Ok(()),
            errors => Err(RegistryError::BuildFailed { errors }),
        }
    }

    /// Fragments in registration order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.by_name.get(name).map(|id| &self.fragments[id.0])
    }

    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id.0)
    }

    /// Logical names of the resolved dependencies of `name`, dependency-first.
    pub fn dependency_names(&self, name: &str) -> Option<Vec<&str>> {
        let fragment = self.fragment(name)?;
        Some(
            fragment
                .dependencies
                .iter()
                .map(|dep| self.fragments[dep.0].name())
                .collect(),
        )
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Builtins used by `name` or by anything it depends on.
    ///
    /// Empty for an empty name; empty with a warning for an unknown one.
    pub fn lookup_builtin_flags(&self, name: &str) -> BuiltinBits {
        if name.is_empty() {
            return BuiltinBits::empty();
        }
        let Some(fragment) = self.fragment(name) else {
            warn!(name, "could not find fragment in the list of registered sources");
            return BuiltinBits::empty();
        };
        fragment
            .dependencies
            .iter()
            .fold(fragment.builtins, |bits, dep| {
                bits | self.fragments[dep.0].builtins
            })
    }

    /// Effective texts to concatenate for `name`: every dependency first, the
    /// fragment itself last.
    pub fn resolve_build_sequence(&self, name: &str) -> Result<Vec<&str>, RegistryError> {
        let fragment = self
            .fragment(name)
            .ok_or_else(|| RegistryError::UnknownFragment {
                name: name.to_string(),
            })?;
        if !fragment.is_resolved() {
            return Err(RegistryError::UnresolvedFragment {
                name: name.to_string(),
            });
        }

        let mut sequence: Vec<&str> = fragment
            .dependencies
            .iter()
            .map(|dep| self.fragments[dep.0].effective_text())
            .collect();
        sequence.push(fragment.effective_text());
        Ok(sequence)
    }

    pub fn get_effective_text(&self, name: &str) -> Option<&str> {
        self.fragment(name).map(Fragment::effective_text)
    }

    /// Exported library function by name. The owning fragment's name is added
    /// to `used_libraries` on success.
    pub fn lookup_function(
        &self,
        name: &str,
        used_libraries: &mut HashSet<String>,
    ) -> Option<&FunctionSignature> {
        let function = self.functions.get(name).filter(|f| f.is_exported())?;
        used_libraries.insert(self.fragments[function.owner.0].name.clone());
        Some(function)
    }

    /// Reverse lookup of a text previously handed out by this registry.
    ///
    /// Matches by address, not content: an equal string from elsewhere is
    /// not found. Empty blocks share one dangling address and are never found.
    pub fn get_owning_fragment_name(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        self.fragments
            .iter()
            .find(|fragment| {
                let own = fragment.effective_text();
                std::ptr::eq(own.as_ptr(), text.as_ptr()) && own.len() == text.len()
            })
            .map(Fragment::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShaderError;

    fn entry(name: &str, text: &str) -> SourceEntry {
        SourceEntry::new(name, format!("shaders/{}", name), text)
    }

    fn build(entries: Vec<SourceEntry>) -> SourceRegistry {
        SourceRegistry::build(entries, &Config::default()).unwrap()
    }

    #[test]
    fn test_duplicate_name_fails_fast() {
        let err = SourceRegistry::build(
            vec![
                SourceEntry::new("a.glsl", "one/a.glsl", ""),
                SourceEntry::new("a.glsl", "two/a.glsl", ""),
            ],
            &Config::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateLogicalName {
                name: "a.glsl".to_string(),
                first: "one/a.glsl".to_string(),
                second: "two/a.glsl".to_string(),
            }
        );
    }

    #[test]
    fn test_commented_directive_is_ignored() {
        let registry = build(vec![entry(
            "a.glsl",
            "// #pragma BLENDER_REQUIRE(missing.glsl)\n/* #pragma BLENDER_REQUIRE(gone.glsl) */\n",
        )]);
        assert_eq!(registry.error_count(), 0);
        assert_eq!(registry.resolve_build_sequence("a.glsl").unwrap().len(), 1);
    }

    #[test]
    fn test_directive_name_is_trimmed() {
        let registry = build(vec![
            entry("a.glsl", "#pragma BLENDER_REQUIRE( b.glsl )\n"),
            entry("b.glsl", "float b;\n"),
        ]);
        assert_eq!(registry.dependency_names("a.glsl").unwrap(), vec!["b.glsl"]);
    }

    #[test]
    fn test_unclosed_directive_is_malformed() {
        let registry = build(vec![
            entry("a.glsl", "#pragma BLENDER_REQUIRE(b.glsl\n)\n"),
            entry("b.glsl", ""),
        ]);
        assert_eq!(registry.error_count(), 1);
        assert_eq!(registry.diagnostics()[0].error, ShaderError::MalformedDirective);
        assert_eq!(registry.diagnostics()[0].location.line, 1);
        assert!(!registry.fragment("a.glsl").unwrap().is_resolved());
        assert!(registry.fragment("b.glsl").unwrap().is_resolved());
    }

    #[test]
    fn test_self_require_is_a_cycle() {
        let registry = build(vec![entry("a.glsl", "#pragma BLENDER_REQUIRE(a.glsl)\n")]);
        assert_eq!(
            registry.diagnostics()[0].error,
            ShaderError::CyclicDependency {
                chain: vec!["a.glsl".to_string(), "a.glsl".to_string()]
            }
        );
        assert_eq!(
            registry.fragment("a.glsl").unwrap().state(),
            ResolveState::Failed
        );
    }

    #[test]
    fn test_header_enums_reach_the_build_sequence() {
        let registry = build(vec![
            entry("shared.h", "enum eMode {\n  MODE_A = 0u,\n};\n"),
            entry("a.glsl", "#pragma BLENDER_REQUIRE(shared.h)\nvoid main() {}\n"),
        ]);
        let sequence = registry.resolve_build_sequence("a.glsl").unwrap();
        assert_eq!(sequence[0], "#define eMode uint\nconst uint MODE_A = 0u;\n");
        assert_eq!(
            registry.fragment("shared.h").unwrap().raw_text(),
            "enum eMode {\n  MODE_A = 0u,\n};\n"
        );
    }

    #[test]
    fn test_glsl_enums_are_not_rewritten() {
        let registry = build(vec![entry("a.glsl", "enum eMode {\n  MODE_A = 0u,\n};\n")]);
        assert!(registry.fragment("a.glsl").unwrap().rewritten_text().is_none());
    }

    #[test]
    fn test_library_functions_registered() {
        let registry = build(vec![entry(
            "gpu_shader_material_mix.glsl",
            "void node_mix(float fac, out vec4 outcol)\n{\n}\nfloat helper(float x)\n{\n  return x;\n}\n",
        )]);
        let mut used = HashSet::new();
        let mix = registry.lookup_function("node_mix", &mut used).unwrap();
        assert_eq!(mix.parameters.len(), 2);
        assert_eq!(mix.location.line, 1);
        assert!(used.contains("gpu_shader_material_mix.glsl"));

        let mut used = HashSet::new();
        assert!(registry.lookup_function("helper", &mut used).is_none());
        assert!(used.is_empty());
        assert!(registry.functions().get("helper").is_some());
    }

    #[test]
    fn test_same_file_overload_is_silent() {
        let registry = build(vec![entry(
            "gpu_shader_material_a.glsl",
            "void f(float a)\n{\n}\nvoid f(vec3 a)\n{\n}\n",
        )]);
        assert_eq!(registry.error_count(), 0);
        let mut used = HashSet::new();
        let f = registry.lookup_function("f", &mut used).unwrap();
        assert_eq!(f.parameters[0].ty, crate::types::ParamType::Float);
    }

    #[test]
    fn test_non_library_functions_not_registered() {
        let registry = build(vec![entry("common.glsl", "void node_x()\n{\n}\n")]);
        assert!(registry.functions().is_empty());
    }

    #[test]
    fn test_export_replaces_same_file_helper() {
        let registry = build(vec![entry(
            "gpu_shader_material_mix.glsl",
            "float mix_blend(float a)\n{\n  return a;\n}\nvoid mix_blend(float fac, out vec4 outcol)\n{\n}\n",
        )]);
        assert_eq!(registry.error_count(), 0);

        let mut used = HashSet::new();
        let blend = registry.lookup_function("mix_blend", &mut used).unwrap();
        assert_eq!(blend.parameters.len(), 2);
        assert_eq!(blend.location.line, 5);
        assert!(used.contains("gpu_shader_material_mix.glsl"));
    }

    #[test]
    fn test_helper_after_export_keeps_export() {
        let registry = build(vec![entry(
            "gpu_shader_material_mix.glsl",
            "void mix_blend(float fac, out vec4 outcol)\n{\n}\nfloat mix_blend(float a)\n{\n  return a;\n}\n",
        )]);
        assert_eq!(registry.error_count(), 0);
        let mut used = HashSet::new();
        let blend = registry.lookup_function("mix_blend", &mut used).unwrap();
        assert_eq!(blend.location.line, 1);
    }

    #[test]
    fn test_empty_blocks_have_no_owner() {
        let registry = build(vec![
            entry("a.glsl", ""),
            entry("b.glsl", "#pragma BLENDER_REQUIRE(c.glsl)\n"),
            entry("c.glsl", ""),
        ]);
        let sequence = registry.resolve_build_sequence("b.glsl").unwrap();
        assert_eq!(registry.get_owning_fragment_name(sequence[0]), None);
        assert_eq!(registry.get_owning_fragment_name(sequence[1]), Some("b.glsl"));
    }

    #[test]
    fn test_unknown_and_empty_names() {
        let registry = build(vec![entry("a.glsl", "gl_FragCoord")]);
        assert!(registry.lookup_builtin_flags("").is_empty());
        assert!(registry.lookup_builtin_flags("nope.glsl").is_empty());
        assert_eq!(
            registry.resolve_build_sequence("nope.glsl"),
            Err(RegistryError::UnknownFragment {
                name: "nope.glsl".to_string()
            })
        );
        assert!(registry.get_effective_text("nope.glsl").is_none());
    }
}
