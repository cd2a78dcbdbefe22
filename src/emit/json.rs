use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyze::builtin_keywords;
use crate::error::{Diagnostic, Location};
use crate::registry::{Fragment, SourceRegistry};
use crate::types::Parameter;

#[derive(Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub project: ProjectInfo,
    pub fragments: Vec<FragmentOutput>,
    pub functions: Vec<FunctionOutput>,
    pub diagnostics: Vec<DiagnosticOutput>,
}

#[derive(Serialize)]
pub struct ProjectInfo {
    pub path: String,
    pub fragments_count: usize,
    pub functions_count: usize,
    pub errors_count: usize,
}

#[derive(Serialize)]
pub struct FragmentOutput {
    pub name: String,
    pub path: String,
    pub rewritten: bool,
    pub resolved: bool,
    pub builtins: Vec<&'static str>,
    pub dependencies: Vec<String>,
}

impl FragmentOutput {
    pub fn from_fragment(fragment: &Fragment, registry: &SourceRegistry) -> Self {
        Self {
            name: fragment.name().to_string(),
            path: fragment.path().to_string(),
            rewritten: fragment.rewritten_text().is_some(),
            resolved: fragment.is_resolved(),
            builtins: builtin_keywords(registry.lookup_builtin_flags(fragment.name())),
            dependencies: registry
                .dependency_names(fragment.name())
                .unwrap_or_default()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct FunctionOutput {
    pub name: String,
    pub owner: String,
    pub signature: String,
    pub parameters: Vec<Parameter>,
    pub location: Location,
}

#[derive(Serialize)]
pub struct DiagnosticOutput {
    pub kind: &'static str,
    pub message: String,
    pub location: Location,
}

impl From<&Diagnostic> for DiagnosticOutput {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            kind: diagnostic.error.kind(),
            message: diagnostic.error.to_string(),
            location: diagnostic.location.clone(),
        }
    }
}

impl JsonOutput {
    pub fn from_registry(path: &str, registry: &SourceRegistry) -> Self {
        let functions: Vec<FunctionOutput> = registry
            .functions()
            .sorted()
            .into_iter()
            .filter(|f| f.is_exported())
            .map(|f| FunctionOutput {
                name: f.name.clone(),
                owner: registry
                    .get(f.owner)
                    .map(|owner| owner.name().to_string())
                    .unwrap_or_default(),
                signature: f.to_string(),
                parameters: f.parameters.clone(),
                location: f.location.clone(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            project: ProjectInfo {
                path: path.to_string(),
                fragments_count: registry.len(),
                functions_count: functions.len(),
                errors_count: registry.error_count(),
            },
            fragments: registry
                .fragments()
                .map(|f| FragmentOutput::from_fragment(f, registry))
                .collect(),
            functions,
            diagnostics: registry.diagnostics().iter().map(DiagnosticOutput::from).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::SourceEntry;

    #[test]
    fn test_json_output_shape() {
        let registry = SourceRegistry::build(
            vec![
                SourceEntry::new("a.glsl", "a.glsl", "#pragma BLENDER_REQUIRE(b.hh)\ngl_FragCoord\n"),
                SourceEntry::new("b.hh", "b.hh", "enum E : uint32_t {\n  X = 0u,\n};\n"),
                SourceEntry::new(
                    "gpu_shader_material_x.glsl",
                    "gpu_shader_material_x.glsl",
                    "void node_x(out float r)\n{\n}\n#pragma BLENDER_REQUIRE(nope.glsl)\n",
                ),
            ],
            &Config::default(),
        )
        .unwrap();

        let output = JsonOutput::from_registry("shaders", &registry);
        let value: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();

        assert_eq!(value["project"]["fragments_count"], 3);
        assert_eq!(value["project"]["errors_count"], 1);
        assert_eq!(value["fragments"][0]["dependencies"][0], "b.hh");
        assert_eq!(value["fragments"][0]["builtins"][0], "gl_FragCoord");
        assert_eq!(value["fragments"][1]["rewritten"], true);
        assert_eq!(value["fragments"][2]["resolved"], false);
        assert_eq!(value["functions"][0]["signature"], "void node_x(out float r)");
        assert_eq!(value["functions"][0]["owner"], "gpu_shader_material_x.glsl");
        assert_eq!(value["diagnostics"][0]["kind"], "missing-dependency");
        assert_eq!(value["diagnostics"][0]["location"]["line"], 4);
    }
}
