use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// File looked up in a shader root when no explicit config is given.
pub const CONFIG_FILE_NAME: &str = "shaderlens.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directive name, searched as `<directive>(` in fragment text.
    pub require_directive: String,
    /// Logical name suffixes of shared headers eligible for enum rewriting.
    pub header_extensions: Vec<String>,
    /// Header suffixes whose enums must declare a `uint32_t` underlying type.
    pub typed_enum_extensions: Vec<String>,
    pub library_prefix: String,
    pub library_suffix: String,
    pub max_function_parameters: usize,
    /// File extensions (without the dot) picked up by the directory loader.
    pub source_extensions: Vec<String>,
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            require_directive: "pragma BLENDER_REQUIRE".to_string(),
            header_extensions: vec![".h".to_string(), ".hh".to_string()],
            typed_enum_extensions: vec![".hh".to_string()],
            library_prefix: "gpu_shader_material_".to_string(),
            library_suffix: ".glsl".to_string(),
            max_function_parameters: 36,
            source_extensions: vec!["glsl".to_string(), "h".to_string(), "hh".to_string()],
            respect_gitignore: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `shaderlens.toml` from `root` when present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn is_header(&self, name: &str) -> bool {
        self.header_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    pub fn requires_typed_enums(&self, name: &str) -> bool {
        self.typed_enum_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }

    pub fn is_material_library(&self, name: &str) -> bool {
        name.starts_with(&self.library_prefix) && name.ends_with(&self.library_suffix)
    }
}
