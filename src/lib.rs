//! Shader source preprocessing and `require` dependency resolution.
//!
//! [`SourceRegistry::build`] takes every named source once, rewrites enums in
//! shared headers, collects material library functions and expands require
//! directives into dependency-first build sequences.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod generate;
pub mod registry;
pub mod scan;
pub mod types;

pub use config::Config;
pub use error::{Diagnostic, RegistryError, ShaderError};
pub use registry::SourceRegistry;
pub use types::{FunctionSignature, SourceEntry};
