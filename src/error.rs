use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::analyze::lexer::{line_at, line_col};

/// A position inside a fragment, as reported to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn at(file: &str, text: &str, offset: usize) -> Self {
        let (line, column) = line_col(text, offset);
        Self {
            file: file.to_string(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// What is wrong with a rejected `enum` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnumDefect {
    #[error("Malformed enum class. Expected '{{' after typename.")]
    MissingOpenBrace,
    #[error("Expected ':' after C++ enum name.")]
    MissingUnderlyingType,
    #[error("C++ enums needs uint32_t underlying type.")]
    UnsupportedUnderlyingType,
    #[error("Malformed enum class. Expected '}}' after values.")]
    MissingCloseBrace,
    #[error("Unexpected '{{' token inside enum values.")]
    NestedBrace,
    #[error("Expected ';' after enum type declaration.")]
    MissingSemicolon,
}

/// Errors found while analysing or resolving fragment text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("Malformed require directive: missing \")\" token")]
    MalformedDirective,

    #[error("Dependency not found: \"{name}\"")]
    MissingDependency { name: String },

    #[error("Cyclic dependency: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("{0}")]
    MalformedEnum(EnumDefect),

    #[error("Unknown parameter type \"{type_name}\"")]
    UnknownParameterType { type_name: String },

    #[error("Function \"{name}\" redefined in a different file; previous definition was at {previous}")]
    FunctionRedefinition { name: String, previous: Location },

    #[error("Too many parameters in function \"{name}\" (limit is {max})")]
    TooManyParameters { name: String, max: usize },

    #[error("Prototype of \"{name}\" is not allowed in material libraries")]
    LibraryPrototype { name: String },
}

impl ShaderError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ShaderError::MalformedDirective => "malformed-directive",
            ShaderError::MissingDependency { .. } => "missing-dependency",
            ShaderError::CyclicDependency { .. } => "cyclic-dependency",
            ShaderError::MalformedEnum(_) => "malformed-enum",
            ShaderError::UnknownParameterType { .. } => "unknown-parameter-type",
            ShaderError::FunctionRedefinition { .. } => "function-redefinition",
            ShaderError::TooManyParameters { .. } => "too-many-parameters",
            ShaderError::LibraryPrototype { .. } => "library-prototype",
        }
    }
}

/// A located [`ShaderError`] with the offending source line captured for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub source_line: String,
    pub error: ShaderError,
}

impl Diagnostic {
    pub fn new(file: &str, text: &str, offset: usize, error: ShaderError) -> Self {
        Self {
            location: Location::at(file, text, offset),
            source_line: line_at(text, offset).to_string(),
            error,
        }
    }

    /// Spaces that put a caret under the reported column.
    pub fn caret_padding(&self) -> String {
        " ".repeat(self.location.column.saturating_sub(1))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} error: {}", self.location, self.error)?;
        writeln!(f, "{:>5} | {}", self.location.line, self.source_line)?;
        write!(f, "      | {}^", self.caret_padding())
    }
}

/// Failures of the registry as a whole, as opposed to located diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate logical name \"{name}\" ({first} and {second})")]
    DuplicateLogicalName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Could not find \"{name}\" in the list of registered sources")]
    UnknownFragment { name: String },

    #[error("Dependencies of \"{name}\" failed to resolve")]
    UnresolvedFragment { name: String },

    #[error("Dependency errors detected: {errors} error(s)")]
    BuildFailed { errors: usize },

    #[error("A shader source session is already initialized")]
    AlreadyInitialized,
}
