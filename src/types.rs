use serde::Serialize;
use std::fmt;

use crate::error::Location;

/// One raw input: a logical name, where it came from, and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub path: String,
    pub text: String,
}

impl SourceEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Stable index of a fragment inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FragmentId(pub(crate) usize);

impl FragmentId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Qualifier {
    In,
    Out,
    InOut,
}

impl Qualifier {
    /// Anything other than `out`/`inout` (including no qualifier) is an input.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "out" => Qualifier::Out,
            "inout" => Qualifier::InOut,
            _ => Qualifier::In,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::In => "in",
            Qualifier::Out => "out",
            Qualifier::InOut => "inout",
        }
    }
}

/// Closed set of parameter types a material library function may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    Sampler1DArray,
    Sampler2DArray,
    Closure,
    Unknown,
}

impl ParamType {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "float" => ParamType::Float,
            "vec2" => ParamType::Vec2,
            "vec3" => ParamType::Vec3,
            "vec4" => ParamType::Vec4,
            "mat3" => ParamType::Mat3,
            "mat4" => ParamType::Mat4,
            "sampler1D" => ParamType::Sampler1D,
            "sampler2D" => ParamType::Sampler2D,
            "sampler3D" => ParamType::Sampler3D,
            "sampler1DArray" => ParamType::Sampler1DArray,
            "sampler2DArray" => ParamType::Sampler2DArray,
            "Closure" => ParamType::Closure,
            _ => ParamType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Float => "float",
            ParamType::Vec2 => "vec2",
            ParamType::Vec3 => "vec3",
            ParamType::Vec4 => "vec4",
            ParamType::Mat3 => "mat3",
            ParamType::Mat4 => "mat4",
            ParamType::Sampler1D => "sampler1D",
            ParamType::Sampler2D => "sampler2D",
            ParamType::Sampler3D => "sampler3D",
            ParamType::Sampler1DArray => "sampler1DArray",
            ParamType::Sampler2DArray => "sampler2DArray",
            ParamType::Closure => "Closure",
            ParamType::Unknown => "unknown",
        }
    }
}

/// Return types recognised when scanning library declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReturnType {
    Void,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Int,
    Uint,
    Bool,
    Closure,
}

impl ReturnType {
    pub const ALL: [ReturnType; 11] = [
        ReturnType::Void,
        ReturnType::Float,
        ReturnType::Vec2,
        ReturnType::Vec3,
        ReturnType::Vec4,
        ReturnType::Mat3,
        ReturnType::Mat4,
        ReturnType::Int,
        ReturnType::Uint,
        ReturnType::Bool,
        ReturnType::Closure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnType::Void => "void",
            ReturnType::Float => "float",
            ReturnType::Vec2 => "vec2",
            ReturnType::Vec3 => "vec3",
            ReturnType::Vec4 => "vec4",
            ReturnType::Mat3 => "mat3",
            ReturnType::Mat4 => "mat4",
            ReturnType::Int => "int",
            ReturnType::Uint => "uint",
            ReturnType::Bool => "bool",
            ReturnType::Closure => "Closure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub qualifier: Qualifier,
    pub ty: ParamType,
    pub name: String,
}

/// A function declared by a material library fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub owner: FragmentId,
    pub return_type: ReturnType,
    /// Only parsed for exported (`void`) functions.
    pub parameters: Vec<Parameter>,
    pub location: Location,
}

impl FunctionSignature {
    pub fn is_exported(&self) -> bool {
        self.return_type == ReturnType::Void
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type.as_str(), self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if param.qualifier != Qualifier::In {
                write!(f, "{} ", param.qualifier.as_str())?;
            }
            write!(f, "{} {}", param.ty.as_str(), param.name)?;
        }
        write!(f, ")")
    }
}
