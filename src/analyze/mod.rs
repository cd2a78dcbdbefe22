pub mod builtins;
pub mod enums;
pub mod functions;
pub mod lexer;

pub use builtins::{builtin_keywords, scan_builtins, BuiltinBits};
pub use enums::{rewrite_enums, EnumRewrite};
pub use functions::{scan_functions, FunctionDecl, FunctionScan};

use crate::error::ShaderError;

/// An error found at a byte offset of the text being analysed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub offset: usize,
    pub error: ShaderError,
}
