mod json;

pub use json::{DiagnosticOutput, FragmentOutput, FunctionOutput, JsonOutput, ProjectInfo};
