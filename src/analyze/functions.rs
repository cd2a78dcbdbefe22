//! Function declaration scanning for material library fragments.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lexer::{find_keyword, find_token};
use super::Finding;
use crate::error::ShaderError;
use crate::types::{ParamType, Parameter, Qualifier, ReturnType};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A function definition found in library text, before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: ReturnType,
    pub parameters: Vec<Parameter>,
    /// Byte offset of the name in the scanned text.
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct FunctionScan {
    pub declarations: Vec<FunctionDecl>,
    pub findings: Vec<Finding>,
}

/// Find every function definition in `input`, in textual order.
///
/// Parameters are only parsed for `void` functions; the others are returned so
/// their names can take part in redefinition checks.
pub fn scan_functions(input: &str, max_parameters: usize) -> FunctionScan {
    let mut candidates = Vec::new();
    for return_type in ReturnType::ALL {
        let keyword = format!("{} ", return_type.as_str());
        let mut from = 0;
        while let Some(pos) = find_keyword(input, &keyword, from) {
            candidates.push((pos, return_type));
            from = pos + 1;
        }
    }
    candidates.sort_by_key(|(pos, _)| *pos);

    let mut scan = FunctionScan::default();
    for (cursor, return_type) in candidates {
        if let Some(decl) =
            parse_declaration(input, cursor, return_type, max_parameters, &mut scan.findings)
        {
            scan.declarations.push(decl);
        }
    }
    scan
}

fn parse_declaration(
    input: &str,
    cursor: usize,
    return_type: ReturnType,
    max_parameters: usize,
    findings: &mut Vec<Finding>,
) -> Option<FunctionDecl> {
    let name_start = cursor + return_type.as_str().len() + 1;
    let args_open = find_token(input, "(", cursor)?;
    let args_close = find_token(input, ")", args_open)?;

    // Variable declarations, casts and parameters land here too; their "name"
    // spans operators or punctuation and is rejected.
    let raw_name = input.get(name_start..args_open)?;
    let name = raw_name.trim();
    if !IDENTIFIER.is_match(name) {
        return None;
    }
    let name_offset = name_start + (raw_name.len() - raw_name.trim_start().len());

    let body = find_token(input, "{", args_close);
    let semicolon = find_token(input, ";", args_close);
    let is_prototype = match (body, semicolon) {
        (Some(body), Some(semicolon)) => semicolon < body,
        (None, Some(_)) => true,
        _ => false,
    };
    if is_prototype {
        // Only exported functions must be defined in the library itself.
        if return_type != ReturnType::Void {
            return None;
        }
        findings.push(Finding {
            offset: name_offset,
            error: ShaderError::LibraryPrototype {
                name: name.to_string(),
            },
        });
        return None;
    }

    let parameters = if return_type == ReturnType::Void {
        parse_parameters(input, args_open + 1, args_close, name, max_parameters, findings)
    } else {
        Vec::new()
    };

    Some(FunctionDecl {
        name: name.to_string(),
        return_type,
        parameters,
        offset: name_offset,
    })
}

fn parse_parameters(
    input: &str,
    args_start: usize,
    args_end: usize,
    function: &str,
    max_parameters: usize,
    findings: &mut Vec<Finding>,
) -> Vec<Parameter> {
    let args = &input[args_start..args_end];
    let mut parameters = Vec::new();
    let mut cursor = 0;

    while cursor < args.len() {
        let end = find_token(args, ",", cursor).unwrap_or(args.len());
        let arg = &args[cursor..end];
        let arg_offset = args_start + cursor;
        cursor = end + 1;

        let words: Vec<(usize, &str)> = arg
            .split_whitespace()
            .take(3)
            .map(|word| (word.as_ptr() as usize - arg.as_ptr() as usize, word))
            .collect();
        let (qualifier, (type_offset, type_name), name) = match words.as_slice() {
            [] => continue,
            [ty] => ("", *ty, ""),
            [ty, name] => ("", *ty, name.1),
            [qualifier, ty, name] => (qualifier.1, *ty, name.1),
            _ => continue,
        };

        if parameters.len() >= max_parameters {
            findings.push(Finding {
                offset: arg_offset + type_offset,
                error: ShaderError::TooManyParameters {
                    name: function.to_string(),
                    max: max_parameters,
                },
            });
            break;
        }

        let ty = ParamType::from_keyword(type_name);
        if ty == ParamType::Unknown {
            findings.push(Finding {
                offset: arg_offset + type_offset,
                error: ShaderError::UnknownParameterType {
                    type_name: type_name.to_string(),
                },
            });
        }

        parameters.push(Parameter {
            qualifier: Qualifier::from_keyword(qualifier),
            ty,
            name: name.to_string(),
        });
    }

    parameters
}
