//! Lowering of C/C++ `enum` declarations in shared headers into GLSL-compatible text.
//!
//! ```text
//! enum eMyEnum : uint32_t {        #define eMyEnum uint
//!   ENUM_1 = 0u,             =>    const uint ENUM_1 = 0u, ENUM_2 = 1u;
//!   ENUM_2 = 1u,
//! };
//! ```
//!
//! Values must be constant literals with the `u` suffix; nothing checks that here,
//! the shader compiler will.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lexer::{find_keyword, find_token, rfind_token};
use super::Finding;
use crate::error::{EnumDefect, ShaderError};

static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").unwrap());

/// Outcome of rewriting one fragment.
#[derive(Debug, Default)]
pub struct EnumRewrite {
    /// `None` when no enum block was rewritten.
    pub text: Option<String>,
    pub findings: Vec<Finding>,
}

struct EnumBlock {
    replacement: String,
    /// Offset just past the consumed `;`.
    end: usize,
}

/// Rewrite every `enum` block of `input`.
///
/// With `typed` set, each enum must declare a `uint32_t` underlying type.
/// Malformed blocks are reported and copied through untouched.
pub fn rewrite_enums(input: &str, typed: bool) -> EnumRewrite {
    let mut output = String::new();
    let mut findings = Vec::new();
    let mut last_pos = 0;
    let mut rewritten = false;
    let mut from = 0;

    while let Some(cursor) = find_keyword(input, "enum ", from) {
        from = cursor + 1;
        // `typedef enum eFoo eBar;` aliases a type, it does not declare one.
        if input[..cursor].ends_with("typedef ") {
            continue;
        }
        match parse_enum(input, cursor, typed) {
            Ok(block) => {
                output.push_str(&input[last_pos..cursor]);
                output.push_str(&block.replacement);
                last_pos = block.end;
                from = block.end;
                rewritten = true;
            }
            Err((offset, defect)) => findings.push(Finding {
                offset,
                error: ShaderError::MalformedEnum(defect),
            }),
        }
    }

    if !rewritten {
        return EnumRewrite {
            text: None,
            findings,
        };
    }
    output.push_str(&input[last_pos..]);
    EnumRewrite {
        text: Some(output),
        findings,
    }
}

fn parse_enum(input: &str, cursor: usize, typed: bool) -> Result<EnumBlock, (usize, EnumDefect)> {
    let name_start = cursor + "enum".len();

    let values_open =
        find_token(input, "{", cursor).ok_or((cursor, EnumDefect::MissingOpenBrace))?;

    let mut header = &input[name_start..values_open];
    if typed {
        let colon =
            find_token(header, ":", 0).ok_or((name_start, EnumDefect::MissingUnderlyingType))?;
        find_keyword(header, "uint32_t", colon)
            .ok_or((name_start, EnumDefect::UnsupportedUnderlyingType))?;
        header = &header[..colon];
    }
    let name = header.trim();

    let values_close =
        find_token(input, "}", values_open).ok_or((cursor, EnumDefect::MissingCloseBrace))?;
    let values_start = values_open + 1;
    let values = &input[values_start..values_close];

    if let Some(nested) = find_token(values, "{", 0) {
        return Err((values_start + nested, EnumDefect::NestedBrace));
    }
    if input.as_bytes().get(values_close + 1) != Some(&b';') {
        return Err((values_close + 1, EnumDefect::MissingSemicolon));
    }

    let mut replacement = String::new();
    if !name.is_empty() {
        replacement.push_str(&format!("#define {} uint\n", name));
    }
    replacement.push_str(&format!(
        "const uint {};",
        flatten_values(strip_trailing_comma(values))
    ));

    Ok(EnumBlock {
        replacement,
        end: values_close + 2,
    })
}

/// Drop a comma that follows the last assignment when only comments or
/// whitespace come after it.
fn strip_trailing_comma(values: &str) -> &str {
    let last_equal = rfind_token(values, "=", values.len());
    let last_comma = rfind_token(values, ",", values.len());
    match last_comma {
        Some(comma) if last_comma > last_equal => {
            let tail = COMMENT_PATTERN.replace_all(&values[comma + 1..], "");
            if tail.trim().is_empty() {
                &values[..comma]
            } else {
                values
            }
        }
        _ => values,
    }
}

/// One-line `A = 0u, B = 1u` list with comments and layout whitespace removed.
fn flatten_values(values: &str) -> String {
    COMMENT_PATTERN
        .replace_all(values, "")
        .split(',')
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defects(rewrite: &EnumRewrite) -> Vec<EnumDefect> {
        rewrite
            .findings
            .iter()
            .map(|f| match &f.error {
                ShaderError::MalformedEnum(defect) => *defect,
                other => panic!("unexpected finding {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_no_enum_is_noop() {
        let src = "#pragma once\nstruct Foo { int a; };\n";
        let rewrite = rewrite_enums(src, false);
        assert!(rewrite.text.is_none());
        assert!(rewrite.findings.is_empty());
    }

    #[test]
    fn test_c_enum_rewritten() {
        let src = "#pragma once\n\nenum eMyEnum {\n  ENUM_1 = 0u,\n  ENUM_2 = 1u,\n  ENUM_3 = 2u,\n};\n\nstruct S { int a; };\n";
        let rewrite = rewrite_enums(src, false);
        assert!(rewrite.findings.is_empty());
        assert_eq!(
            rewrite.text.as_deref(),
            Some("#pragma once\n\n#define eMyEnum uint\nconst uint ENUM_1 = 0u, ENUM_2 = 1u, ENUM_3 = 2u;\n\nstruct S { int a; };\n")
        );
    }

    #[test]
    fn test_typed_enum_rewritten() {
        let src = "enum eMyEnum : uint32_t {\n  A = 0u,\n  B = 1u,\n};\n";
        let rewrite = rewrite_enums(src, true);
        assert!(rewrite.findings.is_empty());
        assert_eq!(
            rewrite.text.as_deref(),
            Some("#define eMyEnum uint\nconst uint A = 0u, B = 1u;\n")
        );
    }

    #[test]
    fn test_typed_enum_requires_underlying_type() {
        let rewrite = rewrite_enums("enum eMyEnum {\n  A = 0u,\n};\n", true);
        assert!(rewrite.text.is_none());
        assert_eq!(defects(&rewrite), vec![EnumDefect::MissingUnderlyingType]);

        let rewrite = rewrite_enums("enum eMyEnum : int {\n  A = 0u,\n};\n", true);
        assert_eq!(defects(&rewrite), vec![EnumDefect::UnsupportedUnderlyingType]);
    }

    #[test]
    fn test_typedef_enum_is_skipped() {
        let rewrite = rewrite_enums("typedef enum eFoo eFoo;\n", false);
        assert!(rewrite.text.is_none());
        assert!(rewrite.findings.is_empty());
    }

    #[test]
    fn test_enum_suffix_and_comment_are_ignored() {
        let src = "int myenum x;\n// enum Foo {\n";
        let rewrite = rewrite_enums(src, false);
        assert!(rewrite.text.is_none());
        assert!(rewrite.findings.is_empty());
    }

    #[test]
    fn test_missing_semicolon_reported_and_scan_continues() {
        let src = "enum A {\n  X = 0u\n}\nenum B {\n  Y = 1u,\n};\n";
        let rewrite = rewrite_enums(src, false);
        assert_eq!(defects(&rewrite), vec![EnumDefect::MissingSemicolon]);
        assert_eq!(rewrite.findings[0].offset, src.find("}\n").unwrap() + 1);
        assert_eq!(
            rewrite.text.as_deref(),
            Some("enum A {\n  X = 0u\n}\n#define B uint\nconst uint Y = 1u;\n")
        );
    }

    #[test]
    fn test_nested_brace_reported() {
        let src = "enum A {\n  X = {0u},\n};\n";
        let rewrite = rewrite_enums(src, false);
        assert_eq!(defects(&rewrite), vec![EnumDefect::NestedBrace]);
        assert_eq!(rewrite.findings[0].offset, src.find("{0u").unwrap());
    }

    #[test]
    fn test_missing_braces_reported() {
        let rewrite = rewrite_enums("enum A;\n", false);
        assert_eq!(defects(&rewrite), vec![EnumDefect::MissingOpenBrace]);

        let rewrite = rewrite_enums("enum A {\n  X = 0u,\n", false);
        assert_eq!(defects(&rewrite), vec![EnumDefect::MissingCloseBrace]);
    }

    #[test]
    fn test_comments_inside_values_are_dropped() {
        let src = "enum A {\n  X = 0u, // first\n  Y = 1u, /* second */\n};\n";
        let rewrite = rewrite_enums(src, false);
        assert_eq!(
            rewrite.text.as_deref(),
            Some("#define A uint\nconst uint X = 0u, Y = 1u;\n")
        );
    }

    #[test]
    fn test_last_value_without_trailing_comma_is_kept() {
        let src = "enum A {\n  X = 0u,\n  Y = 1u\n};";
        let rewrite = rewrite_enums(src, false);
        assert_eq!(
            rewrite.text.as_deref(),
            Some("#define A uint\nconst uint X = 0u, Y = 1u;")
        );
    }

    #[test]
    fn test_multiple_enums_preserve_text_between() {
        let src = "enum A {\n  X = 0u,\n};\n/* keep */\nenum B {\n  Y = 1u,\n};\ntail";
        let rewrite = rewrite_enums(src, false);
        assert_eq!(
            rewrite.text.as_deref(),
            Some("#define A uint\nconst uint X = 0u;\n/* keep */\n#define B uint\nconst uint Y = 1u;\ntail")
        );
    }
}
