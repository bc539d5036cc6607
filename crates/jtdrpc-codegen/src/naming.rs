//! Identifier conventions shared by the generators.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `word` | [`capitalize`] | `Word` |
//! | `kebab-or_snake` | [`to_pascal_case`] | `KebabOrSnake` |
//! | `First-Name` | [`ts_property_key`] | `"First-Name"` |
//! | `user_id` | [`go_field_name`] | `User_id` |
//! | `Email@Address` | [`go_field_name`] | `EmailAddress` |

use crate::error::{CodegenError, CodegenResult};

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use jtdrpc_codegen::naming::capitalize;
///
/// assert_eq!(capitalize("getUser"), "GetUser");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a kebab-case or snake_case name to PascalCase.
///
/// Segments after the first keep their remaining letters as written, so
/// `getUser` becomes `GetUser` rather than `Getuser`.
///
/// # Examples
///
/// ```
/// use jtdrpc_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hyphenated-service-name"), "HyphenatedServiceName");
/// assert_eq!(to_pascal_case("get_user"), "GetUser");
/// assert_eq!(to_pascal_case("getUser"), "GetUser");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_']).map(capitalize).collect()
}

/// True when `key` can appear unquoted as a TypeScript property name
pub fn is_ts_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A TypeScript property key, quoted unless it is a bare identifier.
///
/// ```
/// use jtdrpc_codegen::naming::ts_property_key;
///
/// assert_eq!(ts_property_key("userId").unwrap(), "userId");
/// assert_eq!(ts_property_key("Last Name").unwrap(), "\"Last Name\"");
/// ```
pub fn ts_property_key(key: &str) -> CodegenResult<String> {
    if is_ts_identifier(key) {
        Ok(key.to_string())
    } else {
        string_literal(key)
    }
}

/// A double-quoted string literal valid in both TypeScript and Go
pub fn string_literal(value: &str) -> CodegenResult<String> {
    serde_json::to_string(value).map_err(|e| CodegenError::Encoding(e.to_string()))
}

/// An exported Go field identifier for a JSON property name.
///
/// Names that are already identifiers are capitalized as-is. Anything else
/// is split on the characters Go cannot carry and rejoined in PascalCase,
/// with an `X` prefix when the result would not start with a letter.
pub fn go_field_name(key: &str) -> String {
    let is_identifier = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    let name = if is_identifier {
        capitalize(key)
    } else {
        key.split(|c: char| !c.is_ascii_alphanumeric())
            .map(capitalize)
            .collect()
    };

    match name.chars().next() {
        Some(c) if c.is_ascii_uppercase() => name,
        _ => format!("X{name}"),
    }
}
