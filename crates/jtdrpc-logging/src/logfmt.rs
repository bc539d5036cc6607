//! logfmt line encoding

use std::fmt::Write;

/// Append `key=value` to `line`, separated from any previous pair by a space
pub(crate) fn push_pair(line: &mut String, key: &str, value: &str) {
    if !line.is_empty() && !line.ends_with(' ') {
        line.push(' ');
    }
    line.push_str(key);
    line.push('=');
    push_value(line, value);
}

/// Append a value, quoting it when it would otherwise be ambiguous
pub(crate) fn push_value(line: &mut String, value: &str) {
    if !needs_quotes(value) {
        line.push_str(value);
        return;
    }

    line.push('"');
    for c in value.chars() {
        match c {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(line, "\\u{{{:04x}}}", c as u32);
            }
            c => line.push(c),
        }
    }
    line.push('"');
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '=' || c == '"' || c == '\\' || c.is_control())
}

#[cfg(test)]
#[path = "logfmt/logfmt_tests.rs"]
mod logfmt_tests;
