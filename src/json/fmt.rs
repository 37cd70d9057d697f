//! Compact (`Display`) and indented (`JsonValue::pretty`) rendering.

use std::fmt::{self, Display};

use super::JsonValue;

const INDENT: &str = "  ";

impl JsonValue {
    /// Multi-line rendering with two-space indentation.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        write_pretty(&mut out, self, 0);
        out
    }
}

/// Non-empty containers put one entry per line; everything else renders
/// compactly.
fn write_pretty(out: &mut String, value: &JsonValue, depth: usize) {
    let (open, close, entries): (char, char, Vec<(Option<&str>, &JsonValue)>) = match value {
        JsonValue::Array(items) if !items.is_empty() => {
            ('[', ']', items.iter().map(|item| (None, item)).collect())
        }
        JsonValue::Object(members) if !members.is_empty() => (
            '{',
            '}',
            members
                .iter()
                .map(|(key, member)| (Some(key.as_str()), member))
                .collect(),
        ),
        scalar => {
            out.push_str(&scalar.to_string());
            return;
        }
    };

    out.push(open);
    for (index, (key, entry)) in entries.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        break_line(out, depth + 1);
        if let Some(key) = key {
            out.push_str(&quote(key));
            out.push_str(": ");
        }
        write_pretty(out, entry, depth + 1);
    }
    break_line(out, depth);
    out.push(close);
}

fn break_line(out: &mut String, depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

/// `text` as a JSON string literal.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            ch if u32::from(ch) < 0x20 => quoted.push_str(&format!("\\u{:04x}", u32::from(ch))),
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

impl Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Bool(value) => write!(f, "{value}"),
            JsonValue::Number(number) if number.is_finite() => write!(f, "{number}"),
            JsonValue::Number(_) => f.write_str("null"),
            JsonValue::String(text) => f.write_str(&quote(text)),
            JsonValue::Array(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            JsonValue::Object(members) => {
                f.write_str("{")?;
                for (index, (key, value)) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{value}", quote(key))?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JsonValue {
        JsonValue::Object(vec![
            ("x".to_string(), JsonValue::Number(3.0)),
            (
                "list".to_string(),
                JsonValue::Array(vec![JsonValue::Bool(true), JsonValue::Null]),
            ),
            ("empty".to_string(), JsonValue::Array(Vec::new())),
        ])
    }

    #[test]
    fn test_compact_rendering() {
        assert_eq!(
            sample().to_string(),
            r#"{"x":3,"list":[true,null],"empty":[]}"#
        );
    }

    #[test]
    fn test_pretty_rendering() {
        let expected = "{\n  \"x\": 3,\n  \"list\": [\n    true,\n    null\n  ],\n  \"empty\": []\n}";
        assert_eq!(sample().pretty(), expected);
    }

    #[test]
    fn test_pretty_nested_containers() {
        let value = JsonValue::Array(vec![
            JsonValue::Object(vec![("k\"".to_string(), JsonValue::Object(Vec::new()))]),
            JsonValue::Array(vec![JsonValue::String("s".to_string())]),
        ]);
        let expected = "[\n  {\n    \"k\\\"\": {}\n  },\n  [\n    \"s\"\n  ]\n]";
        assert_eq!(value.pretty(), expected);
        assert_eq!(JsonValue::Bool(false).pretty(), "false");
        assert_eq!(JsonValue::Object(Vec::new()).pretty(), "{}");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote("\u{1}"), r#""\u0001""#);
        assert_eq!(quote("ü€"), "\"ü€\"");
    }

    #[test]
    fn test_non_finite_numbers_render_as_null() {
        assert_eq!(JsonValue::Number(f64::NAN).to_string(), "null");
        assert_eq!(JsonValue::Number(-0.5).to_string(), "-0.5");
    }
}
