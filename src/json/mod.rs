//! JSON documents.
//!
//! Objects keep their members in source order, and duplicate keys are kept
//! as written. Numbers are `f64`; non-finite numbers render as `null`.
//!
//! Numbers beyond the range of `f64` are rejected. Arrays and objects nest at
//! most [`MAX_NESTING`](crate::parser::MAX_NESTING) levels deep; deeper input
//! fails with `unexpected nesting too deep`.

mod fmt;
mod grammar;

pub use grammar::*;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    /// The value of the first member named `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }
}
