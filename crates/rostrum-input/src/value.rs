//! Loosely typed values carried by parsed input.

use std::fmt;

/// A bound argument or option value.
///
/// `Null` stands for "declared but never given a value", which is distinct
/// from an empty string (`--foo=` yields `Str("")`, a bare `--foo` on an
/// optional-value option yields `Null`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Str(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Appends to an array value. `Null` becomes a one-element array and a
    /// scalar is promoted to an array holding itself plus the new element.
    pub fn push(&mut self, value: Value) {
        match self {
            Value::Array(items) => items.push(value),
            Value::Null => *self = Value::Array(vec![value]),
            other => {
                let first = std::mem::take(other);
                *other = Value::Array(vec![first, value]);
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_default() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::Null.as_str().is_none());
    }

    #[test]
    fn push_promotes_null_and_scalars() {
        let mut v = Value::Null;
        v.push("a".into());
        assert_eq!(v, Value::Array(vec!["a".into()]));

        let mut v = Value::from("a");
        v.push("b".into());
        assert_eq!(v, Value::Array(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn display_joins_arrays() {
        let v = Value::Array(vec!["a".into(), "b".into()]);
        assert_eq!(v.to_string(), "a b");
        assert_eq!(Value::Null.to_string(), "");
    }
}
