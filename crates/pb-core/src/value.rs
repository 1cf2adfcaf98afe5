//! Placeholder scalar values and their text rendering.
//!
//! Rendering rule:
//! - strings are inserted verbatim
//! - `true` renders as `1`, `false` as the empty string
//! - integers render in decimal
//! - floats render as the shortest decimal that round-trips, never in
//!   exponent form (`2.0` -> `2`, `0.1` -> `0.1`, `1e21` -> `1000000000000000000000`)
//!
//! Non-finite floats have no rendering and are rejected by [`PlaceholderValue::validate`].

use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A scalar placeholder value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceholderValue {
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl PlaceholderValue {
    /// Type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) | Self::Unsigned(_) => "integer",
            Self::Float(f) if !f.is_finite() => "non-finite float",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Check that the value can be rendered.
    pub fn validate(&self, key: &str) -> Result<()> {
        match self {
            Self::Float(f) if !f.is_finite() => Err(PackError::InvalidValue {
                key: key.to_string(),
                actual_type: self.type_name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Render the value as it appears in packaged output.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => String::new(),
            Self::Integer(i) => i.to_string(),
            Self::Unsigned(u) => u.to_string(),
            Self::Float(f) => format!("{f}"),
            Self::String(s) => s.clone(),
        }
    }

    /// Convert a JSON value, rejecting `null`, arrays and objects.
    pub fn from_json(key: &str, value: &Value) -> Result<Self> {
        let invalid = |actual: &str| PackError::InvalidValue {
            key: key.to_string(),
            actual_type: actual.to_string(),
        };
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::Unsigned(u))
                } else {
                    n.as_f64().map(Self::Float).ok_or_else(|| invalid("number"))
                }
            }
            Value::Null => Err(invalid("null")),
            Value::Array(_) => Err(invalid("array")),
            Value::Object(_) => Err(invalid("object")),
        }
    }
}

impl fmt::Display for PlaceholderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for PlaceholderValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for PlaceholderValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for PlaceholderValue {
    fn from(i: i32) -> Self {
        Self::Integer(i.into())
    }
}

impl From<i64> for PlaceholderValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for PlaceholderValue {
    fn from(u: u32) -> Self {
        Self::Integer(u.into())
    }
}

impl From<u64> for PlaceholderValue {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl From<f64> for PlaceholderValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}
