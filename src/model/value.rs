//! Scalar values read out of a data model

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// Leaf value returned by data model lookups.
///
/// Structured nodes and collections are never returned as values.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModelValue {
    /// Text value
    String(String),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value
    Decimal(Decimal),

    /// Boolean value
    Boolean(bool),
}

impl ModelValue {
    /// Name of the value kind, for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::Boolean(_) => "Boolean",
        }
    }

    /// Borrow as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value as a decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert a JSON scalar. Objects, arrays and null are not values.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Bool(b) => Some(Self::Boolean(*b)),
            JsonValue::Number(n) => Some(Self::from_number(n)),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// Numbers outside the decimal range keep their JSON text
    fn from_number(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            return Self::Integer(i);
        }
        let text = n.to_string();
        match text
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&text))
        {
            Ok(d) => Self::Decimal(d),
            Err(err) => {
                log::debug!("number {text} is not a decimal ({err}), reading it as text");
                Self::String(text)
            }
        }
    }

    /// Convert into a JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Decimal(d) => d
                .to_string()
                .parse::<serde_json::Number>()
                .map(JsonValue::Number)
                .unwrap_or_else(|_| JsonValue::String(d.to_string())),
            Self::Boolean(b) => JsonValue::Bool(*b),
        }
    }
}

/// Numbers compare by value, so `Integer(123)` equals `Decimal(123)`.
impl PartialEq for ModelValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ModelValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ModelValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ModelValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for ModelValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for ModelValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
