//! Dynamically typed values for rc settings and keyword bags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration or keyword value.
///
/// `Null` stands for "not supplied" in keyword bags, which is what the
/// first-non-null alias rule skips over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RcValue {
    /// Missing value
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value (stored as f64 for simplicity)
    Number(f64),
    /// String value (colors, choices, unit strings, ...)
    Text(String),
    /// Sequence of values (tick positions, RGB tuples, ...)
    List(Vec<RcValue>),
    /// Nested keyword dictionary
    Map(IndexMap<String, RcValue>),
}

impl RcValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RcValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RcValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RcValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RcValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RcValue]> {
        match self {
            RcValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, RcValue>> {
        match self {
            RcValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Interpret a list as numbers, failing on the first non-numeric item.
    pub fn as_f64_list(&self) -> Option<Vec<f64>> {
        self.as_list()?.iter().map(RcValue::as_f64).collect()
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            RcValue::Null => "null",
            RcValue::Bool(_) => "bool",
            RcValue::Number(_) => "number",
            RcValue::Text(_) => "string",
            RcValue::List(_) => "list",
            RcValue::Map(_) => "dict",
        }
    }
}

impl fmt::Display for RcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RcValue::Null => write!(f, "None"),
            RcValue::Bool(b) => write!(f, "{}", b),
            RcValue::Number(n) => write!(f, "{}", n),
            RcValue::Text(s) => write!(f, "{:?}", s),
            RcValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RcValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for RcValue {
    fn from(value: bool) -> Self {
        RcValue::Bool(value)
    }
}

impl From<f64> for RcValue {
    fn from(value: f64) -> Self {
        RcValue::Number(value)
    }
}

impl From<f32> for RcValue {
    fn from(value: f32) -> Self {
        RcValue::Number(value as f64)
    }
}

impl From<i32> for RcValue {
    fn from(value: i32) -> Self {
        RcValue::Number(value as f64)
    }
}

impl From<usize> for RcValue {
    fn from(value: usize) -> Self {
        RcValue::Number(value as f64)
    }
}

impl From<&str> for RcValue {
    fn from(value: &str) -> Self {
        RcValue::Text(value.to_string())
    }
}

impl From<String> for RcValue {
    fn from(value: String) -> Self {
        RcValue::Text(value)
    }
}

impl<T: Into<RcValue>> From<Vec<T>> for RcValue {
    fn from(values: Vec<T>) -> Self {
        RcValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RcValue>> From<Option<T>> for RcValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RcValue::Null, Into::into)
    }
}

impl From<IndexMap<String, RcValue>> for RcValue {
    fn from(map: IndexMap<String, RcValue>) -> Self {
        RcValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serialization() {
        let text = RcValue::from("black");
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""black""#);

        let number = RcValue::from(12.0);
        assert_eq!(serde_json::to_string(&number).unwrap(), "12.0");

        let list = RcValue::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[1.0,2.0,3.0]");
    }

    #[test]
    fn test_value_deserialization() {
        let value: RcValue = serde_json::from_str(r#"{"nbins": 5, "steps": null}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("nbins"), Some(&RcValue::Number(5.0)));
        assert!(map.get("steps").unwrap().is_null());

        let value: RcValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, RcValue::Bool(true));
    }

    #[test]
    fn test_numeric_list() {
        let value = RcValue::from(vec![1.0, 2.5]);
        assert_eq!(value.as_f64_list(), Some(vec![1.0, 2.5]));
        let mixed = RcValue::List(vec![RcValue::from(1.0), RcValue::from("x")]);
        assert_eq!(mixed.as_f64_list(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RcValue::Null.to_string(), "None");
        assert_eq!(RcValue::from("k").to_string(), "\"k\"");
        assert_eq!(RcValue::from(vec![1.0, 2.0]).to_string(), "[1, 2]");
    }
}
