//! Property values attached to log events

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered property-name to value map. A `BTreeMap` keeps rendered output
/// deterministic regardless of insertion order.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single property value: scalar, sequence, or nested map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Seq(Vec<PropertyValue>),
    Map(PropertyMap),
}

impl PropertyValue {
    /// Convert to a `serde_json::Value` for JSON output formats.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            PropertyValue::String(s) => serde_json::Value::String(s.clone()),
            PropertyValue::Int(i) => serde_json::Value::Number((*i).into()),
            PropertyValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::Bool(b) => serde_json::Value::Bool(*b),
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Seq(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json_value()).collect())
            }
            PropertyValue::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// Display writes the value the way it should appear inside a rendered
// message: strings bare, numbers and booleans plain, structures as JSON.
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Seq(_) | PropertyValue::Map(_) => {
                write!(f, "{}", self.to_json_value())
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Int(i64::from(i))
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<u32> for PropertyValue {
    fn from(i: u32) -> Self {
        PropertyValue::Int(i64::from(i))
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<f32> for PropertyValue {
    fn from(f: f32) -> Self {
        PropertyValue::Float(f64::from(f))
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Seq(items)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(entries: PropertyMap) -> Self {
        PropertyValue::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_from_primitives() {
        assert_eq!(PropertyValue::from("abc"), PropertyValue::String("abc".to_string()));
        assert_eq!(PropertyValue::from(42), PropertyValue::Int(42));
        assert_eq!(PropertyValue::from(2.5), PropertyValue::Float(2.5));
        assert_eq!(PropertyValue::from(true), PropertyValue::Bool(true));
    }

    #[test]
    fn test_display_writes_strings_bare() {
        assert_eq!(PropertyValue::from("world").to_string(), "world");
        assert_eq!(PropertyValue::from(10).to_string(), "10");
        assert_eq!(PropertyValue::Null.to_string(), "null");
    }

    #[test]
    fn test_nested_values_convert_to_json() {
        let mut map = PropertyMap::new();
        map.insert("id".to_string(), PropertyValue::from(7));
        map.insert(
            "tags".to_string(),
            PropertyValue::Seq(vec![PropertyValue::from("a"), PropertyValue::from("b")]),
        );
        let json = PropertyValue::Map(map).to_json_value();
        assert_eq!(json["id"], 7);
        assert_eq!(json["tags"][1], "b");
    }

    #[test]
    fn test_serde_roundtrip_is_untagged() {
        let v = PropertyValue::from(3.25);
        let text = serde_json::to_string(&v).unwrap();
        assert_eq!(text, "3.25");
    }
}
