//! Typed attribute values attached to entities.

use serde::{Deserialize, Serialize};

/// A single typed attribute value.
///
/// [`Null`](Self::Null) is published for "no shift" so consumers see the key
/// with a `null` value rather than a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl AttributeValue {
    /// `String` when present, `Null` otherwise.
    #[must_use]
    pub fn optional_string(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::String)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_null_variant_as_null() {
        let json = serde_json::to_string(&AttributeValue::Null).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn should_serialize_int_variant_as_number() {
        let json = serde_json::to_string(&AttributeValue::Int(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn should_serialize_string_variant_as_plain_string() {
        let json = serde_json::to_string(&AttributeValue::from("hello")).unwrap();
        assert_eq!(json, "\"hello\"");
    }

    #[test]
    fn should_map_missing_optional_string_to_null() {
        assert_eq!(AttributeValue::optional_string(None), AttributeValue::Null);
        assert_eq!(
            AttributeValue::optional_string(Some("x".to_string())),
            AttributeValue::String("x".to_string())
        );
    }

    #[test]
    fn should_deserialize_json_object_as_json_variant() {
        let val: AttributeValue = serde_json::from_str(r#"{"nested": "value"}"#).unwrap();
        assert!(matches!(val, AttributeValue::Json(_)));
    }
}
