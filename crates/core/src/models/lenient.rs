//! `deserialize_with` helpers that never reject a document.
//!
//! Each helper first decodes the field as an arbitrary JSON value and then
//! projects it onto the target type, yielding `None` (or an empty list)
//! when the shape is not understood.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::entity::Entity;
use crate::models::{Amount, Reference};
use crate::normalize;

/// Keys consulted, in order, when an object stands in for a display label.
const LABEL_KEYS: &[&str] = &["name", "title", "label", "order_number"];

/// Keys consulted, in order, when an object stands in for an attachment.
const ATTACHMENT_KEYS: &[&str] = &["url", "path", "filename", "name"];

/// Project a JSON value to a display string.
///
/// - Blank strings and `null` are treated as missing.
/// - Numbers and booleans use their JSON literal.
/// - Objects fall back to their first non-blank label key.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => LABEL_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(scalar_to_string),
        _ => None,
    }
}

/// Project a JSON value to a document id. Accepts a bare string, a number,
/// or an extended-JSON `{"$oid": "..."}` wrapper.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_from_value),
        _ => None,
    }
}

pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

pub fn reference<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Reference>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Reference::from_value))
}

pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Amount>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Amount::from_value))
}

/// A list of attachment locations. Scalars are kept as-is; objects
/// contribute their first location-like key; everything else is dropped.
pub fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => ATTACHMENT_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(scalar_to_string),
            other => scalar_to_string(other),
        })
        .collect())
}

/// A nested entity list. Elements that are bare ids become id-only records;
/// elements that cannot be decoded are skipped.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Entity,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(Value::Array(items)) => Ok(normalize::parse_records(&items)),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_strings_are_missing() {
        assert_eq!(scalar_to_string(&json!("   ")), None);
        assert_eq!(scalar_to_string(&Value::Null), None);
    }

    #[test]
    fn numbers_keep_their_literal() {
        assert_eq!(scalar_to_string(&json!(42)), Some("42".into()));
        assert_eq!(scalar_to_string(&json!(2.5)), Some("2.5".into()));
    }

    #[test]
    fn objects_fall_back_to_label_keys() {
        let value = json!({"_id": "c1", "title": "Pumps"});
        assert_eq!(scalar_to_string(&value), Some("Pumps".into()));
    }

    #[test]
    fn extended_json_ids_are_unwrapped() {
        let value = json!({"$oid": "65f0a1"});
        assert_eq!(id_from_value(&value), Some("65f0a1".into()));
    }
}
