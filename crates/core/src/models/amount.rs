//! Monetary amounts as the API encodes them.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A decimal-like amount kept as its original literal.
///
/// The API sends a bare number, a numeric string, `{"value": ...}` or a
/// BSON `{"$numberDecimal": "..."}` wrapper. The literal is preserved so the
/// string projection used for filtering and sorting matches what was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    /// Decode any of the known amount shapes. Unknown shapes yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Object(map) => map
                .get("value")
                .and_then(Self::from_value)
                .or_else(|| map.get("$numberDecimal").and_then(Self::from_value)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, when the literal parses.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_wrapper() {
        assert_eq!(
            Amount::from_value(&json!({"value": 100})).map(|a| a.to_string()),
            Some("100".to_string())
        );
    }

    #[test]
    fn number_decimal_wrapper() {
        let amount = Amount::from_value(&json!({"$numberDecimal": "250.50"})).unwrap();
        assert_eq!(amount.as_str(), "250.50");
        assert_eq!(amount.to_f64(), Some(250.5));
    }

    #[test]
    fn unparseable_literal_has_no_numeric_value() {
        let amount = Amount::from_value(&json!("TBD")).unwrap();
        assert_eq!(amount.to_f64(), None);
    }

    #[test]
    fn empty_wrapper_is_missing() {
        assert!(Amount::from_value(&json!({"currency": "EUR"})).is_none());
    }
}
