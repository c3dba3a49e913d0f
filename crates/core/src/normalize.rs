//! Response shape normalization.
//!
//! List endpoints return either a bare array or an envelope object holding
//! the array under one of several keys. [`normalize`] resolves any such
//! response to a [`Collection`]; it never fails; an unusable shape is
//! [`Collection::Empty`].
//!
//! Resolution order:
//!
//! 1. The root is an array: use it.
//! 2. The root is an object: probe the entity's own collection key, then
//!    [`ENVELOPE_KEYS`] in order, taking the first that holds an array.
//! 3. Otherwise the first array-valued property, in document order.
//! 4. Otherwise empty.

use serde_json::{Map, Value};

use crate::entity::Entity;

/// Envelope keys probed after the entity's own key, in priority order.
pub const ENVELOPE_KEYS: &[&str] = &[
    "projects", "orders", "assets", "tasks", "users", "data", "results",
];

/// Keys that may wrap a single record (`{"data": {...}}`).
const SINGLE_RECORD_KEYS: &[&str] = &["data", "result"];

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// A normalized list response.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection<T> {
    /// An array was located. It may still be empty.
    Items(Vec<T>),
    /// No usable array was present in the response.
    Empty,
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            Self::Empty => &[],
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Items(items) => items,
            Self::Empty => Vec::new(),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::Empty
    }
}

// ---------------------------------------------------------------------------
// Array location
// ---------------------------------------------------------------------------

/// Locate the collection array inside a raw response.
///
/// `preferred_key` is probed before [`ENVELOPE_KEYS`].
pub fn locate_array<'a>(root: &'a Value, preferred_key: &str) -> Option<&'a Vec<Value>> {
    match root {
        Value::Array(items) => Some(items),
        Value::Object(map) => std::iter::once(preferred_key)
            .chain(ENVELOPE_KEYS.iter().copied())
            .find_map(|key| map.get(key).and_then(Value::as_array))
            .or_else(|| map.values().find_map(Value::as_array)),
        _ => None,
    }
}

/// Normalize a raw list response into a typed collection.
pub fn normalize<T: Entity>(root: &Value) -> Collection<T> {
    match locate_array(root, T::KIND.collection_key()) {
        Some(items) => Collection::Items(parse_records(items)),
        None => {
            tracing::debug!(
                entity = T::KIND.collection_key(),
                "Response held no array; treating as empty",
            );
            Collection::Empty
        }
    }
}

/// Normalize a single-record response: `{"order": {...}}`, `{"data": {...}}`,
/// or the bare document. Returns `None` when no object can be decoded.
pub fn normalize_record<T: Entity>(root: &Value) -> Option<T> {
    let Value::Object(map) = root else {
        return None;
    };

    let inner = std::iter::once(T::KIND.record_key())
        .chain(SINGLE_RECORD_KEYS.iter().copied())
        .find_map(|key| map.get(key).filter(|v| v.is_object()))
        .unwrap_or(root);

    parse_record(inner)
}

// ---------------------------------------------------------------------------
// Record decoding
// ---------------------------------------------------------------------------

/// Decode a list of raw documents, skipping elements that cannot be decoded.
///
/// A bare id string stands for an id-only document.
pub fn parse_records<T: Entity>(items: &[Value]) -> Vec<T> {
    items.iter().filter_map(parse_record).collect()
}

/// Decode one raw document after applying the entity's key aliases.
pub fn parse_record<T: Entity>(value: &Value) -> Option<T> {
    let mut map = match value {
        Value::Object(map) => map.clone(),
        Value::String(id) if !id.trim().is_empty() => {
            let mut map = Map::new();
            map.insert("_id".into(), Value::String(id.clone()));
            map
        }
        _ => return None,
    };

    apply_aliases(&mut map, T::FIELD_ALIASES);

    match serde_json::from_value(Value::Object(map)) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(
                entity = T::KIND.collection_key(),
                error = %e,
                "Skipping undecodable record",
            );
            None
        }
    }
}

/// Move alternate key spellings onto their canonical key when the canonical
/// key is absent or null.
fn apply_aliases(map: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for (alternate, canonical) in aliases {
        let canonical_missing = map.get(*canonical).map_or(true, Value::is_null);
        if canonical_missing {
            if let Some(value) = map.remove(*alternate) {
                map.insert((*canonical).to_string(), value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, Order, Project};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn order_numbers(collection: &Collection<Order>) -> Vec<&str> {
        collection
            .as_slice()
            .iter()
            .filter_map(|o| o.order_number.as_deref())
            .collect()
    }

    // -- shape resolution ----------------------------------------------------

    #[test]
    fn bare_array_is_used_directly() {
        let raw = json!([{"order_number": "WO-1"}, {"order_number": "WO-2"}]);
        let orders = normalize::<Order>(&raw);
        assert_eq!(order_numbers(&orders), vec!["WO-1", "WO-2"]);
    }

    #[test]
    fn entity_key_envelope_is_unwrapped() {
        let raw = json!({"count": 1, "orders": [{"order_number": "WO-7"}]});
        let orders = normalize::<Order>(&raw);
        assert_eq!(order_numbers(&orders), vec!["WO-7"]);
    }

    #[test]
    fn data_envelope_is_unwrapped() {
        let raw = json!({"success": true, "data": [{"order_number": "WO-3"}]});
        assert_eq!(order_numbers(&normalize::<Order>(&raw)), vec!["WO-3"]);
    }

    #[test]
    fn own_key_wins_over_other_envelope_keys() {
        let raw = json!({
            "projects": [{"name": "P"}],
            "orders": [{"order_number": "WO-9"}],
        });
        assert_eq!(order_numbers(&normalize::<Order>(&raw)), vec!["WO-9"]);
    }

    #[test]
    fn fixed_priority_applies_between_foreign_keys() {
        let raw = json!({"results": [{"order_number": "R"}], "data": [{"order_number": "D"}]});
        assert_eq!(order_numbers(&normalize::<Order>(&raw)), vec!["D"]);
    }

    #[test]
    fn first_array_property_is_the_fallback() {
        let raw = json!({"meta": {"page": 1}, "items": [{"order_number": "WO-4"}], "more": []});
        assert_eq!(order_numbers(&normalize::<Order>(&raw)), vec!["WO-4"]);
    }

    #[test]
    fn object_without_arrays_is_empty() {
        let raw = json!({"message": "ok", "orders": null});
        assert_matches!(normalize::<Order>(&raw), Collection::Empty);
    }

    #[test]
    fn scalars_are_empty() {
        assert_matches!(normalize::<Order>(&json!("nope")), Collection::Empty);
        assert_matches!(normalize::<Order>(&Value::Null), Collection::Empty);
    }

    #[test]
    fn empty_array_is_items_not_empty() {
        assert_matches!(normalize::<Order>(&json!([])), Collection::Items(v) if v.is_empty());
    }

    // -- record decoding -----------------------------------------------------

    #[test]
    fn aliases_fill_canonical_keys() {
        let raw = json!([{"_id": "a1", "name": "Chiller", "serialNumber": "SN-9"}]);
        let assets = normalize::<Asset>(&raw).into_vec();
        assert_eq!(assets[0].title.as_deref(), Some("Chiller"));
        assert_eq!(assets[0].serial_number.as_deref(), Some("SN-9"));
    }

    #[test]
    fn canonical_key_wins_over_alias() {
        let raw = json!([{"name": "Main", "title": "Legacy"}]);
        let projects = normalize::<Project>(&raw).into_vec();
        assert_eq!(projects[0].name.as_deref(), Some("Main"));
    }

    #[test]
    fn non_object_elements_are_skipped_or_promoted() {
        let raw = json!(["o1", 42, null, {"order_number": "WO-5"}]);
        let orders = normalize::<Order>(&raw).into_vec();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id.as_deref(), Some("o1"));
    }

    #[test]
    fn nested_project_lists_accept_ids() {
        let raw = json!({"_id": "p1", "assets": ["a1", {"_id": "a2", "title": "Pump"}]});
        let project = normalize_record::<Project>(&raw).unwrap();
        assert_eq!(project.assets.len(), 2);
        assert_eq!(project.assets[1].title.as_deref(), Some("Pump"));
    }

    #[test]
    fn single_record_envelopes() {
        let wrapped = json!({"order": {"_id": "o1", "amount": {"$numberDecimal": "9.50"}}});
        let order = normalize_record::<Order>(&wrapped).unwrap();
        assert_eq!(order.amount_str(), Some("9.50"));

        let data = json!({"data": {"_id": "o2"}});
        assert_eq!(
            normalize_record::<Order>(&data).and_then(|o| o.id),
            Some("o2".to_string())
        );
    }
}
