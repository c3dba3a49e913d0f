//! Denormalized references between documents.

use serde::Serialize;
use serde_json::Value;

use crate::models::lenient::{id_from_value, scalar_to_string};
use crate::types::EntityId;

/// A copy of another document's id and display name.
///
/// The API sends either a bare id string or an embedded object; both
/// decode into this type. These are snapshots, not live joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Reference {
    /// Decode a reference from a bare id or an embedded document.
    ///
    /// Returns `None` when neither an id nor a name can be found.
    pub fn from_value(value: &Value) -> Option<Self> {
        let reference = match value {
            Value::String(_) | Value::Number(_) => Self {
                id: id_from_value(value),
                name: None,
            },
            Value::Object(map) => Self {
                id: map
                    .get("_id")
                    .or_else(|| map.get("id"))
                    .and_then(id_from_value),
                name: scalar_to_string(value),
            },
            _ => return None,
        };

        if reference.id.is_none() && reference.name.is_none() {
            None
        } else {
            Some(reference)
        }
    }

    /// Human-facing label: the embedded name, else the raw id.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
