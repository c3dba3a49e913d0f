//! Asset (installed equipment) documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{collect_fields, parse_sort_field, Entity, EntityKind, SortField, UnknownField};
use crate::models::{lenient, Reference};
use crate::types::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub customer: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub project: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
}

impl Asset {
    pub fn display_name(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSortField {
    Title,
    Category,
    Manufacturer,
    Model,
    SerialNumber,
    Area,
}

impl SortField for AssetSortField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Category,
        Self::Manufacturer,
        Self::Model,
        Self::SerialNumber,
        Self::Area,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Category => "category",
            Self::Manufacturer => "manufacturer",
            Self::Model => "model",
            Self::SerialNumber => "serial_number",
            Self::Area => "area",
        }
    }
}

impl FromStr for AssetSortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sort_field(s)
    }
}

impl Entity for Asset {
    const KIND: EntityKind = EntityKind::Asset;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] =
        &[("name", "title"), ("serialNumber", "serial_number")];

    type SortField = AssetSortField;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        collect_fields([
            self.title.as_deref(),
            self.category.as_deref(),
            self.manufacturer.as_deref(),
            self.barcode.as_deref(),
            self.model.as_deref(),
            self.serial_number.as_deref(),
            self.area.as_deref(),
        ])
    }

    fn sort_value(&self, field: AssetSortField) -> String {
        let value = match field {
            AssetSortField::Title => self.title.as_deref(),
            AssetSortField::Category => self.category.as_deref(),
            AssetSortField::Manufacturer => self.manufacturer.as_deref(),
            AssetSortField::Model => self.model.as_deref(),
            AssetSortField::SerialNumber => self.serial_number.as_deref(),
            AssetSortField::Area => self.area.as_deref(),
        };
        value.unwrap_or_default().to_string()
    }
}
