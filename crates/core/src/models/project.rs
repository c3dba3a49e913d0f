//! Project documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{collect_fields, parse_sort_field, Entity, EntityKind, SortField, UnknownField};
use crate::models::{lenient, Asset, Order, Reference};
use crate::types::EntityId;

/// A customer project. `status` is a free-text label with no enforced set
/// of values and inconsistent casing (`Active`, `in-progress`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(rename = "startDate", default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default, deserialize_with = "lenient::string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub customer: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub assets: Vec<Asset>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub orders: Vec<Order>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub modified_at: Option<String>,
}

impl Project {
    /// `name`, which older documents spell `title`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSortField {
    Name,
    Status,
    StartDate,
    EndDate,
    Created,
}

impl SortField for ProjectSortField {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Status,
        Self::StartDate,
        Self::EndDate,
        Self::Created,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Created => "created_at",
        }
    }
}

impl FromStr for ProjectSortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sort_field(s)
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("title", "name"),
        ("start_date", "startDate"),
        ("end_date", "endDate"),
        ("createdAt", "created_at"),
        ("modifiedAt", "modified_at"),
        ("updatedAt", "modified_at"),
    ];

    type SortField = ProjectSortField;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        collect_fields([
            self.name.as_deref(),
            self.description.as_deref(),
            self.status.as_deref(),
        ])
    }

    fn sort_value(&self, field: ProjectSortField) -> String {
        let value = match field {
            ProjectSortField::Name => self.name.as_deref(),
            ProjectSortField::Status => self.status.as_deref(),
            ProjectSortField::StartDate => self.start_date.as_deref(),
            ProjectSortField::EndDate => self.end_date.as_deref(),
            ProjectSortField::Created => self.created_at.as_deref(),
        };
        value.unwrap_or_default().to_string()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
