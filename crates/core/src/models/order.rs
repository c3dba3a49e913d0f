//! Work order documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{collect_fields, parse_sort_field, Entity, EntityKind, SortField, UnknownField};
use crate::models::{lenient, Amount, Reference};
use crate::types::EntityId;

/// A work order raised against a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<Amount>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub customer: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub project: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub erp_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
}

impl Order {
    /// Display name of the owning project, if known.
    pub fn project_name(&self) -> Option<&str> {
        self.project.as_ref().and_then(Reference::display_name)
    }

    pub fn amount_str(&self) -> Option<&str> {
        self.amount.as_ref().map(Amount::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortField {
    OrderNumber,
    Title,
    Project,
    Status,
    Amount,
    Created,
}

impl SortField for OrderSortField {
    const ALL: &'static [Self] = &[
        Self::OrderNumber,
        Self::Title,
        Self::Project,
        Self::Status,
        Self::Amount,
        Self::Created,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::OrderNumber => "order_number",
            Self::Title => "title",
            Self::Project => "project",
            Self::Status => "status",
            Self::Amount => "amount",
            Self::Created => "created_at",
        }
    }
}

impl FromStr for OrderSortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sort_field(s)
    }
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("orderNumber", "order_number"),
        ("erpNumber", "erp_number"),
        ("createdAt", "created_at"),
    ];

    type SortField = OrderSortField;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        collect_fields([
            self.order_number.as_deref(),
            self.title.as_deref(),
            self.project_name(),
            self.amount_str(),
            self.status.as_deref(),
            self.erp_number.as_deref(),
        ])
    }

    fn sort_value(&self, field: OrderSortField) -> String {
        let value = match field {
            OrderSortField::OrderNumber => self.order_number.as_deref(),
            OrderSortField::Title => self.title.as_deref(),
            OrderSortField::Project => self.project_name(),
            OrderSortField::Status => self.status.as_deref(),
            OrderSortField::Amount => self.amount_str(),
            OrderSortField::Created => self.created_at.as_deref(),
        };
        value.unwrap_or_default().to_string()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
