//! Operator accounts (employees and administrators).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{collect_fields, parse_sort_field, Entity, EntityKind, SortField, UnknownField};
use crate::models::lenient;
use crate::roles;
use crate::types::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(rename = "customerId", default, deserialize_with = "lenient::id")]
    pub customer_id: Option<EntityId>,
}

/// Users a task may be assigned to: operator accounts with the given role.
/// Accounts without a role are never assignable.
pub fn assignable_users<'a>(users: &'a [User], role: &str) -> Vec<&'a User> {
    users
        .iter()
        .filter(|u| {
            u.role
                .as_deref()
                .is_some_and(|r| roles::is_staff(r) && r.eq_ignore_ascii_case(role))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortField {
    Name,
    Email,
    Role,
}

impl SortField for UserSortField {
    const ALL: &'static [Self] = &[Self::Name, Self::Email, Self::Role];

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

impl FromStr for UserSortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sort_field(s)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] =
        &[("customer_id", "customerId"), ("username", "name")];

    type SortField = UserSortField;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        collect_fields([
            self.name.as_deref(),
            self.email.as_deref(),
            self.role.as_deref(),
        ])
    }

    fn sort_value(&self, field: UserSortField) -> String {
        let value = match field {
            UserSortField::Name => self.name.as_deref(),
            UserSortField::Email => self.email.as_deref(),
            UserSortField::Role => self.role.as_deref(),
        };
        value.unwrap_or_default().to_string()
    }
}
