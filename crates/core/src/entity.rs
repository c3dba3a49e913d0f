//! The per-entity field accessor table consumed by the generic list view.
//!
//! The list view, filter, sorter, status summary and CSV exporter are all
//! entity-agnostic; each entity plugs in by implementing [`Entity`].

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

/// The kinds of documents exchanged with the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Order,
    Asset,
    Task,
    User,
}

impl EntityKind {
    /// Pluralized key used by envelope responses and REST paths.
    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Order => "orders",
            Self::Asset => "assets",
            Self::Task => "tasks",
            Self::User => "users",
        }
    }

    /// Singular key used by single-record envelopes (`{"order": {...}}`).
    pub fn record_key(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Order => "order",
            Self::Asset => "asset",
            Self::Task => "task",
            Self::User => "user",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Order => "Order",
            Self::Asset => "Asset",
            Self::Task => "Task",
            Self::User => "User",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sortable column of some entity.
pub trait SortField:
    Copy + Eq + fmt::Debug + FromStr<Err = UnknownField> + Send + Sync + 'static
{
    /// Every sortable column, in display order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// Returned when a sort column name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort field '{0}'")]
pub struct UnknownField(pub String);

/// Parse a sort column by its [`SortField::as_str`] name, ignoring case and
/// treating `-`/`_`/space as equivalent.
pub fn parse_sort_field<F: SortField>(input: &str) -> Result<F, UnknownField> {
    let wanted = canonical_field_name(input);
    F::ALL
        .iter()
        .copied()
        .find(|field| canonical_field_name(field.as_str()) == wanted)
        .ok_or_else(|| UnknownField(input.to_string()))
}

fn canonical_field_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Field accessors for one entity type.
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Alternate key spellings the API uses, as `(alternate, canonical)`.
    /// The alternate is moved onto the canonical key before decoding when
    /// the canonical key is absent.
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[];

    type SortField: SortField;

    fn id(&self) -> Option<&str>;

    /// Derived strings matched by the free-text filter.
    fn search_fields(&self) -> Vec<String>;

    /// String projection of a column. Missing values project to `""`.
    fn sort_value(&self, field: Self::SortField) -> String;

    /// Raw status label, when the entity carries one.
    fn status(&self) -> Option<&str> {
        None
    }
}

/// Push the non-missing values of `fields` into a search list.
pub(crate) fn collect_fields<'a>(fields: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    fields.into_iter().flatten().map(str::to_string).collect()
}
