//! Task documents, owned by a work order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{collect_fields, parse_sort_field, Entity, EntityKind, SortField, UnknownField};
use crate::models::{lenient, Reference};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Priority / status vocabularies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl TaskStatus {
    pub const ALL: &'static [Self] = &[Self::Todo, Self::InProgress, Self::Completed, Self::OnHold];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }
}

/// Case-insensitive label match that treats `-`, `_` and spaces alike, so
/// `in-progress`, `In Progress` and `IN_PROGRESS` all parse.
fn vocabulary_key(label: &str) -> String {
    label
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returned when a priority or status label is outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TaskPriority {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = vocabulary_key(s);
        Self::ALL
            .iter()
            .copied()
            .find(|p| vocabulary_key(p.as_str()) == key)
            .ok_or_else(|| UnknownLabel {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = vocabulary_key(s);
        Self::ALL
            .iter()
            .copied()
            .find(|p| vocabulary_key(p.as_str()) == key)
            .ok_or_else(|| UnknownLabel {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Task document
// ---------------------------------------------------------------------------

/// A unit of work on an order. The related documents are denormalized
/// id+name copies taken when the task was saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", default, deserialize_with = "lenient::id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub order: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub customer: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub user: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub project: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::reference")]
    pub asset: Option<Reference>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub actual_start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub actual_end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub file_upload: Vec<String>,
}

impl Task {
    pub fn priority_level(&self) -> Option<TaskPriority> {
        self.priority.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn status_value(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn asset_name(&self) -> Option<&str> {
        self.asset.as_ref().and_then(Reference::display_name)
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(Reference::display_name)
    }
}

/// A file to upload alongside a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    Title,
    Priority,
    Status,
    Asset,
    StartTime,
    EndTime,
}

impl SortField for TaskSortField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Priority,
        Self::Status,
        Self::Asset,
        Self::StartTime,
        Self::EndTime,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Asset => "asset",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
        }
    }
}

impl FromStr for TaskSortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sort_field(s)
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("startTime", "start_time"),
        ("endTime", "end_time"),
        ("actualStartTime", "actual_start_time"),
        ("actualEndTime", "actual_end_time"),
        ("fileUpload", "file_upload"),
        ("assignee", "user"),
    ];

    type SortField = TaskSortField;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        collect_fields([
            self.title.as_deref(),
            self.description.as_deref(),
            self.priority.as_deref(),
            self.status.as_deref(),
            self.asset_name(),
            self.assignee_name(),
        ])
    }

    fn sort_value(&self, field: TaskSortField) -> String {
        let value = match field {
            TaskSortField::Title => self.title.as_deref(),
            TaskSortField::Priority => self.priority.as_deref(),
            TaskSortField::Status => self.status.as_deref(),
            TaskSortField::Asset => self.asset_name(),
            TaskSortField::StartTime => self.start_time.as_deref(),
            TaskSortField::EndTime => self.end_time.as_deref(),
        };
        value.unwrap_or_default().to_string()
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
