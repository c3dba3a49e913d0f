//! Task add/edit form.
//!
//! A task belongs to an order. The asset selector lists the assets of the
//! order's project and the assignee selector lists users with the
//! assignable role; each list loads independently. Choosing an asset is a
//! hard precondition: a draft without one fails validation locally.

use serde_json::{json, Map, Value};
use validator::Validate;

use crate::entity::Entity;
use crate::forms::lookup::Lookup;
use crate::forms::state::{FormController, FormError};
use crate::forms::validation::required_text;
use crate::models::{Asset, Attachment, Order, Reference, Task, TaskPriority, TaskStatus, User};
use crate::types::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TaskDraft {
    /// Set when editing an existing task.
    pub id: Option<EntityId>,
    #[validate(custom(function = "required_text"))]
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[validate(required(message = "select an asset"))]
    pub asset_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl TaskDraft {
    /// Seed a draft from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone().unwrap_or_default(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority_level().unwrap_or_default(),
            status: task.status_value().unwrap_or_default(),
            asset_id: task.asset.as_ref().and_then(|a| a.id.clone()),
            user_id: task.user.as_ref().and_then(|u| u.id.clone()),
            start_time: task.start_time.clone(),
            end_time: task.end_time.clone(),
            attachments: Vec::new(),
        }
    }

    /// Select an asset; a blank id clears the selection.
    pub fn set_asset(&mut self, id: Option<&str>) {
        self.asset_id = non_blank(id);
    }

    pub fn set_user(&mut self, id: Option<&str>) {
        self.user_id = non_blank(id);
    }
}

fn non_blank(id: Option<&str>) -> Option<EntityId> {
    id.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A validated task ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSubmission {
    /// `None` for creation, the task id for an update.
    pub id: Option<EntityId>,
    pub body: Map<String, Value>,
    pub attachments: Vec<Attachment>,
}

/// Task form state: the draft plus its two secondary lookups.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub controller: FormController<TaskDraft>,
    pub order: Order,
    pub assets: Lookup<Asset>,
    pub users: Lookup<User>,
}

impl TaskForm {
    /// Blank form for adding a task to `order`.
    pub fn create(order: Order) -> Self {
        Self {
            controller: FormController::editing(TaskDraft::default()),
            order,
            assets: Lookup::Idle,
            users: Lookup::Idle,
        }
    }

    /// Form editing `task` on `order`.
    pub fn edit(order: Order, task: &Task) -> Self {
        Self {
            controller: FormController::editing(TaskDraft::from_task(task)),
            order,
            assets: Lookup::Idle,
            users: Lookup::Idle,
        }
    }

    /// Project whose assets populate the asset selector.
    pub fn project_id(&self) -> Option<&str> {
        self.order.project.as_ref().and_then(Reference::id)
    }

    pub fn is_create(&self) -> bool {
        self.controller.draft().id.is_none()
    }

    /// Validate locally and build the request. Fails with a validation
    /// error, without any network call, when the draft is incomplete.
    pub fn submit(&mut self) -> Result<TaskSubmission, FormError> {
        let draft = self.controller.submit()?;
        Ok(TaskSubmission {
            id: draft.id.clone(),
            body: self.payload(&draft),
            attachments: draft.attachments,
        })
    }

    /// Request body: scalar fields plus denormalized id+name references.
    fn payload(&self, draft: &TaskDraft) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("title".into(), json!(draft.title.trim()));
        body.insert("description".into(), json!(draft.description));
        body.insert("priority".into(), json!(draft.priority));
        body.insert("status".into(), json!(draft.status));

        let asset = draft.asset_id.as_deref().map(|id| {
            let name = self
                .assets
                .options()
                .and_then(|assets| find_by_id(assets, id))
                .and_then(Asset::display_name);
            reference_json(id, name)
        });
        let user = draft.user_id.as_deref().map(|id| {
            let name = self
                .users
                .options()
                .and_then(|users| find_by_id(users, id))
                .and_then(|u| u.name.as_deref());
            reference_json(id, name)
        });
        let order = self.order.id.as_deref().map(|id| {
            let label = self.order.order_number.as_deref().or(self.order.title.as_deref());
            reference_json(id, label)
        });

        for (key, value) in [
            ("asset", asset),
            ("user", user),
            ("order", order),
            ("project", self.order.project.as_ref().map(reference_value)),
            ("customer", self.order.customer.as_ref().map(reference_value)),
        ] {
            if let Some(value) = value {
                body.insert(key.into(), value);
            }
        }

        if let Some(start) = &draft.start_time {
            body.insert("start_time".into(), json!(start));
        }
        if let Some(end) = &draft.end_time {
            body.insert("end_time".into(), json!(end));
        }
        body
    }
}

fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == Some(id))
}

fn reference_json(id: &str, name: Option<&str>) -> Value {
    match name {
        Some(name) => json!({"_id": id, "name": name}),
        None => json!({"_id": id}),
    }
}

fn reference_value(reference: &Reference) -> Value {
    match (&reference.id, &reference.name) {
        (Some(id), name) => reference_json(id, name.as_deref()),
        (None, Some(name)) => json!({"name": name}),
        (None, None) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn order() -> Order {
        Order {
            id: Some("o1".into()),
            order_number: Some("WO-1".into()),
            project: Some(Reference {
                id: Some("p1".into()),
                name: Some("Plant".into()),
            }),
            customer: Some(Reference {
                id: Some("c1".into()),
                name: None,
            }),
            ..Default::default()
        }
    }

    fn pump() -> Asset {
        Asset {
            id: Some("a1".into()),
            title: Some("Pump".into()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_asset_fails_locally() {
        let mut form = TaskForm::create(order());
        form.controller
            .edit(|d| {
                d.title = "Inspect seals".into();
                d.description = "Quarterly".into();
                d.user_id = Some("u1".into());
            })
            .unwrap();

        let err = form.submit().unwrap_err();
        assert_matches!(err, FormError::Validation(v) if v.has_field("asset_id") && v.fields.len() == 1);
    }

    #[test]
    fn blank_asset_id_counts_as_missing() {
        let mut draft = TaskDraft::default();
        draft.set_asset(Some("  "));
        assert!(draft.asset_id.is_none());
    }

    #[test]
    fn payload_carries_denormalized_references() {
        let mut form = TaskForm::create(order());
        form.assets = Lookup::Ready(vec![pump()]);
        form.controller
            .edit(|d| {
                d.title = "Inspect seals".into();
                d.set_asset(Some("a1"));
                d.status = TaskStatus::InProgress;
            })
            .unwrap();

        let submission = form.submit().unwrap();
        assert!(submission.id.is_none());
        assert_eq!(submission.body["asset"], json!({"_id": "a1", "name": "Pump"}));
        assert_eq!(submission.body["order"], json!({"_id": "o1", "name": "WO-1"}));
        assert_eq!(submission.body["project"], json!({"_id": "p1", "name": "Plant"}));
        assert_eq!(submission.body["customer"], json!({"_id": "c1"}));
        assert_eq!(submission.body["status"], "In Progress");
        assert!(submission.body.get("user").is_none());
    }

    #[test]
    fn asset_name_is_omitted_while_lookup_is_loading() {
        let mut form = TaskForm::create(order());
        form.assets = Lookup::Loading;
        form.controller
            .edit(|d| {
                d.title = "T".into();
                d.set_asset(Some("a1"));
            })
            .unwrap();
        let submission = form.submit().unwrap();
        assert_eq!(submission.body["asset"], json!({"_id": "a1"}));
    }

    #[test]
    fn edit_form_keeps_the_task_id() {
        let task = Task {
            id: Some("t1".into()),
            title: Some("Old".into()),
            priority: Some("High".into()),
            asset: Some(Reference {
                id: Some("a1".into()),
                name: None,
            }),
            ..Default::default()
        };
        let mut form = TaskForm::edit(order(), &task);
        assert!(!form.is_create());
        assert_eq!(form.controller.draft().priority, TaskPriority::High);
        assert_eq!(form.submit().unwrap().id.as_deref(), Some("t1"));
        assert_eq!(form.project_id(), Some("p1"));
    }
}
