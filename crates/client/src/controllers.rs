//! Form submission: validate locally, send through the API, then fold the
//! outcome back into the form and the session.

use portal_core::entity::Entity;
use portal_core::forms::{FormController, Lookup, PasswordDraft, ProfileDraft, TaskForm};
use portal_core::identity::{ActingParty, Identity};
use portal_core::models::user::assignable_users;
use portal_core::models::{Asset, Task, User};
use portal_core::normalize::{normalize, normalize_record};
use portal_core::roles;
use portal_core::session::SessionContext;
use serde_json::json;

use crate::api::{ApiError, PortalApi};
use crate::error::ClientResult;
use crate::screen::Screen;

/// Submit the profile form for the acting party.
///
/// Validation failures return before any request is made. On success the
/// session blob is updated so the header shows the new name immediately.
pub async fn submit_profile(
    api: &PortalApi,
    session: &SessionContext,
    form: &mut FormController<ProfileDraft>,
) -> ClientResult<Identity> {
    let identity = session.require()?;
    let draft = form.submit()?;
    let body = json!({
        "name": draft.name.trim(),
        "email": draft.email.trim(),
        "phone": draft.phone.trim(),
    });

    let result = match (identity.acting_party(), identity.party_id()) {
        (ActingParty::Customer(_), Some(id)) => api.update_customer(id, &body).await,
        (ActingParty::Employee(_), Some(id)) => api.update_user(id, &body).await,
        (_, None) => Err(ApiError::RequestFailed {
            status: 400,
            message: "Signed-in profile has no id".into(),
        }),
    };

    if let Err(e) = result {
        form.complete(Err(e.to_string()))?;
        return Err(e.into());
    }

    let updated = match session.update(|identity| draft.apply_to(identity)) {
        Ok(updated) => updated,
        Err(e) => {
            form.complete(Err(e.to_string()))?;
            return Err(e.into());
        }
    };
    form.complete(Ok(draft))?;
    tracing::info!(role = updated.role(), "Profile updated");
    Ok(updated)
}

/// Submit the password form. A short or mismatched password fails locally.
pub async fn submit_password(
    api: &PortalApi,
    session: &SessionContext,
    form: &mut FormController<PasswordDraft>,
) -> ClientResult<()> {
    let identity = session.require()?;
    let draft = form.submit()?;
    let body = draft.payload();

    let result = match (identity.is_customer(), identity.party_id()) {
        (true, Some(id)) => api.change_customer_password(id, &body).await,
        (false, Some(id)) => api.change_user_password(id, &body).await,
        (_, None) => Err(ApiError::RequestFailed {
            status: 400,
            message: "Signed-in profile has no id".into(),
        }),
    };

    if let Err(e) = result {
        form.complete(Err(e.to_string()))?;
        return Err(e.into());
    }

    // The stored blob must not keep a stale secret.
    let cleared = session.update(|identity| {
        if let Some(customer) = identity.customer_profile_mut() {
            customer.password = None;
        }
    });
    if let Err(e) = cleared {
        form.complete(Err(e.to_string()))?;
        return Err(e.into());
    }
    form.complete(Ok(PasswordDraft::default()))?;
    tracing::info!("Password changed");
    Ok(())
}

/// Load the task form's asset and assignee lists.
///
/// Both lookups start together and each is applied to the mounted form as
/// soon as its own response arrives, so one selector can become usable
/// while the other is still loading or has failed.
pub async fn load_task_lookups(api: &PortalApi, screen: &Screen<TaskForm>) {
    let project_id = screen
        .update(|form| {
            form.assets = Lookup::Loading;
            form.users = Lookup::Loading;
            form.project_id().map(str::to_string)
        })
        .await;

    let assets = screen.run(
        async {
            match project_id.as_deref() {
                Some(id) => api.assets_by_project(id).await.map(Some),
                None => Ok(None),
            }
        },
        |form, result| {
            form.assets = match result {
                Ok(Some(raw)) => Lookup::Ready(normalize::<Asset>(&raw).into_vec()),
                Ok(None) => Lookup::Ready(Vec::new()),
                Err(e) => Lookup::Failed(e.to_string()),
            };
        },
    );
    let users = screen.run(api.list_users(), |form, result| {
        form.users = match result {
            Ok(raw) => {
                let all = normalize::<User>(&raw).into_vec();
                let assignable = assignable_users(&all, roles::ROLE_EMPLOYEE)
                    .into_iter()
                    .cloned()
                    .collect();
                Lookup::Ready(assignable)
            }
            Err(e) => Lookup::Failed(e.to_string()),
        };
    });

    let (assets, users) = tokio::join!(assets, users);
    if assets.is_discarded() || users.is_discarded() {
        tracing::debug!("Task form closed before its lookups finished");
    }
}

/// Create or update the task. Returns the saved task as the API echoes it,
/// falling back to the submitted values when the response carries none.
pub async fn submit_task(api: &PortalApi, form: &mut TaskForm) -> ClientResult<Task> {
    let submission = form.submit()?;
    let draft = form.controller.draft().clone();

    let result = match &submission.id {
        Some(id) => {
            api.update_task(id, &submission.body, &submission.attachments)
                .await
        }
        None => api.create_task(&submission.body, &submission.attachments).await,
    };

    let raw = match result {
        Ok(raw) => raw,
        Err(e) => {
            form.controller.complete(Err(e.to_string()))?;
            return Err(e.into());
        }
    };

    let saved = normalize_record::<Task>(&raw)
        .or_else(|| serde_json::from_value(serde_json::Value::Object(submission.body.clone())).ok())
        .unwrap_or_default();
    form.controller.complete(Ok(draft))?;
    tracing::info!(
        id = saved.id().unwrap_or("-"),
        attachments = submission.attachments.len(),
        "Task saved"
    );
    Ok(saved)
}
