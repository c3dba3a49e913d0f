//! Screen loaders: fetch through the API, normalize, and apply to a mounted
//! [`Screen`].

use portal_core::dashboard::DashboardSummary;
use portal_core::entity::{Entity, EntityKind};
use portal_core::error::CoreError;
use portal_core::identity::Scope;
use portal_core::models::{Asset, Order, Project, Task};
use portal_core::normalize::{normalize, normalize_record};
use portal_core::view_model::ListView;
use serde_json::Value;

use crate::actions::RowActions;
use crate::api::{ApiError, PortalApi};
use crate::error::{ClientError, ClientResult};
use crate::screen::{Applied, Screen};

/// Fetch the raw list response for `T` within `scope`.
pub async fn fetch_list<T: Entity>(api: &PortalApi, scope: &Scope) -> Result<Value, ApiError> {
    match T::KIND {
        EntityKind::Project => api.list_projects(scope).await,
        EntityKind::Order => api.list_orders(scope).await,
        EntityKind::Asset => api.list_assets(scope).await,
        EntityKind::Task => api.list_tasks(scope).await,
        EntityKind::User => api.list_users().await,
    }
}

/// Load a list screen.
///
/// On failure the collection is emptied and the message is kept on the
/// view, so the table shows its explicit empty state instead of stale rows.
pub async fn load_list<T: Entity>(
    screen: &Screen<ListView<T>>,
    api: &PortalApi,
    scope: &Scope,
) -> Applied<Result<usize, String>> {
    screen
        .run(fetch_list::<T>(api, scope), |view, result| match result {
            Ok(raw) => {
                view.load_response(&raw);
                tracing::debug!(kind = %T::KIND, count = view.records().len(), "List loaded");
                Ok(view.records().len())
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(kind = %T::KIND, error = %message, "List load failed");
                view.fail(message.clone());
                Err(message)
            }
        })
        .await
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub summary: Option<DashboardSummary>,
    pub error: Option<String>,
}

/// Fetch the four collections concurrently and aggregate them. Any single
/// failure fails the whole load; no partial summary is produced.
pub async fn fetch_dashboard(api: &PortalApi, scope: &Scope) -> Result<DashboardSummary, ApiError> {
    let (projects, orders, assets, tasks) = tokio::try_join!(
        api.list_projects(scope),
        api.list_orders(scope),
        api.list_assets(scope),
        api.list_tasks(scope),
    )?;

    Ok(DashboardSummary::compute(
        normalize::<Project>(&projects).as_slice(),
        normalize::<Order>(&orders).as_slice(),
        normalize::<Asset>(&assets).as_slice(),
        normalize::<Task>(&tasks).as_slice(),
    ))
}

pub async fn load_dashboard(
    screen: &Screen<DashboardState>,
    api: &PortalApi,
    scope: &Scope,
) -> Applied<()> {
    screen
        .run(fetch_dashboard(api, scope), |state, result| match result {
            Ok(summary) => {
                state.summary = Some(summary);
                state.error = None;
            }
            Err(e) => {
                state.summary = None;
                state.error = Some(e.to_string());
            }
        })
        .await
}

// ---------------------------------------------------------------------------
// Detail views
// ---------------------------------------------------------------------------

/// A work order with its tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub tasks: Vec<Task>,
}

/// Fetch an order and its tasks concurrently.
pub async fn fetch_order_detail(api: &PortalApi, id: &str) -> ClientResult<OrderDetail> {
    let (order, tasks) = tokio::try_join!(api.get_order(id), api.tasks_by_order(id))?;
    let order = normalize_record::<Order>(&order).ok_or_else(|| not_found(EntityKind::Order, id))?;
    Ok(OrderDetail {
        order,
        tasks: normalize::<Task>(&tasks).into_vec(),
    })
}

/// Fetch a project. Its assets and orders come embedded when the API
/// populates them; otherwise they are fetched by project id.
pub async fn fetch_project_detail(api: &PortalApi, id: &str) -> ClientResult<Project> {
    let raw = api.get_project(id).await?;
    let mut project =
        normalize_record::<Project>(&raw).ok_or_else(|| not_found(EntityKind::Project, id))?;

    if project.assets.is_empty() || project.orders.is_empty() {
        let (assets, orders) = tokio::try_join!(api.assets_by_project(id), api.orders_by_project(id))?;
        if project.assets.is_empty() {
            project.assets = normalize::<Asset>(&assets).into_vec();
        }
        if project.orders.is_empty() {
            project.orders = normalize::<Order>(&orders).into_vec();
        }
    }
    Ok(project)
}

pub async fn fetch_asset(api: &PortalApi, id: &str) -> ClientResult<Asset> {
    let raw = api.get_asset(id).await?;
    normalize_record::<Asset>(&raw).ok_or_else(|| not_found(EntityKind::Asset, id))
}

pub async fn fetch_task(api: &PortalApi, id: &str) -> ClientResult<Task> {
    let raw = api.get_task(id).await?;
    normalize_record::<Task>(&raw).ok_or_else(|| not_found(EntityKind::Task, id))
}

fn not_found(kind: EntityKind, id: &str) -> ClientError {
    CoreError::NotFound {
        entity: kind.label(),
        id: id.to_string(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// Row actions
// ---------------------------------------------------------------------------

/// Delete one row. The row is claimed in `actions` for the duration of the
/// request and is removed from the view only when the API confirms.
pub async fn delete_row<T: Entity>(
    screen: &Screen<ListView<T>>,
    api: &PortalApi,
    actions: &RowActions,
    id: &str,
) -> ClientResult<()> {
    let guard = actions
        .begin(id)
        .ok_or_else(|| ClientError::Busy(id.to_string()))?;

    let request = async {
        match T::KIND {
            EntityKind::Order => api.delete_order(id).await.map_err(ClientError::from),
            EntityKind::Task => api.delete_task(id).await.map_err(ClientError::from),
            kind => Err(CoreError::Forbidden(format!("{kind} records cannot be deleted here")).into()),
        }
    };

    let outcome = screen
        .run(request, |view, result| {
            if result.is_ok() {
                view.remove(id);
            }
            result
        })
        .await;
    guard.finish();

    match outcome {
        Applied::Applied(result) => result.map(|_| ()),
        Applied::Discarded => Err(ClientError::Unmounted),
    }
}
