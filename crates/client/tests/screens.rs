mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use portal_client::actions::RowActions;
use portal_client::controllers::{load_task_lookups, submit_password, submit_profile, submit_task};
use portal_client::screens::{
    delete_row, fetch_order_detail, load_dashboard, load_list, DashboardState,
};
use portal_client::{Applied, ClientError, Screen};
use portal_core::forms::{FormController, FormError, FormPhase, PasswordDraft, ProfileDraft, TaskForm};
use portal_core::identity::{Identity, Scope, UserProfile};
use portal_core::models::{Order, OrderSortField};
use portal_core::session::{MemorySessionStore, SessionContext, SessionError, SessionStore};
use portal_core::view_model::{ListView, SortDirection, SortState};

fn customer_session() -> (SessionContext, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::with_blob(common::customer_login()));
    let session = SessionContext::open(store.clone()).unwrap();
    (session, store)
}

// -- list screens -------------------------------------------------------------

#[tokio::test]
async fn order_list_normalizes_filters_and_sorts() {
    let fake = common::spawn().await;
    let screen = Screen::mount(ListView::<Order>::new());

    let loaded = load_list(&screen, &fake.api, &Scope::Customer("c1".into())).await;
    assert_eq!(loaded, Applied::Applied(Ok(2)));

    screen
        .update(|view| {
            view.set_sort(Some(SortState {
                field: OrderSortField::Amount,
                direction: SortDirection::Descending,
            }));
        })
        .await;
    let numbers: Vec<String> = screen
        .read(|view| {
            view.rows()
                .iter()
                .filter_map(|o| o.order_number.clone())
                .collect()
        })
        .await;
    assert_eq!(numbers, ["WO-2", "WO-1"]);

    screen.update(|view| view.set_query("wo-2")).await;
    let filtered = screen.read(|view| view.rows().len()).await;
    assert_eq!(filtered, 1);
}

#[tokio::test]
async fn unmounted_screen_ignores_the_late_result() {
    let fake = common::spawn().await;
    let screen = Screen::mount(ListView::<portal_core::models::Project>::new());

    let handle = screen.clone();
    let api = fake.api.clone();
    let pending = tokio::spawn(async move { load_list(&handle, &api, &Scope::All).await });

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    screen.unmount();

    assert!(pending.await.unwrap().is_discarded());
    assert!(!screen.read(|view| view.is_loaded()).await);
    assert!(fake.hits.contains("GET /api/projects"));
}

// -- dashboard ----------------------------------------------------------------

#[tokio::test]
async fn dashboard_aggregates_all_four_collections() {
    let fake = common::spawn().await;
    let screen = Screen::mount(DashboardState::default());
    load_dashboard(&screen, &fake.api, &Scope::Customer("c1".into())).await;

    let state = screen.read(|s| s.clone()).await;
    let summary = state.summary.unwrap();
    assert_eq!(summary.projects.total, 2);
    assert_eq!(summary.projects.active(), 1);
    assert_eq!(summary.orders.pending(), 1);
    assert_eq!(summary.tasks.count("On Hold"), 1);
    assert_eq!(summary.asset_total, 1);
    assert!((summary.order_value - 350.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn one_failed_fetch_fails_the_whole_dashboard() {
    let fake = common::spawn().await;
    let screen = Screen::mount(DashboardState::default());
    load_dashboard(&screen, &fake.api, &Scope::Employee("u1".into())).await;

    let state = screen.read(|s| s.clone()).await;
    assert!(state.summary.is_none());
    assert!(state.error.unwrap().contains("Task service unavailable"));
}

// -- detail and row actions -------------------------------------------------

#[tokio::test]
async fn order_detail_includes_tasks() {
    let fake = common::spawn().await;
    let detail = fetch_order_detail(&fake.api, "o1").await.unwrap();
    assert_eq!(detail.order.order_number.as_deref(), Some("WO-1"));
    assert_eq!(detail.tasks.len(), 2);
}

#[tokio::test]
async fn failed_delete_keeps_the_row() {
    let fake = common::spawn().await;
    let screen = Screen::mount(ListView::<Order>::new());
    load_list(&screen, &fake.api, &Scope::Customer("c1".into())).await;
    let actions = RowActions::new();

    let err = delete_row(&screen, &fake.api, &actions, "o2").await.unwrap_err();
    assert_matches!(err, ClientError::Api(_));
    assert!(screen.read(|v| v.find("o2").is_some()).await);

    delete_row(&screen, &fake.api, &actions, "o1").await.unwrap();
    assert!(screen.read(|v| v.find("o1").is_none()).await);
    assert_eq!(actions.busy_count(), 0);
}

#[tokio::test]
async fn busy_row_refuses_a_second_action() {
    let fake = common::spawn().await;
    let screen = Screen::mount(ListView::<Order>::new());
    let actions = RowActions::new();
    let _guard = actions.begin("o1").unwrap();

    let err = delete_row(&screen, &fake.api, &actions, "o1").await.unwrap_err();
    assert_matches!(err, ClientError::Busy(id) if id == "o1");
    assert_eq!(fake.hits.count(), 0);
}

// -- forms --------------------------------------------------------------------

#[tokio::test]
async fn profile_update_writes_through_to_the_session() {
    let fake = common::spawn().await;
    let (session, store) = customer_session();
    let identity = session.require().unwrap();

    let mut form = FormController::new(ProfileDraft::from_identity(&identity));
    form.begin_edit().unwrap();
    form.edit(|d| d.name = "Acme Ltd".into()).unwrap();

    let updated = submit_profile(&fake.api, &session, &mut form).await.unwrap();
    assert_eq!(updated.display_name(), "Acme Ltd");
    assert_eq!(form.phase(), FormPhase::Viewing);
    assert!(fake.hits.contains("PUT /api/customers/c1"));
    assert_eq!(store.read().unwrap().unwrap()["customer"]["name"], "Acme Ltd");
}

#[tokio::test]
async fn short_password_never_reaches_the_network() {
    let fake = common::spawn().await;
    let (session, _) = customer_session();

    let mut form = FormController::editing(PasswordDraft {
        current_password: "old-secret".into(),
        new_password: "abc".into(),
        confirm_password: "abc".into(),
    });
    let err = submit_password(&fake.api, &session, &mut form).await.unwrap_err();

    assert_matches!(err, ClientError::Form(FormError::Validation(v)) if v.has_field("new_password"));
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(fake.hits.count(), 0);
}

#[tokio::test]
async fn rejected_password_stays_editing_with_the_message() {
    let fake = common::spawn().await;
    let (session, _) = customer_session();

    let mut form = FormController::editing(PasswordDraft {
        current_password: "not-it".into(),
        new_password: "abcdef".into(),
        confirm_password: "abcdef".into(),
    });
    assert!(submit_password(&fake.api, &session, &mut form).await.is_err());
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_matches!(form.error(), Some(FormError::Submit(m)) if m.contains("Current password is incorrect"));
    assert_eq!(form.draft().new_password, "abcdef");

    form.edit(|d| d.current_password = "old-secret".into()).unwrap();
    submit_password(&fake.api, &session, &mut form).await.unwrap();
    assert_eq!(form.phase(), FormPhase::Viewing);
    assert!(form.draft().new_password.is_empty());
}

#[tokio::test]
async fn task_without_asset_fails_locally() {
    let fake = common::spawn().await;
    let mut form = TaskForm::create(Order {
        id: Some("o1".into()),
        ..Default::default()
    });
    form.controller.edit(|d| d.title = "Inspect".into()).unwrap();

    let err = submit_task(&fake.api, &mut form).await.unwrap_err();
    assert_matches!(err, ClientError::Form(FormError::Validation(v)) if v.has_field("asset_id"));
    assert_eq!(fake.hits.count(), 0);
}

#[tokio::test]
async fn task_lookups_then_submit() {
    let fake = common::spawn().await;
    let detail = fetch_order_detail(&fake.api, "o1").await.unwrap();
    let screen = Screen::mount(TaskForm::create(detail.order));

    load_task_lookups(&fake.api, &screen).await;
    let mut form = screen.into_state().unwrap();
    assert_eq!(form.assets.options().map(<[_]>::len), Some(1));
    let names: Vec<_> = form
        .users
        .options()
        .unwrap()
        .iter()
        .filter_map(|u| u.name.clone())
        .collect();
    assert_eq!(names, ["Eve", "Sam"]);

    form.controller
        .edit(|d| {
            d.title = "Inspect seals".into();
            d.set_asset(Some("a1"));
            d.set_user(Some("u1"));
        })
        .unwrap();
    let saved = submit_task(&fake.api, &mut form).await.unwrap();

    assert_eq!(saved.id.as_deref(), Some("t-new"));
    assert_eq!(saved.asset_name(), Some("Pump"));
    assert_eq!(saved.assignee_name(), Some("Eve"));
    assert_eq!(form.controller.phase(), FormPhase::Viewing);
}

#[tokio::test]
async fn asset_lookup_lands_before_the_slow_user_list() {
    let fake = common::spawn().await;
    let detail = fetch_order_detail(&fake.api, "o1").await.unwrap();
    let screen = Screen::mount(TaskForm::create(detail.order));

    let handle = screen.clone();
    let api = fake.api.clone();
    let pending = tokio::spawn(async move { load_task_lookups(&api, &handle).await });

    tokio::time::sleep(std::time::Duration::from_millis(80)).await;
    let (assets_ready, users_loading) = screen
        .read(|form| (form.assets.options().is_some(), form.users.is_loading()))
        .await;
    assert!(assets_ready);
    assert!(users_loading);

    pending.await.unwrap();
    assert!(screen.read(|form| form.users.options().is_some()).await);
}

/// Store that loads the signed-in blob but refuses every write.
struct ReadOnlyStore(serde_json::Value);

impl SessionStore for ReadOnlyStore {
    fn read(&self) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(Some(self.0.clone()))
    }

    fn write(&self, _blob: &serde_json::Value) -> Result<(), SessionError> {
        Err(std::io::Error::other("read-only").into())
    }

    fn remove(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[tokio::test]
async fn session_write_failure_returns_the_form_to_editing() {
    let fake = common::spawn().await;
    let session = SessionContext::open(Arc::new(ReadOnlyStore(common::customer_login()))).unwrap();
    let identity = session.require().unwrap();

    let mut form = FormController::new(ProfileDraft::from_identity(&identity));
    form.begin_edit().unwrap();
    form.edit(|d| d.name = "Acme Ltd".into()).unwrap();

    let err = submit_profile(&fake.api, &session, &mut form).await.unwrap_err();
    assert_matches!(err, ClientError::Session(SessionError::Io(_)));
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_matches!(form.error(), Some(FormError::Submit(m)) if m.contains("read-only"));
    form.edit(|d| d.phone = "555-0199".into()).unwrap();

    let mut password = FormController::editing(PasswordDraft {
        current_password: "old-secret".into(),
        new_password: "abcdef".into(),
        confirm_password: "abcdef".into(),
    });
    assert!(submit_password(&fake.api, &session, &mut password).await.is_err());
    assert_eq!(password.phase(), FormPhase::Editing);
}

#[tokio::test]
async fn employee_profile_uses_the_user_endpoint() {
    let fake = common::spawn().await;
    let session = SessionContext::ephemeral();
    session
        .sign_in(Identity::staff(
            UserProfile {
                id: Some("u1".into()),
                name: Some("Eve".into()),
                role: Some("employee".into()),
                ..Default::default()
            },
            None,
        ))
        .unwrap();

    let mut form = FormController::editing(ProfileDraft {
        name: "Eve".into(),
        email: "eve@ops.test".into(),
        phone: "1".into(),
    });
    // The fake has no PUT /users/{id} route.
    let err = submit_profile(&fake.api, &session, &mut form).await.unwrap_err();
    assert_matches!(err, ClientError::Api(ref e) if e.status() == Some(404) || e.status() == Some(405));
    assert!(fake.hits.contains("PUT /api/users/u1"));
    assert_eq!(session.require().unwrap().display_name(), "Eve");
}
