//! Subcommand implementations.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use portal_client::actions::RowActions;
use portal_client::controllers::{load_task_lookups, submit_password, submit_profile, submit_task};
use portal_client::screens::{
    delete_row, fetch_asset, fetch_order_detail, fetch_project_detail, fetch_task, load_dashboard,
    load_list, DashboardState,
};
use portal_client::{Applied, ClientConfig, FileSessionStore, PortalApi, Screen};
use portal_core::documents::{
    build_csv, display_cells, export_filename, render_asset, render_order, render_project,
    render_task, Tabular,
};
use portal_core::entity::Entity;
use portal_core::forms::{FormController, PasswordDraft, ProfileDraft, TaskDraft, TaskForm};
use portal_core::identity::Identity;
use portal_core::models::{
    Asset, Attachment, Order, Project, Reference, Task, TaskPriority, TaskStatus, User,
};
use portal_core::session::SessionContext;
use portal_core::shell::{self, Route};
use portal_core::view_model::{
    Comparator, ListView, SortDirection, SortState, StatusCounts, PROJECT_STATUS_LABELS,
    TASK_STATUS_LABELS,
};

use crate::{Command, EntityArg, ListArgs, OrderAction, TaskAction, TaskFields};

struct App {
    session: SessionContext,
    api_url: String,
}

impl App {
    fn api(&self) -> PortalApi {
        let token = self
            .session
            .identity()
            .and_then(|identity| identity.token().map(str::to_string));
        PortalApi::new(self.api_url.as_str()).with_token(token)
    }

    /// The signed-in identity, if it may open `route`.
    fn guard(&self, route: Route) -> anyhow::Result<Identity> {
        let identity = self.session.identity();
        shell::guard(identity.as_ref(), route)?;
        identity.ok_or_else(|| anyhow!("Please log in"))
    }
}

pub async fn run(command: Command, config: &ClientConfig) -> anyhow::Result<()> {
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let ctx = App {
        session: SessionContext::open(store)?,
        api_url: config.api_url.clone(),
    };

    match command {
        Command::Login {
            email,
            password,
            staff,
        } => login(&ctx, &email, &password, staff).await,
        Command::Logout { yes } => logout(&ctx, yes),
        Command::Whoami => whoami(&ctx),
        Command::Dashboard => dashboard(&ctx).await,
        Command::List { entity, args } => {
            let projects = Some(PROJECT_STATUS_LABELS);
            match entity {
                EntityArg::Projects => list::<Project>(&ctx, Route::Projects, &args, projects).await,
                EntityArg::Orders => list::<Order>(&ctx, Route::Orders, &args, projects).await,
                EntityArg::Assets => list::<Asset>(&ctx, Route::Assets, &args, None).await,
                EntityArg::Tasks => {
                    list::<Task>(&ctx, Route::Tasks, &args, Some(TASK_STATUS_LABELS)).await
                }
                EntityArg::Users => list::<User>(&ctx, Route::Users, &args, None).await,
            }
        }
        Command::Print { entity, id, out } => print(&ctx, entity, &id, out.as_deref()).await,
        Command::Export { entity, args, dir } => match entity {
            EntityArg::Projects => export::<Project>(&ctx, Route::Projects, &args, &dir).await,
            EntityArg::Orders => export::<Order>(&ctx, Route::Orders, &args, &dir).await,
            EntityArg::Assets => export::<Asset>(&ctx, Route::Assets, &args, &dir).await,
            EntityArg::Tasks => export::<Task>(&ctx, Route::Tasks, &args, &dir).await,
            EntityArg::Users => export::<User>(&ctx, Route::Users, &args, &dir).await,
        },
        Command::Profile { name, email, phone } => profile(&ctx, name, email, phone).await,
        Command::Password {
            current,
            new,
            confirm,
        } => password(&ctx, current, new, confirm).await,
        Command::Task { action } => match action {
            TaskAction::Add { order, fields } => task_add(&ctx, &order, fields).await,
            TaskAction::Edit { id, fields } => task_edit(&ctx, &id, fields).await,
            TaskAction::Delete { id, yes } => delete::<Task>(&ctx, Route::Tasks, &id, yes).await,
        },
        Command::Order { action } => match action {
            OrderAction::Delete { id, yes } => delete::<Order>(&ctx, Route::Orders, &id, yes).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

async fn login(ctx: &App, email: &str, password: &str, staff: bool) -> anyhow::Result<()> {
    let api = PortalApi::new(ctx.api_url.as_str());
    let blob = if staff {
        api.login_user(email, password).await?
    } else {
        api.login_customer(email, password).await?
    };
    let identity = Identity::from_value(&blob)
        .ok_or_else(|| anyhow!("Login response did not name a customer or user"))?;
    println!("Signed in as {} ({})", identity.display_name(), identity.role());
    ctx.session.sign_in(identity)?;
    Ok(())
}

fn logout(ctx: &App, yes: bool) -> anyhow::Result<()> {
    if !ctx.session.is_signed_in() {
        println!("Not signed in");
        return Ok(());
    }
    if !yes && !confirm("Log out?")? {
        println!("Cancelled");
        return Ok(());
    }
    ctx.session.sign_out()?;
    println!("Signed out");
    Ok(())
}

fn whoami(ctx: &App) -> anyhow::Result<()> {
    let identity = ctx.guard(Route::Dashboard)?;
    println!("{} ({})", identity.display_name(), identity.role());
    let routes: Vec<&str> = shell::sidebar(Some(&identity))
        .into_iter()
        .map(Route::label)
        .collect();
    println!("Screens: {}", routes.join(", "));
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

async fn dashboard(ctx: &App) -> anyhow::Result<()> {
    let identity = ctx.guard(Route::Dashboard)?;
    let screen = Screen::mount(DashboardState::default());
    load_dashboard(&screen, &ctx.api(), &identity.scope()).await;

    let state = screen.read(|s| s.clone()).await;
    if let Some(error) = state.error {
        bail!(error);
    }
    let summary = state
        .summary
        .ok_or_else(|| anyhow!("Dashboard did not load"))?;

    print_counts("Projects", &summary.projects);
    print_counts("Orders", &summary.orders);
    print_counts("Tasks", &summary.tasks);
    println!("Assets: {}", summary.asset_total);
    println!("Order value: {:.2}", summary.order_value);
    if summary.orders_without_value > 0 {
        println!("  ({} orders without a numeric amount)", summary.orders_without_value);
    }
    Ok(())
}

fn print_counts(label: &str, counts: &StatusCounts) {
    let buckets: Vec<String> = counts
        .buckets
        .iter()
        .map(|(name, n)| format!("{name} {n}"))
        .collect();
    println!(
        "{label}: {} ({}, other {})",
        counts.total,
        buckets.join(", "),
        counts.other
    );
}

/// Load, filter and sort a list the way the list screen does.
async fn load_view<T: Entity>(
    ctx: &App,
    identity: &Identity,
    args: &ListArgs,
) -> anyhow::Result<ListView<T>> {
    let comparator = if args.numeric {
        Comparator::Numeric
    } else {
        Comparator::Lexical
    };
    let sort = args
        .sort
        .as_deref()
        .map(|name| name.parse::<T::SortField>())
        .transpose()?
        .map(|field| SortState {
            field,
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        });

    let screen = Screen::mount(ListView::<T>::new().with_comparator(comparator));
    let loaded = load_list(&screen, &ctx.api(), &identity.scope()).await;
    if let Applied::Applied(Err(message)) = loaded {
        bail!(message);
    }

    let query = args.query.clone().unwrap_or_default();
    screen
        .update(|view| {
            view.set_query(query);
            view.set_sort(sort);
        })
        .await;
    Ok(screen.read(|view| view.clone()).await)
}

async fn list<T: Entity + Tabular>(
    ctx: &App,
    route: Route,
    args: &ListArgs,
    labels: Option<&[&'static str]>,
) -> anyhow::Result<()> {
    let identity = ctx.guard(route)?;
    let view = load_view::<T>(ctx, &identity, args).await?;

    if let Some(labels) = labels {
        print_counts(route.label(), &view.summary(labels));
    }
    if view.shows_empty_state() {
        println!("No {} found.", T::KIND.collection_key());
        return Ok(());
    }

    println!("{}", T::COLUMNS.join("\t"));
    for row in view.rows() {
        println!("{}", display_cells(row).join("\t"));
    }
    Ok(())
}

async fn export<T: Entity + Tabular>(
    ctx: &App,
    route: Route,
    args: &ListArgs,
    dir: &Path,
) -> anyhow::Result<()> {
    let identity = ctx.guard(route)?;
    let view = load_view::<T>(ctx, &identity, args).await?;

    let csv = build_csv(view.rows());
    let file = dir.join(export_filename(
        identity.display_name(),
        T::KIND,
        Local::now().date_naive(),
    ));
    std::fs::write(&file, csv).with_context(|| format!("writing {}", file.display()))?;
    tracing::info!(path = %file.display(), rows = view.rows().len(), "Export written");
    println!("{}", file.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

async fn print(ctx: &App, entity: EntityArg, id: &str, out: Option<&Path>) -> anyhow::Result<()> {
    let api = ctx.api();
    let today = Local::now().date_naive();
    let html = match entity {
        EntityArg::Projects => {
            ctx.guard(Route::ProjectDetail)?;
            render_project(&fetch_project_detail(&api, id).await?, today)
        }
        EntityArg::Orders => {
            ctx.guard(Route::OrderDetail)?;
            let detail = fetch_order_detail(&api, id).await?;
            render_order(&detail.order, &detail.tasks, today)
        }
        EntityArg::Assets => {
            ctx.guard(Route::AssetDetail)?;
            render_asset(&fetch_asset(&api, id).await?, today)
        }
        EntityArg::Tasks => {
            ctx.guard(Route::TaskDetail)?;
            render_task(&fetch_task(&api, id).await?, today)
        }
        EntityArg::Users => bail!("Users have no printable report"),
    };

    match out {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

async fn profile(
    ctx: &App,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> anyhow::Result<()> {
    let identity = ctx.guard(Route::Profile)?;
    let mut form = FormController::new(ProfileDraft::from_identity(&identity));
    form.begin_edit()?;
    form.edit(|draft| {
        if let Some(name) = name {
            draft.name = name;
        }
        if let Some(email) = email {
            draft.email = email;
        }
        if let Some(phone) = phone {
            draft.phone = phone;
        }
    })?;

    let updated = submit_profile(&ctx.api(), &ctx.session, &mut form).await?;
    println!("Profile saved for {}", updated.display_name());
    Ok(())
}

async fn password(ctx: &App, current: String, new: String, confirm: String) -> anyhow::Result<()> {
    ctx.guard(Route::ChangePassword)?;
    let mut form = FormController::editing(PasswordDraft {
        current_password: current,
        new_password: new,
        confirm_password: confirm,
    });
    submit_password(&ctx.api(), &ctx.session, &mut form).await?;
    println!("Password changed");
    Ok(())
}

async fn task_add(ctx: &App, order_id: &str, fields: TaskFields) -> anyhow::Result<()> {
    ctx.guard(Route::Tasks)?;
    let api = ctx.api();
    let order = fetch_order_detail(&api, order_id).await?.order;
    save_task(&api, TaskForm::create(order), fields).await
}

async fn task_edit(ctx: &App, id: &str, fields: TaskFields) -> anyhow::Result<()> {
    ctx.guard(Route::TaskDetail)?;
    let api = ctx.api();
    let task = fetch_task(&api, id).await?;
    let order = match task.order.as_ref().and_then(Reference::id) {
        Some(order_id) => fetch_order_detail(&api, order_id).await?.order,
        None => Order::default(),
    };
    save_task(&api, TaskForm::edit(order, &task), fields).await
}

async fn save_task(api: &PortalApi, form: TaskForm, fields: TaskFields) -> anyhow::Result<()> {
    let screen = Screen::mount(form);
    load_task_lookups(api, &screen).await;
    let mut form = screen
        .into_state()
        .map_err(|_| anyhow!("Task form is still in use"))?;
    if let Some(error) = form.assets.error() {
        tracing::warn!(error, "Asset list unavailable");
    }
    if let Some(error) = form.users.error() {
        tracing::warn!(error, "Assignee list unavailable");
    }

    let attachments = fields
        .attachments
        .iter()
        .map(|path| read_attachment(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let priority = fields
        .priority
        .as_deref()
        .map(str::parse::<TaskPriority>)
        .transpose()?;
    let status = fields
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;

    if let (Some(asset), Some(options)) = (fields.asset.as_deref(), form.assets.options()) {
        if !options.iter().any(|a| a.id() == Some(asset)) {
            tracing::warn!(asset, "Asset is not part of the order's project");
        }
    }

    form.controller.edit(|draft: &mut TaskDraft| {
        if let Some(title) = fields.title {
            draft.title = title;
        }
        if let Some(description) = fields.description {
            draft.description = description;
        }
        if let Some(priority) = priority {
            draft.priority = priority;
        }
        if let Some(status) = status {
            draft.status = status;
        }
        if fields.asset.is_some() {
            draft.set_asset(fields.asset.as_deref());
        }
        if fields.user.is_some() {
            draft.set_user(fields.user.as_deref());
        }
        if fields.start.is_some() {
            draft.start_time = fields.start;
        }
        if fields.end.is_some() {
            draft.end_time = fields.end;
        }
        draft.attachments = attachments;
    })?;

    let saved = submit_task(api, &mut form).await?;
    println!(
        "Saved task {} ({})",
        saved.id().unwrap_or("-"),
        saved.title.as_deref().unwrap_or("untitled")
    );
    Ok(())
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    Ok(Attachment {
        file_name,
        content_type: None,
        bytes,
    })
}

// ---------------------------------------------------------------------------
// Row actions
// ---------------------------------------------------------------------------

async fn delete<T: Entity>(ctx: &App, route: Route, id: &str, yes: bool) -> anyhow::Result<()> {
    ctx.guard(route)?;
    if !yes && !confirm(&format!("Delete {} {id}?", T::KIND.label().to_lowercase()))? {
        println!("Cancelled");
        return Ok(());
    }

    let screen = Screen::mount(ListView::<T>::new());
    delete_row(&screen, &ctx.api(), &RowActions::new(), id).await?;
    println!("Deleted {} {id}", T::KIND.label().to_lowercase());
    Ok(())
}
