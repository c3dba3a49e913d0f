//! `portal`: command-line front end for the customer and operations portal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_client::config::json_logs_requested;
use portal_client::ClientConfig;

/// Portal CLI.
#[derive(Parser, Debug)]
#[command(name = "portal", about = "Customer and operations portal client")]
struct Cli {
    /// REST API base URL (overrides PORTAL_API_URL).
    #[arg(long = "api-url", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// List entities.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EntityArg {
    Projects,
    Orders,
    Assets,
    Tasks,
    Users,
}

#[derive(clap::Args, Debug, Default)]
struct ListArgs {
    /// Free-text filter.
    #[arg(long, short = 'q')]
    query: Option<String>,
    /// Column to sort by.
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending.
    #[arg(long)]
    desc: bool,
    /// Compare sort values numerically when both parse as numbers.
    #[arg(long)]
    numeric: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Sign in as an operator account instead of a customer.
        #[arg(long)]
        staff: bool,
    },

    /// Clear the stored session.
    Logout {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show the signed-in identity and the screens it may open.
    Whoami,

    /// Summary cards over projects, orders, assets and tasks.
    Dashboard,

    /// List records.
    List {
        entity: EntityArg,
        #[command(flatten)]
        args: ListArgs,
    },

    /// Write a printable HTML report for one record.
    Print {
        entity: EntityArg,
        id: String,
        /// Output file (stdout when omitted).
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Export a list as CSV.
    Export {
        entity: EntityArg,
        #[command(flatten)]
        args: ListArgs,
        /// Directory for the export file.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Edit the signed-in profile.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Change the signed-in password.
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },

    /// Task management.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Work order management.
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(clap::Args, Debug)]
struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Low, Medium or High.
    #[arg(long)]
    priority: Option<String>,
    /// Todo, "In Progress", Completed or "On Hold".
    #[arg(long)]
    status: Option<String>,
    /// Asset id (required for new tasks).
    #[arg(long)]
    asset: Option<String>,
    /// Assignee user id.
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    /// Files to upload with the task.
    #[arg(long = "attach")]
    attachments: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum TaskAction {
    /// Add a task to an order.
    Add {
        #[arg(long)]
        order: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Edit an existing task.
    Edit {
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task.
    Delete {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum OrderAction {
    /// Delete a work order.
    Delete {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json = json_logs_requested();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_cli=info,portal_client=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    // --- Configuration ---
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!(api_url = %config.api_url, session = %config.session_file.display(), "Loaded client configuration");

    commands::run(cli.command, &config).await
}
