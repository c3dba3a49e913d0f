//! REST gateway and async screen plumbing for the portal.
//!
//! - [`api::PortalApi`] is the one-call-per-operation HTTP client.
//! - [`screen::Screen`] guards late fetch results with a liveness flag.
//! - [`screens`] and [`controllers`] connect the API to the view models and
//!   form state machines in `portal_core`.
//! - [`actions::RowActions`] scopes in-flight row actions by row id.

pub mod actions;
pub mod api;
pub mod config;
pub mod controllers;
pub mod error;
pub mod screen;
pub mod screens;
pub mod session_store;

pub use api::{ApiError, PortalApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use screen::{Applied, Screen};
pub use session_store::FileSessionStore;
