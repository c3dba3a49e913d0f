//! Domain logic for the customer and operations portal.
//!
//! Everything here is synchronous and free of network access:
//!
//! - [`models`] and [`normalize`] turn the REST API's inconsistent JSON into
//!   typed records.
//! - [`view_model`] filters, sorts and aggregates a loaded collection.
//! - [`forms`] runs the edit/validate/submit state machine for the profile,
//!   password and task forms.
//! - [`documents`] renders printable HTML reports and CSV exports.
//! - [`session`] and [`identity`] hold the signed-in party.
//! - [`shell`] decides which routes a role may open.

pub mod dashboard;
pub mod documents;
pub mod entity;
pub mod error;
pub mod forms;
pub mod identity;
pub mod models;
pub mod normalize;
pub mod roles;
pub mod session;
pub mod shell;
pub mod types;
pub mod view_model;
