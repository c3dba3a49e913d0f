//! Create/edit form controllers.
//!
//! Every form runs the same state machine ([`FormController`]) over a
//! draft type that implements [`validator::Validate`]. Validation is local
//! and never reaches the network; submission itself is driven by the
//! caller, which reports the outcome back through
//! [`FormController::complete`].

pub mod lookup;
pub mod password;
pub mod profile;
pub mod state;
pub mod task;
pub mod validation;

pub use lookup::Lookup;
pub use password::{PasswordDraft, PASSWORD_MIN_LENGTH};
pub use profile::ProfileDraft;
pub use state::{FormController, FormError, FormPhase};
pub use task::{TaskDraft, TaskForm, TaskSubmission};
pub use validation::{FieldError, ValidationError};
