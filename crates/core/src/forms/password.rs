//! Password change form.

use std::fmt;

use serde_json::{json, Value};
use validator::Validate;

use crate::forms::validation::required_text;

/// Minimum accepted length for a new password.
pub const PASSWORD_MIN_LENGTH: u64 = 6;

#[derive(Clone, Default, PartialEq, Eq, Validate)]
pub struct PasswordDraft {
    #[validate(custom(function = "required_text"))]
    pub current_password: String,
    #[validate(length(min = PASSWORD_MIN_LENGTH, message = "must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "does not match the new password"))]
    pub confirm_password: String,
}

impl PasswordDraft {
    /// Request body for the password endpoint.
    pub fn payload(&self) -> Value {
        json!({
            "currentPassword": self.current_password,
            "newPassword": self.new_password,
        })
    }
}

impl fmt::Debug for PasswordDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDraft")
            .field("current_password", &"***")
            .field("new_password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}
