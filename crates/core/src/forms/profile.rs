//! Profile edit form.

use serde::Serialize;
use validator::Validate;

use crate::forms::validation::required_text;
use crate::identity::{ActingParty, Identity};

/// Editable contact fields of the acting party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct ProfileDraft {
    #[validate(custom(function = "required_text"))]
    pub name: String,
    #[validate(custom(function = "required_text"))]
    pub email: String,
    #[validate(custom(function = "required_text"))]
    pub phone: String,
}

impl ProfileDraft {
    pub fn from_identity(identity: &Identity) -> Self {
        let (name, email, phone) = match identity.acting_party() {
            ActingParty::Customer(c) => (&c.name, &c.email, &c.phone),
            ActingParty::Employee(u) => (&u.name, &u.email, &u.phone),
        };
        Self {
            name: name.clone().unwrap_or_default(),
            email: email.clone().unwrap_or_default(),
            phone: phone.clone().unwrap_or_default(),
        }
    }

    /// Copy the accepted values into the stored identity so the header and
    /// other derived UI stay consistent for the rest of the session.
    pub fn apply_to(&self, identity: &mut Identity) {
        let fields = (
            Some(self.name.trim().to_string()),
            Some(self.email.trim().to_string()),
            Some(self.phone.trim().to_string()),
        );
        if let Some(c) = identity.customer_profile_mut() {
            (c.name, c.email, c.phone) = fields;
        } else if let Some(u) = identity.user_profile_mut() {
            (u.name, u.email, u.phone) = fields;
        }
    }
}
