//! The form state machine.
//!
//! ```text
//! Viewing --begin_edit--> Editing --submit--> Validating --ok--> Submitting --complete(Ok)--> Viewing
//!                           ^  |                   |                  |
//!                           |  +--cancel--> Viewing|                  |
//!                           +--------invalid-------+                  |
//!                           +----------------complete(Err)------------+
//! ```

use validator::Validate;

use crate::forms::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Viewing,
    Editing,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Local field validation failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server rejected the submission or could not be reached.
    #[error("{0}")]
    Submit(String),

    #[error("cannot {action} while the form is {phase:?}")]
    InvalidTransition {
        phase: FormPhase,
        action: &'static str,
    },
}

/// Draft/confirmed state for one form.
#[derive(Debug, Clone)]
pub struct FormController<D> {
    phase: FormPhase,
    confirmed: D,
    draft: D,
    error: Option<FormError>,
}

impl<D: Validate + Clone> FormController<D> {
    /// A form showing `confirmed` read-only.
    pub fn new(confirmed: D) -> Self {
        Self {
            phase: FormPhase::Viewing,
            draft: confirmed.clone(),
            confirmed,
            error: None,
        }
    }

    /// A form that opens straight into editing (create forms).
    pub fn editing(initial: D) -> Self {
        Self {
            phase: FormPhase::Editing,
            ..Self::new(initial)
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Last server-confirmed values.
    pub fn confirmed(&self) -> &D {
        &self.confirmed
    }

    /// Values being edited.
    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Start editing from the confirmed values. A no-op when already editing.
    pub fn begin_edit(&mut self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Viewing => {
                self.draft = self.confirmed.clone();
                self.error = None;
                self.phase = FormPhase::Editing;
                Ok(())
            }
            FormPhase::Editing => Ok(()),
            phase => Err(FormError::InvalidTransition {
                phase,
                action: "edit",
            }),
        }
    }

    /// Change draft fields.
    pub fn edit<F: FnOnce(&mut D)>(&mut self, change: F) -> Result<(), FormError> {
        self.require_editing("change fields")?;
        change(&mut self.draft);
        Ok(())
    }

    /// Discard the draft and return to viewing.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        self.require_editing("cancel")?;
        self.draft = self.confirmed.clone();
        self.error = None;
        self.phase = FormPhase::Viewing;
        Ok(())
    }

    /// Check the draft without changing state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.draft.validate().map_err(ValidationError::from)
    }

    /// Validate and, when valid, move to `Submitting` and hand back the
    /// draft to send. When invalid the form stays in `Editing` with the
    /// validation error attached.
    pub fn submit(&mut self) -> Result<D, FormError> {
        self.require_editing("submit")?;
        self.phase = FormPhase::Validating;

        match self.validate() {
            Ok(()) => {
                self.error = None;
                self.phase = FormPhase::Submitting;
                Ok(self.draft.clone())
            }
            Err(e) => {
                let error = FormError::Validation(e);
                self.error = Some(error.clone());
                self.phase = FormPhase::Editing;
                Err(error)
            }
        }
    }

    /// Report the submission outcome.
    ///
    /// On success `accepted` becomes the confirmed (and draft) state and the
    /// form returns to viewing. On failure the form returns to editing with
    /// the message attached and the draft intact.
    pub fn complete(&mut self, outcome: Result<D, String>) -> Result<(), FormError> {
        if self.phase != FormPhase::Submitting {
            return Err(FormError::InvalidTransition {
                phase: self.phase,
                action: "complete",
            });
        }

        match outcome {
            Ok(accepted) => {
                self.draft = accepted.clone();
                self.confirmed = accepted;
                self.error = None;
                self.phase = FormPhase::Viewing;
            }
            Err(message) => {
                self.error = Some(FormError::Submit(message));
                self.phase = FormPhase::Editing;
            }
        }
        Ok(())
    }

    fn require_editing(&self, action: &'static str) -> Result<(), FormError> {
        if self.phase == FormPhase::Editing {
            Ok(())
        } else {
            Err(FormError::InvalidTransition {
                phase: self.phase,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::ProfileDraft;
    use assert_matches::assert_matches;

    fn profile() -> ProfileDraft {
        ProfileDraft {
            name: "Acme".into(),
            email: "ops@acme.test".into(),
            phone: "555-0100".into(),
        }
    }

    #[test]
    fn happy_path_returns_to_viewing() {
        let mut form = FormController::new(profile());
        form.begin_edit().unwrap();
        form.edit(|d| d.name = "Acme Ltd".into()).unwrap();

        let sent = form.submit().unwrap();
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert_eq!(sent.name, "Acme Ltd");

        form.complete(Ok(sent)).unwrap();
        assert_eq!(form.phase(), FormPhase::Viewing);
        assert_eq!(form.confirmed().name, "Acme Ltd");
    }

    #[test]
    fn invalid_draft_stays_editing() {
        let mut form = FormController::new(profile());
        form.begin_edit().unwrap();
        form.edit(|d| d.phone = " ".into()).unwrap();

        let err = form.submit().unwrap_err();
        assert_matches!(&err, FormError::Validation(v) if v.has_field("phone"));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.error(), Some(&err));
    }

    #[test]
    fn revalidation_clears_the_error() {
        let mut form = FormController::new(profile());
        form.begin_edit().unwrap();
        form.edit(|d| d.name.clear()).unwrap();
        assert!(form.submit().is_err());

        form.edit(|d| d.name = "Back".into()).unwrap();
        form.submit().unwrap();
        assert!(form.error().is_none());
    }

    #[test]
    fn server_failure_keeps_the_draft() {
        let mut form = FormController::new(profile());
        form.begin_edit().unwrap();
        form.edit(|d| d.email = "new@acme.test".into()).unwrap();
        form.submit().unwrap();

        form.complete(Err("Request failed (409): Email taken".into()))
            .unwrap();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.draft().email, "new@acme.test");
        assert_eq!(form.confirmed().email, "ops@acme.test");
        assert_matches!(form.error(), Some(FormError::Submit(m)) if m.contains("409"));
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut form = FormController::new(profile());
        form.begin_edit().unwrap();
        form.edit(|d| d.name = "Scratch".into()).unwrap();
        form.cancel().unwrap();
        assert_eq!(form.phase(), FormPhase::Viewing);
        assert_eq!(form.draft().name, "Acme");
    }

    #[test]
    fn edits_are_rejected_outside_editing() {
        let mut form = FormController::new(profile());
        assert_matches!(
            form.edit(|d| d.name.clear()),
            Err(FormError::InvalidTransition { phase: FormPhase::Viewing, .. })
        );
        assert_matches!(
            form.complete(Ok(profile())),
            Err(FormError::InvalidTransition { .. })
        );
    }
}
