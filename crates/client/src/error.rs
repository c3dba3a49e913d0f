use portal_core::error::CoreError;
use portal_core::forms::FormError;
use portal_core::session::SessionError;
use portal_core::types::EntityId;

use crate::api::ApiError;

/// Error surfaced by a screen or form action.
///
/// Every variant renders as the plain-text message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A domain-level error from `portal_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Another action on the same row is still running.
    #[error("An action on {0} is already in progress")]
    Busy(EntityId),

    /// The screen was left before the result arrived.
    #[error("The screen was closed before the request finished")]
    Unmounted,
}

/// Convenience alias for screen and controller results.
pub type ClientResult<T> = Result<T, ClientError>;
