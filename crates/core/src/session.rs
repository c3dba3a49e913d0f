//! Session context.
//!
//! A single [`SessionContext`] is created at startup and handed to every
//! screen and form controller. It owns the in-memory copy of the signed-in
//! [`Identity`] and writes through to a [`SessionStore`], which persists the
//! one JSON blob kept between runs.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;

use crate::error::CoreError;
use crate::identity::Identity;

/// Errors from persisting or restoring the session blob.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session blob could not be encoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No user is signed in")]
    NotSignedIn,
}

/// Persistence for the identity blob under a fixed key.
pub trait SessionStore: Send + Sync {
    /// Read the raw blob. `Ok(None)` when nothing is stored.
    fn read(&self) -> Result<Option<Value>, SessionError>;

    fn write(&self, blob: &Value) -> Result<(), SessionError>;

    fn remove(&self) -> Result<(), SessionError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: Value) -> Self {
        Self {
            slot: Mutex::new(Some(blob)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> Result<Option<Value>, SessionError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, blob: &Value) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Narrow read/update interface over the signed-in identity.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Identity>>,
}

impl SessionContext {
    /// Restore the session from `store`.
    ///
    /// A stored blob that does not decode to an identity is treated as
    /// signed out rather than as an error.
    pub fn open(store: Arc<dyn SessionStore>) -> Result<Self, SessionError> {
        let current = match store.read()? {
            Some(blob) => {
                let identity = Identity::from_value(&blob);
                if identity.is_none() {
                    tracing::warn!("Stored session blob is not a usable identity; ignoring it");
                }
                identity
            }
            None => None,
        };

        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// A session with no persistence, for tests and one-shot commands.
    pub fn ephemeral() -> Self {
        Self {
            store: Arc::new(MemorySessionStore::new()),
            current: RwLock::new(None),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The identity, or [`CoreError::Unauthorized`] when signed out.
    pub fn require(&self) -> Result<Identity, CoreError> {
        self.identity()
            .ok_or_else(|| CoreError::Unauthorized("Please log in".into()))
    }

    /// Persist `identity` and make it current.
    pub fn sign_in(&self, identity: Identity) -> Result<(), SessionError> {
        self.store.write(&serde_json::to_value(&identity)?)?;
        tracing::info!(role = identity.role(), "Signed in");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
        Ok(())
    }

    /// Apply `change` to a copy of the identity, persist it, then make it
    /// current. Nothing changes when persisting fails.
    pub fn update<F>(&self, change: F) -> Result<Identity, SessionError>
    where
        F: FnOnce(&mut Identity),
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone().ok_or(SessionError::NotSignedIn)?;
        change(&mut next);
        self.store.write(&serde_json::to_value(&next)?)?;
        *guard = Some(next.clone());
        Ok(next)
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.store.remove()?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::info!("Signed out");
        Ok(())
    }
}
