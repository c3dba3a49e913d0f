//! Per-screen state with a liveness flag.
//!
//! A fetch started by a screen always runs to completion; the liveness flag
//! only decides whether its result may still be applied. Once the screen is
//! unmounted every late result is dropped.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied<T> {
    /// The screen was mounted and the result was applied.
    Applied(T),
    /// The screen had been unmounted; the result was dropped.
    Discarded,
}

impl<T> Applied<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Applied(v) => Some(v),
            Self::Discarded => None,
        }
    }
}

/// Handle to one mounted screen. Clones share the state and the flag.
#[derive(Debug)]
pub struct Screen<S> {
    state: Arc<Mutex<S>>,
    alive: CancellationToken,
}

impl<S> Clone for Screen<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            alive: self.alive.clone(),
        }
    }
}

impl<S> Screen<S> {
    pub fn mount(state: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            alive: CancellationToken::new(),
        }
    }

    /// Mark the screen as gone. Fetches already in flight still finish but
    /// their results are discarded.
    pub fn unmount(&self) {
        self.alive.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.alive.is_cancelled()
    }

    /// Await `fetch`, then apply its output with `apply` if the screen is
    /// still mounted.
    pub async fn run<T, R, Fut, F>(&self, fetch: Fut, apply: F) -> Applied<R>
    where
        Fut: std::future::Future<Output = T>,
        F: FnOnce(&mut S, T) -> R,
    {
        let result = fetch.await;
        let mut state = self.state.lock().await;
        if self.alive.is_cancelled() {
            tracing::debug!("Screen unmounted; discarding late result");
            return Applied::Discarded;
        }
        Applied::Applied(apply(&mut state, result))
    }

    /// Read the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.state.lock().await)
    }

    /// Mutate the state from the screen's own callbacks.
    pub async fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.state.lock().await)
    }

    /// Take the state back out. Returns the handle unchanged while other
    /// clones are still alive.
    pub fn into_state(self) -> Result<S, Self> {
        let alive = self.alive;
        Arc::try_unwrap(self.state)
            .map(Mutex::into_inner)
            .map_err(|state| Self { state, alive })
    }
}
