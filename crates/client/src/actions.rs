//! Per-row in-flight tracking for row actions (delete, print).
//!
//! Actions are keyed by row id: a second action on a busy row is refused
//! while every other row stays available.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use portal_core::types::EntityId;

/// Set of rows with an action in flight.
#[derive(Debug, Clone, Default)]
pub struct RowActions {
    in_flight: Arc<Mutex<HashSet<EntityId>>>,
}

/// Marks one row busy until dropped or [`finish`](RowGuard::finish)ed.
#[derive(Debug)]
pub struct RowGuard {
    in_flight: Arc<Mutex<HashSet<EntityId>>>,
    id: EntityId,
}

impl RowActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`. `None` when an action on that row is already running.
    pub fn begin(&self, id: &str) -> Option<RowGuard> {
        let inserted = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string());
        inserted.then(|| RowGuard {
            in_flight: Arc::clone(&self.in_flight),
            id: id.to_string(),
        })
    }

    /// Whether the action control for `id` should be disabled.
    pub fn is_busy(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn busy_count(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl RowGuard {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Release the row.
    pub fn finish(self) {}
}

impl Drop for RowGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
