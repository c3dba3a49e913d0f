//! Screen-scoped list/detail view model.
//!
//! One entity-agnostic core ([`ListView`]) parametrized by the per-entity
//! accessor table in [`crate::entity::Entity`]: free-text filtering, single
//! column sorting, and status aggregation over a normalized collection.

pub mod filter;
pub mod list;
pub mod sort;
pub mod summary;

pub use filter::{filter, matches};
pub use list::ListView;
pub use sort::{sort_records, Comparator, SortDirection, SortState};
pub use summary::{count_by_status, StatusCounts, PROJECT_STATUS_LABELS, TASK_STATUS_LABELS};
