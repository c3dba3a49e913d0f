//! Status aggregation for summary cards.

use serde::Serialize;

use crate::entity::Entity;

/// Project and order status buckets shown on summary cards.
pub const PROJECT_STATUS_LABELS: &[&str] = &["Active", "Completed", "Pending"];

/// Task status buckets.
pub const TASK_STATUS_LABELS: &[&str] = &["Todo", "In Progress", "Completed", "On Hold"];

/// Counts of records per fixed status label.
///
/// Labels match the raw status exactly, case included; records whose status
/// matches no label (or that have none) land in `other`. The invariant
/// `buckets.sum() + other == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub buckets: Vec<(&'static str, usize)>,
    pub other: usize,
}

impl StatusCounts {
    /// Count for one label, `0` when the label is not a bucket.
    pub fn count(&self, label: &str) -> usize {
        self.buckets
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, n)| *n)
    }

    pub fn active(&self) -> usize {
        self.count("Active")
    }

    pub fn completed(&self) -> usize {
        self.count("Completed")
    }

    pub fn pending(&self) -> usize {
        self.count("Pending")
    }
}

/// Group `records` by their raw status into the given labels.
pub fn count_by_status<'a, T, I>(records: I, labels: &[&'static str]) -> StatusCounts
where
    T: Entity + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets: Vec<(&'static str, usize)> = labels.iter().map(|l| (*l, 0)).collect();
    let mut total = 0;
    let mut other = 0;

    for record in records {
        total += 1;
        let bucket = record
            .status()
            .and_then(|status| buckets.iter_mut().find(|(label, _)| *label == status));
        match bucket {
            Some((_, n)) => *n += 1,
            None => other += 1,
        }
    }

    StatusCounts {
        total,
        buckets,
        other,
    }
}
