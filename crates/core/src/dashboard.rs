//! Dashboard summary cards.

use serde::Serialize;

use crate::models::{Asset, Order, Project, Task};
use crate::view_model::{count_by_status, StatusCounts, PROJECT_STATUS_LABELS, TASK_STATUS_LABELS};

/// Aggregates over the four collections the dashboard loads together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub projects: StatusCounts,
    pub orders: StatusCounts,
    pub tasks: StatusCounts,
    pub asset_total: usize,
    /// Sum of every order amount that parses as a number.
    pub order_value: f64,
    /// Orders whose amount is missing or unparseable.
    pub orders_without_value: usize,
}

impl DashboardSummary {
    pub fn compute(projects: &[Project], orders: &[Order], assets: &[Asset], tasks: &[Task]) -> Self {
        let mut order_value = 0.0;
        let mut orders_without_value = 0;
        for order in orders {
            match order.amount.as_ref().and_then(|a| a.to_f64()) {
                Some(v) if v.is_finite() => order_value += v,
                _ => orders_without_value += 1,
            }
        }

        Self {
            projects: count_by_status(projects, PROJECT_STATUS_LABELS),
            orders: count_by_status(orders, PROJECT_STATUS_LABELS),
            tasks: count_by_status(tasks, TASK_STATUS_LABELS),
            asset_total: assets.len(),
            order_value,
            orders_without_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;

    fn order(status: &str, amount: Option<&str>) -> Order {
        Order {
            status: Some(status.into()),
            amount: amount.map(Amount::new),
            ..Default::default()
        }
    }

    fn task(status: &str) -> Task {
        Task {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    #[test]
    fn totals_and_buckets() {
        let projects = vec![
            Project {
                status: Some("Active".into()),
                ..Default::default()
            },
            Project {
                status: Some("in-progress".into()),
                ..Default::default()
            },
        ];
        let orders = vec![
            order("Pending", Some("100")),
            order("Completed", Some("250.5")),
            order("Completed", Some("n/a")),
        ];
        let tasks = vec![task("Todo"), task("In Progress"), task("in progress")];
        let summary = DashboardSummary::compute(&projects, &orders, &[Asset::default()], &tasks);

        assert_eq!(summary.projects.total, 2);
        assert_eq!(summary.projects.active(), 1);
        assert_eq!(summary.projects.other, 1);
        assert_eq!(summary.orders.completed(), 2);
        assert_eq!(summary.orders.pending(), 1);
        assert_eq!(summary.tasks.count("In Progress"), 1);
        assert_eq!(summary.tasks.other, 1);
        assert_eq!(summary.asset_total, 1);
        assert!((summary.order_value - 350.5).abs() < f64::EPSILON);
        assert_eq!(summary.orders_without_value, 1);
    }

    #[test]
    fn empty_dashboard() {
        let summary = DashboardSummary::compute(&[], &[], &[], &[]);
        assert_eq!(summary.projects.total, 0);
        assert_eq!(summary.order_value, 0.0);
    }
}
