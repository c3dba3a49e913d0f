//! Free-text filtering.

use crate::entity::Entity;

/// Whether any of the record's search fields contains `query`,
/// case-insensitively. A blank query matches every record; otherwise the
/// query is matched as typed, surrounding spaces included.
pub fn matches<T: Entity>(record: &T, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// The records matching `query`, in their original order. The source slice
/// is never modified.
pub fn filter<'a, T: Entity>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Order, Project, Reference};

    fn order(number: &str, project: &str, amount: &str) -> Order {
        Order {
            order_number: Some(number.into()),
            project: Some(Reference {
                id: None,
                name: Some(project.into()),
            }),
            amount: Some(Amount::new(amount)),
            ..Default::default()
        }
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let orders = vec![order("WO-2", "B", "1"), order("WO-1", "A", "2")];
        let result = filter(&orders, "");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0], &orders[0]);
        assert_eq!(result[1], &orders[1]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let projects = vec![Project {
            name: Some("acme corp".into()),
            ..Default::default()
        }];
        assert_eq!(filter(&projects, "ACME").len(), 1);
    }

    #[test]
    fn derived_fields_are_searched() {
        let orders = vec![order("WO-1", "Harbour Crane", "100"), order("WO-2", "Dock", "250")];
        assert_eq!(filter(&orders, "crane").len(), 1);
        assert_eq!(filter(&orders, "250")[0].order_number.as_deref(), Some("WO-2"));
    }

    #[test]
    fn spaces_in_the_query_are_significant() {
        let projects = vec![
            Project {
                name: Some("acmecorp".into()),
                ..Default::default()
            },
            Project {
                name: Some("acme corp".into()),
                ..Default::default()
            },
        ];
        let result = filter(&projects, " corp");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name.as_deref(), Some("acme corp"));
        assert_eq!(filter(&projects, "   ").len(), 2);
    }

    #[test]
    fn no_match_yields_nothing() {
        let orders = vec![order("WO-1", "A", "1")];
        assert!(filter(&orders, "zzz").is_empty());
    }

    #[test]
    fn missing_fields_never_match() {
        let projects = vec![Project::default()];
        assert!(!matches(&projects[0], "a"));
    }
}
