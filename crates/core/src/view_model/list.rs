//! The generic list screen state.

use serde_json::Value;

use crate::entity::Entity;
use crate::normalize::{self, Collection};
use crate::view_model::filter::filter;
use crate::view_model::sort::{sort_records, Comparator, SortState};
use crate::view_model::summary::{count_by_status, StatusCounts};

/// Normalized, filterable, sortable state for one entity list.
///
/// The source collection is only replaced by [`load`](Self::load) /
/// [`fail`](Self::fail) and edited by row-level merges; filtering and
/// sorting produce views over it and never reorder or drop source records.
#[derive(Debug, Clone)]
pub struct ListView<T: Entity> {
    records: Vec<T>,
    query: String,
    sort: Option<SortState<T::SortField>>,
    comparator: Comparator,
    error: Option<String>,
    loaded: bool,
}

impl<T: Entity> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> ListView<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            sort: None,
            comparator: Comparator::default(),
            error: None,
            loaded: false,
        }
    }

    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    // -- loading -------------------------------------------------------------

    /// Replace the source collection and clear any previous error.
    pub fn load(&mut self, collection: Collection<T>) {
        self.records = collection.into_vec();
        self.error = None;
        self.loaded = true;
    }

    /// Normalize a raw API response and load it.
    pub fn load_response(&mut self, raw: &Value) {
        self.load(normalize::normalize(raw));
    }

    /// Record a fetch failure. The collection resets to empty so the screen
    /// shows an explicit "no records" state rather than stale rows.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.records.clear();
        self.error = Some(message.into());
        self.loaded = true;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    // -- query / sort --------------------------------------------------------

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Column header click. Returns the new sort state.
    pub fn toggle_sort(&mut self, field: T::SortField) -> SortState<T::SortField> {
        let next = SortState::toggle(self.sort, field);
        self.sort = Some(next);
        next
    }

    pub fn set_sort(&mut self, sort: Option<SortState<T::SortField>>) {
        self.sort = sort;
    }

    pub fn sort(&self) -> Option<SortState<T::SortField>> {
        self.sort
    }

    // -- views ---------------------------------------------------------------

    /// The source collection in load order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Rows to render: filtered by the query, then sorted by the active
    /// column when one is set.
    pub fn rows(&self) -> Vec<&T> {
        let mut rows = filter(&self.records, &self.query);
        if let Some(state) = self.sort {
            sort_records(&mut rows, state, self.comparator);
        }
        rows
    }

    /// Whether the table should render its "no records" placeholder.
    pub fn shows_empty_state(&self) -> bool {
        self.loaded && self.rows().is_empty()
    }

    /// Status buckets over the whole source collection (not the filtered
    /// view), matching the summary cards above the table.
    pub fn summary(&self, labels: &[&'static str]) -> StatusCounts {
        count_by_status(&self.records, labels)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    // -- local merges --------------------------------------------------------

    /// Merge a server-confirmed record: replace the row with the same id in
    /// place, or append it when new.
    pub fn upsert(&mut self, record: T) {
        let existing = record
            .id()
            .and_then(|id| self.records.iter().position(|r| r.id() == Some(id)));
        match existing {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    /// Drop the row with `id`. Returns whether a row was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != Some(id));
        self.records.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderSortField, Project};
    use crate::view_model::sort::SortDirection;
    use crate::view_model::summary::PROJECT_STATUS_LABELS;
    use serde_json::json;

    fn orders_response() -> Value {
        json!({"orders": [
            {"_id": "1", "order_number": "WO-1", "status": "Pending", "amount": {"value": 100}},
            {"_id": "2", "order_number": "WO-2", "status": "Completed", "amount": {"value": 250}},
        ]})
    }

    fn numbers(view: &ListView<Order>) -> Vec<String> {
        view.rows()
            .iter()
            .filter_map(|o| o.order_number.clone())
            .collect()
    }

    #[test]
    fn filter_then_sort_scenario() {
        let mut view = ListView::<Order>::new();
        view.load_response(&orders_response());

        view.set_query("wo-2");
        assert_eq!(numbers(&view), vec!["WO-2"]);

        view.set_query("");
        view.toggle_sort(OrderSortField::Amount);
        let state = view.toggle_sort(OrderSortField::Amount);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(numbers(&view), vec!["WO-2", "WO-1"]);
    }

    #[test]
    fn filtering_does_not_touch_the_source() {
        let mut view = ListView::<Order>::new();
        view.load_response(&orders_response());
        view.set_query("WO-1");
        view.toggle_sort(OrderSortField::OrderNumber);
        let _ = view.rows();
        assert_eq!(view.records().len(), 2);
        assert_eq!(view.records()[0].order_number.as_deref(), Some("WO-1"));
    }

    #[test]
    fn failure_resets_to_empty_with_message() {
        let mut view = ListView::<Order>::new();
        view.load_response(&orders_response());
        view.fail("Request failed: 500 Internal Server Error");
        assert!(view.records().is_empty());
        assert!(view.shows_empty_state());
        assert_eq!(view.error(), Some("Request failed: 500 Internal Server Error"));
    }

    #[test]
    fn reload_clears_previous_error() {
        let mut view = ListView::<Order>::new();
        view.fail("boom");
        view.load_response(&orders_response());
        assert!(view.error().is_none());
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new() {
        let mut view = ListView::<Order>::new();
        view.load_response(&orders_response());

        view.upsert(Order {
            id: Some("1".into()),
            order_number: Some("WO-1b".into()),
            ..Default::default()
        });
        view.upsert(Order {
            id: Some("3".into()),
            order_number: Some("WO-3".into()),
            ..Default::default()
        });

        let numbers: Vec<_> = view
            .records()
            .iter()
            .filter_map(|o| o.order_number.as_deref())
            .collect();
        assert_eq!(numbers, vec!["WO-1b", "WO-2", "WO-3"]);
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut view = ListView::<Order>::new();
        view.load_response(&orders_response());
        assert!(view.remove("2"));
        assert!(!view.remove("2"));
        assert_eq!(view.records().len(), 1);
    }

    #[test]
    fn summary_covers_the_unfiltered_collection() {
        let mut view = ListView::<Project>::new();
        view.load_response(&json!([
            {"name": "A", "status": "Active"},
            {"name": "B", "status": "Pending"},
        ]));
        view.set_query("A");
        let counts = view.summary(PROJECT_STATUS_LABELS);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.pending(), 1);
    }
}
