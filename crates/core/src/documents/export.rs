//! Tabular export (CSV) of entity lists.

use chrono::NaiveDate;

use crate::documents::html::PLACEHOLDER_TABLE;
use crate::entity::EntityKind;
use crate::models::{Asset, Order, Project, Task, User};

/// Fixed column table of an entity for exports and printed lists.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    /// One cell per column; `None` renders as the placeholder.
    fn cells(&self) -> Vec<Option<String>>;
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

impl Tabular for Project {
    const COLUMNS: &'static [&'static str] =
        &["Name", "Description", "Status", "Start Date", "End Date", "Assets", "Orders"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.status.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            Some(self.assets.len().to_string()),
            Some(self.orders.len().to_string()),
        ]
    }
}

impl Tabular for Order {
    const COLUMNS: &'static [&'static str] = &[
        "Order Number",
        "Title",
        "Project",
        "Status",
        "Amount",
        "ERP Number",
        "Created",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.order_number.clone(),
            self.title.clone(),
            owned(self.project_name()),
            self.status.clone(),
            owned(self.amount_str()),
            self.erp_number.clone(),
            self.created_at.clone(),
        ]
    }
}

impl Tabular for Asset {
    const COLUMNS: &'static [&'static str] = &[
        "Title",
        "Category",
        "Manufacturer",
        "Model",
        "Serial Number",
        "Barcode",
        "Area",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.title.clone(),
            self.category.clone(),
            self.manufacturer.clone(),
            self.model.clone(),
            self.serial_number.clone(),
            self.barcode.clone(),
            self.area.clone(),
        ]
    }
}

impl Tabular for Task {
    const COLUMNS: &'static [&'static str] = &[
        "Title",
        "Priority",
        "Status",
        "Asset",
        "Assignee",
        "Start",
        "End",
    ];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.title.clone(),
            self.priority.clone(),
            self.status.clone(),
            owned(self.asset_name()),
            owned(self.assignee_name()),
            self.start_time.clone(),
            self.end_time.clone(),
        ]
    }
}

impl Tabular for User {
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone", "Role"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.role.clone(),
        ]
    }
}

/// Cell text with the tabular placeholder for missing values.
pub fn cell_text(cell: Option<&str>) -> &str {
    match cell {
        Some(v) if !v.trim().is_empty() => v,
        _ => PLACEHOLDER_TABLE,
    }
}

/// A record's cells as displayed, with placeholders filled in.
pub fn display_cells<T: Tabular>(record: &T) -> Vec<String> {
    record
        .cells()
        .iter()
        .map(|cell| cell_text(cell.as_deref()).to_string())
        .collect()
}

/// Escape a value for CSV: wrap in quotes if it contains a comma, quote, or
/// line break.
fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build a CSV document: a header row of [`Tabular::COLUMNS`] followed by
/// one row per record, in the given order.
pub fn build_csv<'a, T, I>(records: I) -> String
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut lines = vec![T::COLUMNS
        .iter()
        .map(|c| csv_escape(c))
        .collect::<Vec<_>>()
        .join(",")];

    for record in records {
        let row = display_cells(record)
            .iter()
            .map(|cell| csv_escape(cell))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

/// Download name: `<display-name>_<collection>_<YYYY-MM-DD>.csv`, with the
/// display name reduced to lowercase ASCII words joined by `_`.
pub fn export_filename(display_name: &str, kind: EntityKind, date: NaiveDate) -> String {
    let mut slug = String::new();
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "export" } else { slug };

    format!(
        "{slug}_{}_{}.csv",
        kind.collection_key(),
        date.format("%Y-%m-%d")
    )
}
