//! Print-friendly HTML reports for single records.

use chrono::NaiveDate;

use crate::documents::export::{cell_text, Tabular};
use crate::documents::html::{detail_row, escape_html, page, paragraph_or_na};
use crate::models::{Asset, Order, Project, Reference, Task};

fn subtitle(kind: &str, generated_on: NaiveDate) -> String {
    format!("{kind} report \u{00b7} generated {}", generated_on.format("%Y-%m-%d"))
}

fn reference_name(reference: Option<&Reference>) -> Option<&str> {
    reference.and_then(Reference::display_name)
}

fn detail_table(rows: &[(&str, Option<&str>)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| detail_row(label, *value))
        .collect();
    format!("<table>{body}</table>")
}

/// A titled list of records rendered with their export columns.
fn list_section<T: Tabular>(heading: &str, empty: &str, records: &[T]) -> String {
    if records.is_empty() {
        return format!(
            "<h2>{}</h2><p class=\"empty\">{}</p>",
            escape_html(heading),
            escape_html(empty)
        );
    }

    let header: String = T::COLUMNS
        .iter()
        .map(|c| format!("<th>{}</th>", escape_html(c)))
        .collect();
    let rows: String = records
        .iter()
        .map(|record| {
            let cells: String = record
                .cells()
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(cell_text(cell.as_deref()))))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        "<h2>{}</h2><table class=\"list\"><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table>",
        escape_html(heading)
    )
}

fn description_section(description: Option<&str>) -> String {
    format!("<h2>Description</h2><p>{}</p>", paragraph_or_na(description))
}

/// Work order report with its task list.
pub fn render_order(order: &Order, tasks: &[Task], generated_on: NaiveDate) -> String {
    let title = format!(
        "Work Order {}",
        order.order_number.as_deref().unwrap_or("N/A")
    );
    let details = detail_table(&[
        ("Order Number", order.order_number.as_deref()),
        ("Title", order.title.as_deref()),
        ("Status", order.status.as_deref()),
        ("Amount", order.amount_str()),
        ("Customer", reference_name(order.customer.as_ref())),
        ("Project", order.project_name()),
        ("ERP Number", order.erp_number.as_deref()),
        ("Created", order.created_at.as_deref()),
    ]);
    let body = [
        details,
        description_section(order.description.as_deref()),
        list_section("Tasks", "No tasks on this order.", tasks),
    ]
    .concat();
    page(&title, &subtitle("Work order", generated_on), &body)
}

/// Project report with its assets and orders.
pub fn render_project(project: &Project, generated_on: NaiveDate) -> String {
    let title = format!(
        "Project {}",
        project.display_name().unwrap_or("N/A")
    );
    let details = detail_table(&[
        ("Name", project.display_name()),
        ("Status", project.status.as_deref()),
        ("Customer", reference_name(project.customer.as_ref())),
        ("Start Date", project.start_date.as_deref()),
        ("End Date", project.end_date.as_deref()),
        ("Created", project.created_at.as_deref()),
        ("Last Modified", project.modified_at.as_deref()),
    ]);
    let body = [
        details,
        description_section(project.description.as_deref()),
        list_section("Assets", "No assets registered.", &project.assets),
        list_section("Orders", "No orders raised.", &project.orders),
    ]
    .concat();
    page(&title, &subtitle("Project", generated_on), &body)
}

/// Asset data sheet.
pub fn render_asset(asset: &Asset, generated_on: NaiveDate) -> String {
    let title = format!("Asset {}", asset.display_name().unwrap_or("N/A"));
    let details = detail_table(&[
        ("Title", asset.display_name()),
        ("Category", asset.category.as_deref()),
        ("Manufacturer", asset.manufacturer.as_deref()),
        ("Model", asset.model.as_deref()),
        ("Serial Number", asset.serial_number.as_deref()),
        ("Barcode", asset.barcode.as_deref()),
        ("Area", asset.area.as_deref()),
        ("Customer", reference_name(asset.customer.as_ref())),
        ("Project", reference_name(asset.project.as_ref())),
    ]);
    let body = [details, description_section(asset.description.as_deref())].concat();
    page(&title, &subtitle("Asset", generated_on), &body)
}

/// Task sheet including planned and actual times and attachments.
pub fn render_task(task: &Task, generated_on: NaiveDate) -> String {
    let title = format!("Task {}", task.title.as_deref().unwrap_or("N/A"));
    let details = detail_table(&[
        ("Title", task.title.as_deref()),
        ("Priority", task.priority.as_deref()),
        ("Status", task.status.as_deref()),
        ("Order", reference_name(task.order.as_ref())),
        ("Project", reference_name(task.project.as_ref())),
        ("Customer", reference_name(task.customer.as_ref())),
        ("Asset", task.asset_name()),
        ("Assignee", task.assignee_name()),
        ("Planned Start", task.start_time.as_deref()),
        ("Planned End", task.end_time.as_deref()),
        ("Actual Start", task.actual_start_time.as_deref()),
        ("Actual End", task.actual_end_time.as_deref()),
    ]);

    let attachments = if task.file_upload.is_empty() {
        "<h2>Attachments</h2><p class=\"empty\">No attachments.</p>".to_string()
    } else {
        let items: String = task
            .file_upload
            .iter()
            .map(|f| format!("<li>{}</li>", escape_html(f)))
            .collect();
        format!("<h2>Attachments</h2><ul>{items}</ul>")
    };

    let body = [
        details,
        description_section(task.description.as_deref()),
        attachments,
    ]
    .concat();
    page(&title, &subtitle("Task", generated_on), &body)
}
