//! Printable and exportable documents.
//!
//! Pure functions over already-fetched records: no network access and no
//! mutation. Missing values render as a placeholder (`N/A` in HTML, `-` in
//! tabular exports) and every externally sourced string goes through
//! [`html::escape_html`] before it is interpolated into markup.

pub mod export;
pub mod html;
pub mod print;

pub use export::{build_csv, display_cells, export_filename, Tabular};
pub use html::{escape_html, PLACEHOLDER_HTML, PLACEHOLDER_TABLE};
pub use print::{render_asset, render_order, render_project, render_task};
