//! Result tables, summaries and file export for finished sessions.

pub mod error;
pub mod export;
pub mod summary;
pub mod table;

pub use error::ReportError;
pub use export::{export_csv, export_filename, export_json, timestamp_slug};
pub use summary::Summary;
pub use table::{ParsedTable, parse_table, render_table, render_table_at};
