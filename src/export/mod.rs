//! Export module for the prompt journal
//!
//! - JSON: the versioned, importable export document
//! - CSV: a flat summary for spreadsheets
//! - Presenters: how a finished document reaches the user

pub mod csv;
pub mod json;
pub mod presenter;

pub use self::csv::export_entries_csv;
pub use json::{export_filename, ExportDocument, ExportStats, EXPORT_VERSION};
pub use presenter::{FilePresenter, Presenter, StdoutPresenter};
