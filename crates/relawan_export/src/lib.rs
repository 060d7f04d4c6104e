//! `relawan_export` v1:
//! Volunteer registry CSV to XLSX workbook conversion.
//!
//! Module layout:
//! - `conf`     : patterns, sheet names, column names
//! - `spec`     : options, summary models, run report, errors
//! - `load`     : CSV loading
//! - `summary`  : summary statistics
//! - `emit`     : workbook emission
//! - `pipeline` : select -> aggregate -> emit
pub mod conf;
pub mod emit;
pub mod load;
pub mod pipeline;
pub mod spec;
pub mod summary;

pub use emit::emit_workbook;
pub use load::read_csv_table;
pub use pipeline::{derive_output_path, run_export, run_export_at};
pub use spec::{
    EnumSchemaMode, EnumSummaryCategory, ExportError, SpecExportOptions, SpecExportReport,
    SpecSummaryRow,
};
pub use summary::{derive_summary_dataframe, derive_summary_rows, format_percentage};
