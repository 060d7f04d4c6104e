//! `relawan_io_xlsx` v1:
//! Styled DataFrame-to-workbook writing.
//!
//! Module layout:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `writer` : workbook writer
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_COLOR_BORDER, C_COLOR_HEADER_BG, C_COLOR_HEADER_FONT, C_COLOR_STRIPE_BG,
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
    derive_default_xlsx_formats,
};
pub use spec::{
    EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetSlice, SpecXlsxFormats,
    SpecXlsxReport, SpecXlsxSheetWriteOptions, SpecXlsxWriteOptions,
};
pub use util::{
    convert_cell_value, create_sheet_identifier, plan_sheet_slices, sanitize_sheet_name,
    validate_unique_columns,
};
pub use writer::{XlsxWriter, derive_cell_value_from_any_value};
