//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecXlsxFormats};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Header fill color (sea green).
pub const C_COLOR_HEADER_BG: &str = "#2E8B57";
/// Header font color.
pub const C_COLOR_HEADER_FONT: &str = "#FFFFFF";
/// Fill color of striped body rows.
pub const C_COLOR_STRIPE_BG: &str = "#F8F9FA";
/// Thin border color.
pub const C_COLOR_BORDER: &str = "#CCCCCC";

/// Calibri 11 with thin grey borders; sea-green bold header; light stripe fill.
pub fn derive_default_xlsx_formats() -> SpecXlsxFormats {
    let fmt_body = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        if_border_thin: Some(true),
        border_color: Some(C_COLOR_BORDER.to_string()),
        align: Some("left".to_string()),
        ..Default::default()
    };
    let fmt_number = |c_num_format: &str| {
        fmt_body.merge(&SpecCellFormat {
            num_format: Some(c_num_format.to_string()),
            align: Some("right".to_string()),
            ..Default::default()
        })
    };

    SpecXlsxFormats {
        integer: fmt_number("0"),
        decimal: fmt_number("0.00"),
        header: fmt_body.merge(&SpecCellFormat {
            bold: Some(true),
            align: Some("center".to_string()),
            bg_color: Some(C_COLOR_HEADER_BG.to_string()),
            font_color: Some(C_COLOR_HEADER_FONT.to_string()),
            ..Default::default()
        }),
        stripe: SpecCellFormat {
            bg_color: Some(C_COLOR_STRIPE_BG.to_string()),
            ..Default::default()
        },
        text: fmt_body,
    }
}
