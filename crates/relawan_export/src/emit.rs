//! Workbook emission: registry, optional family detail, summary.

use std::path::Path;

use polars::prelude::DataFrame;
use relawan_io_xlsx::{
    SpecXlsxReport, SpecXlsxSheetWriteOptions, SpecXlsxWriteOptions, XlsxWriter,
    derive_default_xlsx_formats,
};
use tracing::{debug, warn};

use crate::conf::{C_COL_SUMMARY_COUNT, C_SHEET_FAMILY, C_SHEET_REGISTRY, C_SHEET_SUMMARY};
use crate::spec::{ExportError, SpecSummaryRow};
use crate::summary::derive_summary_dataframe;

/// Write all sheets into `path_file_out` and save it.
///
/// Sheet order is "Data Relawan", "Detail Keluarga" (only when `df_family` is
/// given), "Ringkasan Statistik". Nothing is reported as written unless the
/// final save succeeds.
pub fn emit_workbook(
    path_file_out: &Path,
    df_registry: &DataFrame,
    df_family: Option<&DataFrame>,
    summary: &[SpecSummaryRow],
    sheet_options: &SpecXlsxSheetWriteOptions,
    write_options: SpecXlsxWriteOptions,
) -> Result<Vec<SpecXlsxReport>, ExportError> {
    let to_write_failure = |message: String| ExportError::WriteFailure {
        path: path_file_out.to_path_buf(),
        message,
    };

    let df_summary = derive_summary_dataframe(summary)
        .map_err(|err| to_write_failure(format!("Failed to build summary table: {err}")))?;
    let opts_summary = SpecXlsxSheetWriteOptions {
        cols_integer: Some(vec![C_COL_SUMMARY_COUNT.to_string()]),
        ..sheet_options.clone()
    };

    let mut writer = XlsxWriter::new(
        path_file_out.to_path_buf(),
        derive_default_xlsx_formats(),
        write_options,
    );

    writer
        .write_sheet_from_dataframe(df_registry, C_SHEET_REGISTRY, sheet_options)
        .map_err(to_write_failure)?;
    if let Some(df_family) = df_family {
        writer
            .write_sheet_from_dataframe(df_family, C_SHEET_FAMILY, sheet_options)
            .map_err(to_write_failure)?;
    }
    writer
        .write_sheet_from_dataframe(&df_summary, C_SHEET_SUMMARY, &opts_summary)
        .map_err(to_write_failure)?;

    writer.close().map_err(to_write_failure)?;

    let l_reports = writer.report();
    for report in &l_reports {
        debug!(
            sheet = %report.sheet_name_requested,
            parts = report.sheets.len(),
            "sheet written"
        );
        for c_warning in &report.warnings {
            warn!("{c_warning}");
        }
    }
    Ok(l_reports)
}
