//! Workbook writer: one DataFrame per logical sheet, styled and autofitted.

use std::collections::BTreeSet;
use std::path::PathBuf;

use polars::prelude::{AnyValue, Column, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::conf::N_LEN_EXCEL_SHEET_NAME_MAX;
use crate::spec::{
    EnumCellValue, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetSlice, SpecXlsxFormats,
    SpecXlsxReport, SpecXlsxSheetWriteOptions, SpecXlsxWriteOptions,
};
use crate::util::{
    convert_cell_value, estimate_unicode_string_width, estimate_width_len, plan_sheet_slices,
    sanitize_sheet_name, select_column_indices, validate_unique_columns,
};

/// Excel hard cap on column width, in characters.
const N_WIDTH_EXCEL_COLUMN_MAX: usize = 255;

/// Column positions written as numbers; `set_integer` is a subset of `set_numeric`.
struct ColumnKinds {
    set_numeric: BTreeSet<usize>,
    set_integer: BTreeSet<usize>,
}

struct ColumnFormats {
    plain: Format,
    striped: Format,
}

/// Stateful workbook writer.
///
/// Sheets are buffered in memory; nothing touches disk until [`Self::close`].
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: SpecXlsxFormats,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_sheet_names: Vec<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    pub fn new(
        path_file_out: PathBuf,
        formats: SpecXlsxFormats,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats,
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_sheet_names: Vec::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Per-sheet write reports, in write order.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Worksheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.l_sheet_names
    }

    /// Save the workbook. Idempotent once it has succeeded.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write `df_data` as one logical sheet: a styled header row, then one row
    /// per record with columns in frame order.
    ///
    /// Tables beyond Excel row/column limits are split across several sheets;
    /// the split is recorded as a warning in the sheet's report.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }
        validate_policy_autofit(&options.policy_autofit)?;

        let l_colnames: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames)?;
        let kinds = self.derive_column_kinds(df_data, &l_colnames, options)?;

        let mut report = SpecXlsxReport {
            sheet_name_requested: sheet_name.to_string(),
            ..Default::default()
        };
        let l_slices = plan_sheet_slices(
            df_data.height(),
            l_colnames.len(),
            &sanitize_sheet_name(sheet_name, "_"),
            &mut report,
        );

        for sheet_slice in l_slices {
            let sheet_name_unique = self.derive_unique_sheet_name(&sheet_slice.sheet_name);
            self.write_slice(
                df_data,
                &l_colnames,
                &sheet_slice,
                &sheet_name_unique,
                &kinds,
                options,
            )?;
            self.l_sheet_names.push(sheet_name_unique.clone());
            report.sheets.push(SpecSheetSlice {
                sheet_name: sheet_name_unique,
                ..sheet_slice
            });
        }

        self.l_reports.push(report);
        Ok(())
    }

    /// Explicit `cols_integer` wins over dtype-based integer inference.
    fn derive_column_kinds(
        &self,
        df_data: &DataFrame,
        l_colnames: &[String],
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<ColumnKinds, String> {
        let l_cols = df_data.get_columns();
        let set_numeric_dtype: BTreeSet<usize> = if self.write_options.infer_numeric_cols {
            (0..l_cols.len())
                .filter(|&n_idx| l_cols[n_idx].dtype().is_numeric())
                .collect()
        } else {
            BTreeSet::new()
        };

        let set_integer: BTreeSet<usize> = match options.cols_integer.as_deref() {
            Some(l_names) if !l_names.is_empty() => select_column_indices(l_colnames, l_names)?
                .into_iter()
                .collect(),
            _ if self.write_options.infer_integer_cols => set_numeric_dtype
                .iter()
                .copied()
                .filter(|&n_idx| l_cols[n_idx].dtype().is_integer())
                .collect(),
            _ => BTreeSet::new(),
        };

        Ok(ColumnKinds {
            set_numeric: set_numeric_dtype.union(&set_integer).copied().collect(),
            set_integer,
        })
    }

    fn write_slice(
        &mut self,
        df_data: &DataFrame,
        l_colnames: &[String],
        sheet_slice: &SpecSheetSlice,
        sheet_name: &str,
        kinds: &ColumnKinds,
        options: &SpecXlsxSheetWriteOptions,
    ) -> Result<(), String> {
        let range_cols = sheet_slice.col_start_inclusive..sheet_slice.col_end_exclusive;
        let n_rows = sheet_slice.row_end_exclusive - sheet_slice.row_start_inclusive;
        let l_header = &l_colnames[range_cols.clone()];

        let l_formats: Vec<ColumnFormats> = range_cols
            .clone()
            .map(|n_idx| {
                let fmt_spec = if kinds.set_integer.contains(&n_idx) {
                    &self.formats.integer
                } else if kinds.set_numeric.contains(&n_idx) {
                    &self.formats.decimal
                } else {
                    &self.formats.text
                };
                ColumnFormats {
                    plain: derive_rust_xlsx_format(fmt_spec),
                    striped: derive_rust_xlsx_format(&fmt_spec.merge(&self.formats.stripe)),
                }
            })
            .collect();
        let fmt_header = derive_rust_xlsx_format(&self.formats.header);
        let l_cols: Vec<(usize, Column)> = range_cols
            .clone()
            .map(|n_idx| {
                let col = df_data.get_columns()[n_idx]
                    .slice(sheet_slice.row_start_inclusive as i64, n_rows);
                (n_idx, col)
            })
            .collect();

        let policy = &options.policy_autofit;
        let n_rows_sampled = match (policy.if_enabled, policy.height_body_inferred_max) {
            (false, _) => 0,
            (true, Some(n_max)) => usize::min(n_rows, n_max),
            (true, None) => n_rows,
        };
        let mut l_widths: Vec<usize> = l_header
            .iter()
            .map(|c_name| estimate_unicode_string_width(c_name))
            .collect();

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .map_err(derive_xlsx_error_text)?;

        for (n_col, c_name) in l_header.iter().enumerate() {
            write_cell(
                worksheet,
                0,
                n_col,
                &EnumCellValue::String(c_name.clone()),
                &fmt_header,
            )?;
        }
        if options.if_freeze_header {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(derive_xlsx_error_text)?;
        }

        for n_row in 0..n_rows {
            // Body row 0 sits on worksheet row 2, so striping hits even rows.
            let if_striped = options.if_zebra_rows && n_row % 2 == 0;

            for (n_col, (n_idx_abs, col)) in l_cols.iter().enumerate() {
                let if_integer = kinds.set_integer.contains(n_idx_abs);
                let value_raw = col
                    .get(n_row)
                    .map(derive_cell_value_from_any_value)
                    .map_err(|err| format!("Failed to access cell value: {err}"))?;
                let value = convert_cell_value(
                    &value_raw,
                    kinds.set_numeric.contains(n_idx_abs),
                    if_integer,
                );

                if n_row < n_rows_sampled {
                    l_widths[n_col] =
                        usize::max(l_widths[n_col], estimate_width_len(&value, if_integer));
                }

                let fmt_cell = if if_striped {
                    &l_formats[n_col].striped
                } else {
                    &l_formats[n_col].plain
                };
                write_cell(worksheet, 1 + n_row, n_col, &value, fmt_cell)?;
            }
        }

        if policy.if_enabled {
            let n_width_max = usize::min(N_WIDTH_EXCEL_COLUMN_MAX, policy.width_cell_max);
            for (n_col, n_width) in l_widths.into_iter().enumerate() {
                let n_width_final =
                    (n_width + policy.width_cell_padding).clamp(policy.width_cell_min, n_width_max);
                worksheet
                    .set_column_width(cast_col_num(n_col)?, n_width_final as f64)
                    .map_err(derive_xlsx_error_text)?;
            }
        }

        Ok(())
    }

    /// Excel compares sheet names case-insensitively.
    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if self.set_sheet_names_existing.insert(name.to_lowercase()) {
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if self.set_sheet_names_existing.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Normalize one polars value into the writer's cell model.
///
/// Nulls map to [`EnumCellValue::None`]; empty strings stay empty text.
pub fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        _ if value.dtype().is_numeric() => match value.extract::<f64>() {
            Some(val) => EnumCellValue::Number(val),
            None => EnumCellValue::String(value.to_string()),
        },
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), String> {
    if policy_autofit.width_cell_min == 0 {
        return Err("policy_autofit.width_cell_min must be >= 1.".to_string());
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min
        || policy_autofit.width_cell_min > N_WIDTH_EXCEL_COLUMN_MAX
    {
        return Err(format!(
            "policy_autofit widths must satisfy 1 <= min <= max and min <= {N_WIDTH_EXCEL_COLUMN_MAX}."
        ));
    }
    Ok(())
}

/// Blank cells keep the row style so stripes and borders stay continuous.
fn write_cell(
    worksheet: &mut Worksheet,
    n_row: usize,
    n_col: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    let (row, col) = (cast_row_num(n_row)?, cast_col_num(n_col)?);
    let result = match value {
        EnumCellValue::None => worksheet.write_blank(row, col, format),
        EnumCellValue::String(val) if val.is_empty() => worksheet.write_blank(row, col, format),
        EnumCellValue::String(val) => worksheet.write_string_with_format(row, col, val, format),
        EnumCellValue::Number(val) => worksheet.write_number_with_format(row, col, *val, format),
    };
    result.map(|_| ()).map_err(derive_xlsx_error_text)
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(f64::from(val));
    }
    if spec.bold == Some(true) {
        format = format.set_bold();
    }
    if let Some(align) = spec.align.as_deref().and_then(derive_format_align) {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.as_str());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }
    if spec.if_border_thin == Some(true) {
        format = format.set_border(FormatBorder::Thin);
        if let Some(val) = &spec.border_color {
            format = format.set_border_color(val.as_str());
        }
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
