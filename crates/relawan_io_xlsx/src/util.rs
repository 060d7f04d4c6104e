//! Pure helpers behind the workbook writer: cell typing, widths, sheet naming and slicing.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, SpecSheetSlice, SpecXlsxReport};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Decide how one cell is written given its column typing.
///
/// Text columns receive text; numeric columns receive numbers where the value
/// parses. Missing and non-finite values become blanks.
pub fn convert_cell_value(
    value: &EnumCellValue,
    if_is_numeric_col: bool,
    if_is_integer_col: bool,
) -> EnumCellValue {
    match value {
        EnumCellValue::None => EnumCellValue::None,
        EnumCellValue::Number(n) if !n.is_finite() => EnumCellValue::None,
        EnumCellValue::Number(n) => {
            let if_as_number = if_is_numeric_col && !(if_is_integer_col && n.fract() != 0.0);
            if if_as_number {
                EnumCellValue::Number(*n)
            } else {
                EnumCellValue::String(n.to_string())
            }
        }
        EnumCellValue::String(s) if if_is_numeric_col => {
            let n_parsed = if if_is_integer_col {
                s.trim().parse::<i64>().ok().map(|v| v as f64)
            } else {
                s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
            };
            n_parsed.map_or_else(|| value.clone(), EnumCellValue::Number)
        }
        EnumCellValue::String(_) => value.clone(),
    }
}

/// Estimate displayed width units for a text, weighting non-ASCII glyphs wider.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Estimate displayed width units for one normalized cell value.
pub fn estimate_width_len(value: &EnumCellValue, if_is_integer_col: bool) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) if if_is_integer_col || n.fract() == 0.0 => {
            (*n as i64).to_string().len()
        }
        EnumCellValue::Number(n) => format!("{n:.2}").len(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Reject tables whose header repeats a name; the message lists each repeat
/// with its positions.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), String> {
    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name.as_str()).or_default().push(n_idx);
    }
    if dict_pos.len() == columns.len() {
        return Ok(());
    }

    let l_dupes: Vec<String> = dict_pos
        .into_iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {l_pos:?}", l_pos.len()))
        .collect();
    Err(format!("Duplicate column names detected: {}", l_dupes.join("; ")))
}

/// Resolve column names to sorted unique positions.
pub fn select_column_indices(columns: &[String], names: &[String]) -> Result<Vec<usize>, String> {
    let mut set_idx = BTreeSet::new();
    for c_name in names {
        let n_idx = columns
            .iter()
            .position(|c_col| c_col == c_name)
            .ok_or_else(|| format!("Column not found: {c_name:?}"))?;
        set_idx.insert(n_idx);
    }
    Ok(set_idx.into_iter().collect())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Map `name` onto a legal sheet name: illegal characters replaced, outer
/// spaces and quotes stripped, at most 31 characters, never empty.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let c_replaced = TUP_EXCEL_ILLEGAL
        .iter()
        .fold(name.to_string(), |acc, c_illegal| acc.replace(*c_illegal, replace_to));
    let c_trimmed = c_replaced.trim().trim_matches('\'');
    let c_base = if c_trimmed.is_empty() { "Sheet" } else { c_trimmed };

    c_base.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Split a table into slices that each fit one worksheet.
///
/// One header row is reserved at the top of every slice.
pub fn plan_sheet_slices(
    height_df: usize,
    width_df: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Vec<SpecSheetSlice> {
    plan_sheet_slices_with_limits(
        height_df,
        width_df,
        sheet_name,
        N_NROWS_EXCEL_MAX - 1,
        N_NCOLS_EXCEL_MAX,
        report,
    )
}

fn plan_sheet_slices_with_limits(
    height_df: usize,
    width_df: usize,
    sheet_name: &str,
    n_rows_data_max: usize,
    n_cols_max: usize,
    report: &mut SpecXlsxReport,
) -> Vec<SpecSheetSlice> {
    let l_col_ranges = split_range(width_df, n_cols_max);
    let l_row_ranges = split_range(height_df, n_rows_data_max);
    let n_parts = l_col_ranges.len() * l_row_ranges.len();

    let l_parts: Vec<SpecSheetSlice> = l_col_ranges
        .iter()
        .flat_map(|cols| l_row_ranges.iter().map(move |rows| (*cols, *rows)))
        .enumerate()
        .map(|(n_idx, ((n_col_lo, n_col_hi), (n_row_lo, n_row_hi)))| SpecSheetSlice {
            sheet_name: if n_parts == 1 {
                sheet_name.to_string()
            } else {
                create_sheet_identifier(sheet_name, n_idx + 1)
            },
            row_start_inclusive: n_row_lo,
            row_end_exclusive: n_row_hi,
            col_start_inclusive: n_col_lo,
            col_end_exclusive: n_col_hi,
        })
        .collect();

    if n_parts > 1 {
        report.warn(format!(
            "{sheet_name:?} exceeds Excel sheet limits; split into {n_parts} sheets."
        ));
    }
    l_parts
}

/// Half-open chunks of `0..n_len`, at most `n_step` long; one empty chunk when `n_len == 0`.
fn split_range(n_len: usize, n_step: usize) -> Vec<(usize, usize)> {
    if n_len == 0 {
        return vec![(0, 0)];
    }
    (0..n_len)
        .step_by(n_step)
        .map(|n_lo| (n_lo, usize::min(n_len, n_lo + n_step)))
        .collect()
}

/// `<base>_<part>`, with `base` shortened so the whole stays within 31 characters.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_suffix = format!("_{part_idx_1based}");
    let n_keep = usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len()));
    let mut c_name: String = base_name.chars().take(n_keep).collect();
    c_name.push_str(&c_suffix);
    c_name
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_column_keeps_text() {
        assert_eq!(
            convert_cell_value(&EnumCellValue::String("007".into()), false, false),
            EnumCellValue::String("007".into())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(3.0), false, false),
            EnumCellValue::String("3".into())
        );
    }

    #[test]
    fn missing_and_non_finite_become_blank() {
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(f64::NAN), true, false),
            EnumCellValue::None
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, false, false),
            EnumCellValue::None
        );
    }

    #[test]
    fn integer_column_parses_text_and_keeps_fractions_as_text() {
        assert_eq!(
            convert_cell_value(&EnumCellValue::String(" 4 ".into()), true, true),
            EnumCellValue::Number(4.0)
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(2.5), true, true),
            EnumCellValue::String("2.5".into())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::String("n/a".into()), true, true),
            EnumCellValue::String("n/a".into())
        );
    }

    #[test]
    fn duplicate_columns_report_positions() {
        let cols = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        let err = validate_unique_columns(&cols).expect_err("must fail");
        assert_eq!(
            err,
            "Duplicate column names detected: \"A\" x2 at indices [0, 2]"
        );
        assert!(validate_unique_columns(&cols[..2]).is_ok());
    }

    #[test]
    fn column_indices_resolve_by_name() {
        let cols = vec!["Kategori".to_string(), "Jumlah".to_string()];
        let names = vec!["Jumlah".to_string(), "Kategori".to_string()];
        assert_eq!(select_column_indices(&cols, &names).expect("resolve"), vec![0, 1]);
        let names_bad = vec!["Persentase".to_string()];
        assert!(select_column_indices(&cols, &names_bad).is_err());
    }

    #[test]
    fn sheet_name_is_sanitized() {
        assert_eq!(sanitize_sheet_name("Data/Relawan", "_"), "Data_Relawan");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn single_slice_when_within_limits() {
        let mut report = SpecXlsxReport::default();
        let parts = plan_sheet_slices(3, 5, "Data Relawan", &mut report);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].sheet_name, "Data Relawan");
        assert_eq!(parts[0].height_written(), 4);
        assert_eq!(parts[0].width_written(), 5);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_table_keeps_header_sheet() {
        let mut report = SpecXlsxReport::default();
        let parts = plan_sheet_slices(0, 2, "Detail Keluarga", &mut report);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].height_written(), 1);
    }

    #[test]
    fn overflow_splits_columns_first_and_warns() {
        let mut report = SpecXlsxReport::default();
        let parts = plan_sheet_slices_with_limits(5, 3, "Data", 2, 2, &mut report);
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0].sheet_name, "Data_1");
        assert_eq!(
            (parts[2].row_start_inclusive, parts[2].row_end_exclusive),
            (4, 5)
        );
        assert_eq!(
            (parts[3].col_start_inclusive, parts[3].col_end_exclusive),
            (2, 3)
        );
        assert_eq!(report.warnings.len(), 1);
    }
}
