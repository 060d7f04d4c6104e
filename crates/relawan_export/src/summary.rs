//! Summary statistics over the registry table.

use polars::df;
use polars::prelude::{Column, DataFrame, PolarsResult};
use relawan_io_xlsx::{EnumCellValue, derive_cell_value_from_any_value};

use crate::conf::{
    C_COL_JUMLAH_KELUARGA, C_COL_NIK, C_COL_ORGANISASI, C_COL_PENGHASILAN, C_COL_STATUS,
    C_COL_SUMMARY_CATEGORY, C_COL_SUMMARY_COUNT, C_COL_SUMMARY_PERCENTAGE, C_COL_TELEPON,
    C_STATUS_ACTIVE, C_STATUS_INACTIVE, TUP_COLS_REQUIRED,
};
use crate::spec::{EnumSummaryCategory, ExportError, SpecSummaryRow};

/// Format `count / total` as a one-decimal percentage; `0.0%` when `total == 0`.
pub fn format_percentage(count: usize, total: usize) -> String {
    let n_pct = if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    format!("{n_pct:.1}%")
}

/// Fail with every required column absent from `df`, in report order.
pub fn validate_required_columns(df: &DataFrame) -> Result<(), ExportError> {
    let l_colnames = df.get_column_names_str();
    let l_missing: Vec<String> = TUP_COLS_REQUIRED
        .iter()
        .filter(|c_name| !l_colnames.contains(c_name))
        .map(ToString::to_string)
        .collect();

    if l_missing.is_empty() {
        Ok(())
    } else {
        Err(ExportError::MissingColumn { columns: l_missing })
    }
}

/// Compute the eight summary rows.
///
/// `Status` is compared exactly (case-sensitive, untrimmed), so values other
/// than "Aktif" and "Tidak Aktif" count toward neither.
pub fn derive_summary_rows(df: &DataFrame) -> Result<Vec<SpecSummaryRow>, ExportError> {
    validate_required_columns(df)?;
    let n_total = df.height();

    let mut l_rows = Vec::with_capacity(EnumSummaryCategory::ALL.len());
    for category in EnumSummaryCategory::ALL {
        let count = match category {
            EnumSummaryCategory::TotalRelawan => n_total,
            EnumSummaryCategory::RelawanAktif => {
                count_matching(df, C_COL_STATUS, |v| is_text_equal(v, C_STATUS_ACTIVE))?
            }
            EnumSummaryCategory::RelawanTidakAktif => {
                count_matching(df, C_COL_STATUS, |v| is_text_equal(v, C_STATUS_INACTIVE))?
            }
            EnumSummaryCategory::ProfilLengkap => {
                count_matching(df, C_COL_NIK, EnumCellValue::is_present)?
            }
            EnumSummaryCategory::NomorTelepon => {
                count_matching(df, C_COL_TELEPON, EnumCellValue::is_present)?
            }
            EnumSummaryCategory::DataEkonomi => {
                count_matching(df, C_COL_PENGHASILAN, EnumCellValue::is_present)?
            }
            EnumSummaryCategory::DataSosial => {
                count_matching(df, C_COL_ORGANISASI, EnumCellValue::is_present)?
            }
            EnumSummaryCategory::AnggotaKeluarga => {
                count_matching(df, C_COL_JUMLAH_KELUARGA, |v| {
                    v.as_f64().is_some_and(|n| n > 0.0)
                })?
            }
        };
        l_rows.push(SpecSummaryRow {
            category,
            count,
            percentage: format_percentage(count, n_total),
        });
    }

    Ok(l_rows)
}

/// Build the summary sheet table (`Kategori`, `Jumlah`, `Persentase`).
pub fn derive_summary_dataframe(rows: &[SpecSummaryRow]) -> PolarsResult<DataFrame> {
    let l_labels: Vec<&str> = rows.iter().map(|row| row.category.label()).collect();
    let l_counts: Vec<i64> = rows.iter().map(|row| row.count as i64).collect();
    let l_pcts: Vec<&str> = rows.iter().map(|row| row.percentage.as_str()).collect();

    df!(
        C_COL_SUMMARY_CATEGORY => l_labels,
        C_COL_SUMMARY_COUNT => l_counts,
        C_COL_SUMMARY_PERCENTAGE => l_pcts
    )
}

fn count_matching<F>(df: &DataFrame, c_col: &str, predicate: F) -> Result<usize, ExportError>
where
    F: Fn(&EnumCellValue) -> bool,
{
    let col: &Column = df.column(c_col).map_err(|_| ExportError::MissingColumn {
        columns: vec![c_col.to_string()],
    })?;

    let mut n_count = 0usize;
    for n_idx_row in 0..col.len() {
        let value = col
            .get(n_idx_row)
            .map(derive_cell_value_from_any_value)
            .map_err(|err| {
                ExportError::Aggregate(format!("Failed to read {c_col:?} row {n_idx_row}: {err}"))
            })?;
        if predicate(&value) {
            n_count += 1;
        }
    }
    Ok(n_count)
}

fn is_text_equal(value: &EnumCellValue, expected: &str) -> bool {
    matches!(value, EnumCellValue::String(s) if s == expected)
}
