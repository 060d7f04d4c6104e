//! CSV source loading.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::spec::{EnumSchemaMode, ExportError};

/// Rows sampled for type inference under [`EnumSchemaMode::Infer`].
const N_ROWS_INFER_SCHEMA: usize = 1_000;
/// Suffix the CSV reader appends to a repeated header name.
const C_SUFFIX_DUPLICATED: &str = "_duplicated_";

/// Read one UTF-8, comma-separated, header-first file into memory.
///
/// Empty fields load as nulls. A header that repeats a column name is a
/// [`ExportError::ReadFailure`], since the reader would otherwise rename the
/// repeat. The file handle is released before returning.
pub fn read_csv_table(
    path_file: &Path,
    rule_schema: EnumSchemaMode,
) -> Result<DataFrame, ExportError> {
    let n_rows_infer = match rule_schema {
        EnumSchemaMode::Text => 0,
        EnumSchemaMode::Infer => N_ROWS_INFER_SCHEMA,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(n_rows_infer))
        .try_into_reader_with_file_path(Some(path_file.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|err| ExportError::ReadFailure {
            path: path_file.to_path_buf(),
            message: err.to_string(),
        })?;
    validate_header_unrenamed(&df).map_err(|message| ExportError::ReadFailure {
        path: path_file.to_path_buf(),
        message,
    })?;

    debug!(
        path = %path_file.display(),
        rows = df.height(),
        cols = df.width(),
        "loaded csv"
    );
    Ok(df)
}

/// Detect `<name>_duplicated_<n>` columns whose `<name>` is also a column.
fn validate_header_unrenamed(df: &DataFrame) -> Result<(), String> {
    let l_colnames = df.get_column_names_str();
    let l_repeated: Vec<&str> = l_colnames
        .iter()
        .filter_map(|c_name| {
            let (c_base, c_idx) = c_name.rsplit_once(C_SUFFIX_DUPLICATED)?;
            let if_renamed = !c_idx.is_empty()
                && c_idx.chars().all(|chr| chr.is_ascii_digit())
                && l_colnames.contains(&c_base);
            if_renamed.then_some(c_base)
        })
        .collect();

    if l_repeated.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Duplicate column names in header: {}",
            l_repeated.join(", ")
        ))
    }
}
