//! End-to-end run: select sources, aggregate, emit.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use relawan_io_fs::{list_source_entries, select_sources};
use tracing::{debug, info, warn};

use crate::conf::{C_EXT_OUTPUT, C_FMT_TIMESTAMP_OUTPUT};
use crate::emit::emit_workbook;
use crate::load::read_csv_table;
use crate::spec::{EnumSummaryCategory, ExportError, SpecExportOptions, SpecExportReport};
use crate::summary::derive_summary_rows;

/// Run one conversion, stamping the output name with the current local time.
pub fn run_export(options: &SpecExportOptions) -> Result<SpecExportReport, ExportError> {
    run_export_at(options, Local::now())
}

/// Run one conversion with an explicit generation timestamp.
///
/// Stages run strictly in order; every fatal condition is raised before the
/// workbook is saved, and no file is written when sources are missing.
pub fn run_export_at(
    options: &SpecExportOptions,
    time_generated: DateTime<Local>,
) -> Result<SpecExportReport, ExportError> {
    let l_entries = list_source_entries(&options.dir_work)?;
    debug!(
        dir = %options.dir_work.display(),
        entries = ?l_entries.iter().map(|e| e.name_file.as_str()).collect::<Vec<_>>(),
        "listed candidate sources"
    );

    let selection = select_sources(
        &l_entries,
        &options.pattern_registry,
        &options.pattern_family,
    )?;
    info!("Reading registry: {}", selection.registry.path_file.display());

    let df_registry = read_csv_table(&selection.registry.path_file, options.rule_schema)?;
    let summary = derive_summary_rows(&df_registry)?;

    let df_family = match &selection.family {
        Some(entry) => {
            info!("Reading family detail: {}", entry.path_file.display());
            Some(read_csv_table(&entry.path_file, options.rule_schema)?)
        }
        None => {
            warn!(
                pattern = %options.pattern_family,
                "No family detail file found; sheet omitted"
            );
            None
        }
    };

    let path_file_out = derive_output_path(
        &options.dir_work,
        &options.prefix_output,
        &time_generated,
    );
    let sheets = emit_workbook(
        &path_file_out,
        &df_registry,
        df_family.as_ref(),
        &summary,
        &options.sheet_options,
        options.rule_schema.derive_xlsx_write_options(),
    )?;

    let report = SpecExportReport {
        path_file_registry: selection.registry.path_file,
        path_file_family: selection.family.map(|entry| entry.path_file),
        path_file_out,
        summary,
        n_rows_family: df_family.as_ref().map(|df| df.height()),
        sheets,
    };

    info!("Workbook written: {}", report.path_file_out.display());
    info!(
        "Total relawan: {}",
        report.count(EnumSummaryCategory::TotalRelawan)
    );
    info!(
        "Relawan aktif: {}",
        report.count(EnumSummaryCategory::RelawanAktif)
    );
    info!(
        "Memiliki profil lengkap: {}",
        report.count(EnumSummaryCategory::ProfilLengkap)
    );
    info!(
        "Memiliki nomor telepon: {}",
        report.count(EnumSummaryCategory::NomorTelepon)
    );
    if let Some(n_rows_family) = report.n_rows_family {
        info!("Total data keluarga: {n_rows_family}");
    }
    debug!("{report}");

    Ok(report)
}

/// `<dir>/<prefix><YYYY-MM-DD_HH-MM-SS>.xlsx`
pub fn derive_output_path(
    dir_work: &Path,
    prefix_output: &str,
    time_generated: &DateTime<Local>,
) -> PathBuf {
    dir_work.join(format!(
        "{prefix_output}{}.{C_EXT_OUTPUT}",
        time_generated.format(C_FMT_TIMESTAMP_OUTPUT)
    ))
}
