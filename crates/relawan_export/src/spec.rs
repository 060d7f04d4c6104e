//! Export options, summary models, run report and errors.

use std::fmt;
use std::path::PathBuf;

use relawan_io_fs::SelectSourceError;
use relawan_io_xlsx::{SpecXlsxReport, SpecXlsxSheetWriteOptions, SpecXlsxWriteOptions};
use thiserror::Error;

use crate::conf::{C_PATTERN_FAMILY, C_PATTERN_REGISTRY, C_PREFIX_OUTPUT};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// How CSV cell types are decided on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSchemaMode {
    /// Every column is read as text, so cells pass through unchanged.
    #[default]
    Text,
    /// Infer numeric column types from the data.
    Infer,
}

impl EnumSchemaMode {
    /// Writer typing for this mode: inferred numeric columns are written as
    /// numbers, text mode writes every source cell as text.
    pub fn derive_xlsx_write_options(self) -> SpecXlsxWriteOptions {
        let if_infer = self == Self::Infer;
        SpecXlsxWriteOptions {
            infer_numeric_cols: if_infer,
            infer_integer_cols: if_infer,
        }
    }
}

/// The eight fixed summary categories, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumSummaryCategory {
    TotalRelawan,
    RelawanAktif,
    RelawanTidakAktif,
    ProfilLengkap,
    NomorTelepon,
    DataEkonomi,
    DataSosial,
    AnggotaKeluarga,
}

impl EnumSummaryCategory {
    /// All categories in sheet order.
    pub const ALL: [EnumSummaryCategory; 8] = [
        Self::TotalRelawan,
        Self::RelawanAktif,
        Self::RelawanTidakAktif,
        Self::ProfilLengkap,
        Self::NomorTelepon,
        Self::DataEkonomi,
        Self::DataSosial,
        Self::AnggotaKeluarga,
    ];

    /// Label written to the summary sheet.
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalRelawan => "Total Relawan",
            Self::RelawanAktif => "Relawan Aktif",
            Self::RelawanTidakAktif => "Relawan Tidak Aktif",
            Self::ProfilLengkap => "Memiliki Profil Lengkap (NIK)",
            Self::NomorTelepon => "Memiliki Nomor Telepon",
            Self::DataEkonomi => "Memiliki Data Ekonomi",
            Self::DataSosial => "Memiliki Data Sosial",
            Self::AnggotaKeluarga => "Memiliki Anggota Keluarga",
        }
    }
}

impl fmt::Display for EnumSummaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsInit

/// Input options for [`crate::pipeline::run_export`].
#[derive(Debug, Clone)]
pub struct SpecExportOptions {
    /// Directory scanned for sources and receiving the workbook.
    pub dir_work: PathBuf,
    /// Glob for registry snapshots (required).
    pub pattern_registry: String,
    /// Glob for family detail snapshots (optional).
    pub pattern_family: String,
    /// Output file name prefix; the timestamp and extension are appended.
    pub prefix_output: String,
    /// CSV typing rule.
    pub rule_schema: EnumSchemaMode,
    /// Styling options applied to the registry and family sheets.
    pub sheet_options: SpecXlsxSheetWriteOptions,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            dir_work: PathBuf::from("."),
            pattern_registry: C_PATTERN_REGISTRY.to_string(),
            pattern_family: C_PATTERN_FAMILY.to_string(),
            prefix_output: C_PREFIX_OUTPUT.to_string(),
            rule_schema: EnumSchemaMode::Text,
            sheet_options: SpecXlsxSheetWriteOptions::default(),
        }
    }
}

/// One row of the summary sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSummaryRow {
    pub category: EnumSummaryCategory,
    pub count: usize,
    /// `count / total * 100` with one decimal and a trailing `%`.
    pub percentage: String,
}

/// Outcome of one successful export run.
#[derive(Debug, Clone)]
pub struct SpecExportReport {
    /// Registry CSV that was converted.
    pub path_file_registry: PathBuf,
    /// Family CSV that was included, if any.
    pub path_file_family: Option<PathBuf>,
    /// Workbook written.
    pub path_file_out: PathBuf,
    /// Summary rows as written to the summary sheet.
    pub summary: Vec<SpecSummaryRow>,
    /// Number of family detail rows written.
    pub n_rows_family: Option<usize>,
    /// Per-sheet write reports in workbook order.
    pub sheets: Vec<SpecXlsxReport>,
}

impl SpecExportReport {
    /// Count for `category`; zero when absent.
    pub fn count(&self, category: EnumSummaryCategory) -> usize {
        self.summary
            .iter()
            .find(|row| row.category == category)
            .map_or(0, |row| row.count)
    }

    /// Non-fatal warnings collected across all sheets.
    pub fn warnings(&self) -> Vec<String> {
        self.sheets
            .iter()
            .flat_map(|report| report.warnings.iter().cloned())
            .collect()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} out={} total={} active={} with_profile={} with_phone={} family_rows={}",
            self.path_file_out.display(),
            self.count(EnumSummaryCategory::TotalRelawan),
            self.count(EnumSummaryCategory::RelawanAktif),
            self.count(EnumSummaryCategory::ProfilLengkap),
            self.count(EnumSummaryCategory::NomorTelepon),
            self.n_rows_family
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
        )
    }
}

impl fmt::Display for SpecExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[EXPORT]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Fatal export failures. A missing family file is not an error.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No file matches the registry pattern.
    #[error("No registry CSV file found matching {pattern:?}")]
    NoInputFound { pattern: String },

    /// A source pattern failed to compile.
    #[error("{0}")]
    InvalidPattern(String),

    /// A source could not be listed, opened or parsed.
    #[error("Failed to read {}: {message}", .path.display())]
    ReadFailure { path: PathBuf, message: String },

    /// Registry schema lacks columns the summary depends on.
    #[error("Missing required column(s): {}", .columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    /// Registry values could not be aggregated.
    #[error("Failed to aggregate registry: {0}")]
    Aggregate(String),

    /// Workbook could not be built or saved.
    #[error("Failed to write workbook {}: {message}", .path.display())]
    WriteFailure { path: PathBuf, message: String },
}

impl From<SelectSourceError> for ExportError {
    fn from(err: SelectSourceError) -> Self {
        match err {
            SelectSourceError::InvalidPattern(msg) => Self::InvalidPattern(msg),
            SelectSourceError::NoInputFound { pattern } => Self::NoInputFound { pattern },
            SelectSourceError::ListingFailed { path, message } => {
                Self::ReadFailure { path, message }
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
