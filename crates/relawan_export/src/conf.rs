//! Export constants: source patterns, sheet names and registry column names.

/// Default glob for registry snapshots.
pub const C_PATTERN_REGISTRY: &str = "Data_Relawan_Lengkap_*.csv";
/// Default glob for family detail snapshots.
pub const C_PATTERN_FAMILY: &str = "Detail_Keluarga_Relawan_*.csv";
/// Default output file name prefix.
pub const C_PREFIX_OUTPUT: &str = "Data_Relawan_Lengkap_";
/// Output file extension.
pub const C_EXT_OUTPUT: &str = "xlsx";
/// `chrono` format of the timestamp embedded in the output name.
pub const C_FMT_TIMESTAMP_OUTPUT: &str = "%Y-%m-%d_%H-%M-%S";

/// Sheet holding the registry rows.
pub const C_SHEET_REGISTRY: &str = "Data Relawan";
/// Sheet holding the family detail rows.
pub const C_SHEET_FAMILY: &str = "Detail Keluarga";
/// Sheet holding the summary table.
pub const C_SHEET_SUMMARY: &str = "Ringkasan Statistik";

pub const C_COL_STATUS: &str = "Status";
pub const C_COL_NIK: &str = "NIK";
pub const C_COL_TELEPON: &str = "Telepon";
pub const C_COL_PENGHASILAN: &str = "Penghasilan Bulanan";
pub const C_COL_ORGANISASI: &str = "Organisasi";
pub const C_COL_JUMLAH_KELUARGA: &str = "Jumlah Anggota Keluarga";

/// Registry columns the summary depends on, in report order.
pub const TUP_COLS_REQUIRED: [&str; 6] = [
    C_COL_STATUS,
    C_COL_NIK,
    C_COL_TELEPON,
    C_COL_PENGHASILAN,
    C_COL_ORGANISASI,
    C_COL_JUMLAH_KELUARGA,
];

pub const C_STATUS_ACTIVE: &str = "Aktif";
pub const C_STATUS_INACTIVE: &str = "Tidak Aktif";

/// Summary table headers.
pub const C_COL_SUMMARY_CATEGORY: &str = "Kategori";
pub const C_COL_SUMMARY_COUNT: &str = "Jumlah";
pub const C_COL_SUMMARY_PERCENTAGE: &str = "Persentase";
