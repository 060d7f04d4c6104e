use std::fs;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use chrono::{Local, TimeZone};
use relawan_export::{
    EnumSchemaMode, EnumSummaryCategory, ExportError, SpecExportOptions, SpecExportReport,
    run_export_at,
};
use tempfile::TempDir;

const C_HEADER_REGISTRY: &str = "ID,Nama,Status,NIK,Telepon,Penghasilan Bulanan,Organisasi,Jumlah Anggota Keluarga";

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
    // Distinct creation times between consecutive fixtures.
    sleep(Duration::from_millis(30));
}

fn options_for(dir: &Path) -> SpecExportOptions {
    SpecExportOptions {
        dir_work: dir.to_path_buf(),
        ..SpecExportOptions::default()
    }
}

fn list_xlsx(dir: &Path) -> Vec<String> {
    let mut l_names: Vec<String> = fs::read_dir(dir)
        .expect("read_dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".xlsx"))
        .collect();
    l_names.sort();
    l_names
}

fn open_sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    workbook.sheet_names()
}

fn read_sheet(path: &Path, sheet_name: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    workbook.worksheet_range(sheet_name).expect("read sheet")
}

fn collect_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

fn run_at_fixed_time(options: &SpecExportOptions) -> Result<SpecExportReport, ExportError> {
    let time_generated = Local
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .single()
        .expect("unambiguous local time");
    run_export_at(options, time_generated)
}

#[test]
fn newest_registry_is_converted_with_family_sheet() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_old.csv",
        &format!("{C_HEADER_REGISTRY}\n9,Lama,Aktif,1,1,1,1,1\n"),
    );
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_new.csv",
        &format!(
            "{C_HEADER_REGISTRY}\n\
             1,Ani,Aktif,3201,0812,,,0\n\
             2,Budi,Aktif,,0813,,,2\n\
             3,Citra,Tidak Aktif,3202,0814,,,\n"
        ),
    );
    write_file(
        tmp.path(),
        "Detail_Keluarga_Relawan_a.csv",
        "User ID,Nama Relawan,Hubungan\n2,Budi,Anak\n2,Budi,Istri\n",
    );

    let report = run_at_fixed_time(&options_for(tmp.path())).expect("export");

    assert_eq!(
        report.path_file_registry,
        tmp.path().join("Data_Relawan_Lengkap_new.csv")
    );
    assert_eq!(
        report.path_file_out,
        tmp.path().join("Data_Relawan_Lengkap_2024-01-02_03-04-05.xlsx")
    );
    assert!(report.path_file_out.is_file());

    let l_sheets: Vec<&str> = report
        .sheets
        .iter()
        .map(|sheet| sheet.sheet_name_requested.as_str())
        .collect();
    assert_eq!(
        l_sheets,
        ["Data Relawan", "Detail Keluarga", "Ringkasan Statistik"]
    );

    let slice_registry = &report.sheets[0].sheets[0];
    assert_eq!(slice_registry.height_written(), 4);
    assert_eq!(slice_registry.width_written(), 8);
    assert_eq!(report.sheets[1].sheets[0].height_written(), 3);
    assert_eq!(report.n_rows_family, Some(2));

    assert_eq!(report.count(EnumSummaryCategory::TotalRelawan), 3);
    assert_eq!(report.count(EnumSummaryCategory::RelawanAktif), 2);
    assert_eq!(report.count(EnumSummaryCategory::RelawanTidakAktif), 1);
    assert_eq!(report.count(EnumSummaryCategory::ProfilLengkap), 2);
    assert_eq!(report.count(EnumSummaryCategory::AnggotaKeluarga), 1);
    assert_eq!(report.summary[1].percentage, "66.7%");
    assert!(report.warnings().is_empty());

    let path_out = &report.path_file_out;
    assert_eq!(
        open_sheet_names(path_out),
        ["Data Relawan", "Detail Keluarga", "Ringkasan Statistik"]
    );

    let range_registry = read_sheet(path_out, "Data Relawan");
    assert_eq!(range_registry.get_size(), (4, 8));
    let l_rows = collect_rows(&range_registry);
    assert_eq!(
        l_rows[0],
        [
            "ID",
            "Nama",
            "Status",
            "NIK",
            "Telepon",
            "Penghasilan Bulanan",
            "Organisasi",
            "Jumlah Anggota Keluarga"
        ]
    );
    assert_eq!(l_rows[1], ["1", "Ani", "Aktif", "3201", "0812", "", "", "0"]);
    assert_eq!(l_rows[2], ["2", "Budi", "Aktif", "", "0813", "", "", "2"]);
    assert_eq!(l_rows[3][..5], ["3", "Citra", "Tidak Aktif", "3202", "0814"]);
    // Text mode keeps identifiers as text, leading zeros included.
    assert!(matches!(range_registry.get((1, 4)), Some(Data::String(s)) if s == "0812"));

    let l_rows_family = collect_rows(&read_sheet(path_out, "Detail Keluarga"));
    assert_eq!(
        l_rows_family,
        [
            ["User ID", "Nama Relawan", "Hubungan"],
            ["2", "Budi", "Anak"],
            ["2", "Budi", "Istri"]
        ]
    );

    let range_summary = read_sheet(path_out, "Ringkasan Statistik");
    assert_eq!(range_summary.get_size(), (9, 3));
    let l_rows_summary = collect_rows(&range_summary);
    assert_eq!(l_rows_summary[0], ["Kategori", "Jumlah", "Persentase"]);
    assert_eq!(l_rows_summary[1], ["Total Relawan", "3", "100.0%"]);
    assert_eq!(l_rows_summary[2], ["Relawan Aktif", "2", "66.7%"]);
    assert_eq!(l_rows_summary[8], ["Memiliki Anggota Keluarga", "1", "33.3%"]);
    assert!(matches!(range_summary.get((1, 1)), Some(Data::Float(n)) if *n == 3.0));
}

#[test]
fn infer_types_writes_numeric_columns_as_numbers() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_1.csv",
        &format!("{C_HEADER_REGISTRY}\n7,Ani,Aktif,3201,0812,1000000,Karang Taruna,3\n"),
    );
    let options = SpecExportOptions {
        rule_schema: EnumSchemaMode::Infer,
        ..options_for(tmp.path())
    };

    let report = run_at_fixed_time(&options).expect("export");

    let range_registry = read_sheet(&report.path_file_out, "Data Relawan");
    assert!(matches!(range_registry.get((1, 0)), Some(Data::Float(n)) if *n == 7.0));
    assert!(matches!(range_registry.get((1, 1)), Some(Data::String(s)) if s == "Ani"));
}

#[test]
fn missing_family_file_writes_two_sheets() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_1.csv",
        &format!("{C_HEADER_REGISTRY}\n1,Ani,Aktif,3201,0812,1000000,Karang Taruna,3\n"),
    );

    let report = run_at_fixed_time(&options_for(tmp.path())).expect("export");

    assert!(report.path_file_family.is_none());
    assert_eq!(report.n_rows_family, None);
    let l_sheets: Vec<&str> = report
        .sheets
        .iter()
        .map(|sheet| sheet.sheet_name_requested.as_str())
        .collect();
    assert_eq!(l_sheets, ["Data Relawan", "Ringkasan Statistik"]);
    assert_eq!(list_xlsx(tmp.path()).len(), 1);
    assert_eq!(
        open_sheet_names(&report.path_file_out),
        ["Data Relawan", "Ringkasan Statistik"]
    );
}

#[test]
fn header_only_registry_succeeds_with_zero_percentages() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_1.csv",
        &format!("{C_HEADER_REGISTRY}\n"),
    );

    let report = run_at_fixed_time(&options_for(tmp.path())).expect("export");

    assert_eq!(report.count(EnumSummaryCategory::TotalRelawan), 0);
    assert!(report.summary.iter().all(|row| row.percentage == "0.0%"));
    assert_eq!(report.sheets[0].sheets[0].height_written(), 1);
}

#[test]
fn no_registry_file_fails_without_output() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Detail_Keluarga_Relawan_a.csv",
        "User ID,Hubungan\n1,Anak\n",
    );

    let err = run_at_fixed_time(&options_for(tmp.path())).expect_err("must fail");

    assert!(matches!(err, ExportError::NoInputFound { .. }));
    assert!(list_xlsx(tmp.path()).is_empty());
}

#[test]
fn missing_required_column_fails_without_output() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "Data_Relawan_Lengkap_1.csv",
        "ID,Nama,Status,Telepon\n1,Ani,Aktif,0812\n",
    );

    let err = run_at_fixed_time(&options_for(tmp.path())).expect_err("must fail");

    match err {
        ExportError::MissingColumn { columns } => assert_eq!(
            columns,
            ["NIK", "Penghasilan Bulanan", "Organisasi", "Jumlah Anggota Keluarga"]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(list_xlsx(tmp.path()).is_empty());
}

#[test]
fn invalid_pattern_is_reported() {
    let tmp = TempDir::new().expect("tempdir");
    let options = SpecExportOptions {
        pattern_registry: "Data_[".to_string(),
        ..options_for(tmp.path())
    };

    let err = run_at_fixed_time(&options).expect_err("must fail");
    assert!(matches!(err, ExportError::InvalidPattern(_)));
}
