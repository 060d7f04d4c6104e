//! `relawan_export` command-line entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use relawan_export::conf::{C_PATTERN_FAMILY, C_PATTERN_REGISTRY, C_PREFIX_OUTPUT};
use relawan_export::{EnumSchemaMode, SpecExportOptions, SpecExportReport, run_export};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

/// Convert the newest volunteer registry CSV into a styled XLSX workbook.
///
/// With no arguments, scans the current directory for
/// `Data_Relawan_Lengkap_*.csv` (and optionally `Detail_Keluarga_Relawan_*.csv`)
/// and writes `Data_Relawan_Lengkap_<timestamp>.xlsx` next to them.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to scan for sources and to write the workbook into
    #[arg(long, default_value = ".", value_name = "DIR")]
    dir: PathBuf,

    /// Glob for registry snapshots
    #[arg(long, default_value = C_PATTERN_REGISTRY, value_name = "GLOB")]
    pattern_registry: String,

    /// Glob for family detail snapshots
    #[arg(long, default_value = C_PATTERN_FAMILY, value_name = "GLOB")]
    pattern_family: String,

    /// Output file name prefix; timestamp and extension are appended
    #[arg(long, default_value = C_PREFIX_OUTPUT, value_name = "PREFIX")]
    output_prefix: String,

    /// Infer numeric column types instead of passing every cell through as text
    #[arg(long)]
    infer_types: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn to_export_options(&self) -> SpecExportOptions {
        SpecExportOptions {
            dir_work: self.dir.clone(),
            pattern_registry: self.pattern_registry.clone(),
            pattern_family: self.pattern_family.clone(),
            prefix_output: self.output_prefix.clone(),
            rule_schema: if self.infer_types {
                EnumSchemaMode::Infer
            } else {
                EnumSchemaMode::Text
            },
            ..SpecExportOptions::default()
        }
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

fn init_logging(args: &Args) {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
}

/// Fatal errors are logged, then returned so the process prints
/// `Error: <message>` and exits with status 1.
fn run(args: &Args) -> Result<SpecExportReport> {
    let report = run_export(&args.to_export_options()).inspect_err(|err| error!("{err}"))?;
    Ok(report)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let report = run(&args)?;
    if !args.quiet {
        println!("{report}");
    }
    Ok(())
}
