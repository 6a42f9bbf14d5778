//! Dialogue localization CSV CLI
//!
//! Command-line tool for exporting dialogue texts to a localization CSV,
//! importing translated CSVs back, and inspecting CSV files.

use clap::{Parser, Subcommand};
use dlgcsv_core::{
    export_table, import_table, read_table, scan_containers, write_table, LineEnding, Settings,
    Table,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Settings file used when `--config` is not given
const DEFAULT_CONFIG: &str = "dlgcsv.json";

#[derive(Parser)]
#[command(name = "dlgcsv")]
#[command(about = "Dialogue localization CSV tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and display a CSV file
    Parse {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Fail on unterminated quoted fields
        #[arg(long)]
        strict: bool,

        /// Print the whole table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-write a CSV file in canonical form
    Normalize {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Use LF line endings instead of CRLF
        #[arg(long)]
        lf: bool,
    },

    /// Check a CSV file for malformed quoting
    Check {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export every dialogue container under the roots to a CSV file
    Export {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// Output file path (defaults to the configured CSV path under the first root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Settings file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Import a CSV file into every dialogue container under the roots
    Import {
        /// Root directories to scan
        #[arg(short, long, required = true)]
        root: Vec<PathBuf>,

        /// CSV file (defaults to the configured CSV path under the first root)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Settings file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Write the import report (JSON) to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Create a settings file with default values
    InitConfig {
        /// Output path for the settings file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> dlgcsv_core::Result<()> {
    match command {
        Commands::Parse { file, strict, json } => cmd_parse(&file, strict, json),
        Commands::Normalize { file, output, lf } => cmd_normalize(&file, &output, lf),
        Commands::Check { file } => cmd_check(&file),
        Commands::Export { root, output, config } => cmd_export(&root, output, &config),
        Commands::Import {
            root,
            csv,
            config,
            report,
        } => cmd_import(&root, csv, &config, report),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

fn cmd_parse(file: &Path, strict: bool, json: bool) -> dlgcsv_core::Result<()> {
    let table = read_table(file, strict)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Rows: {}", table.row_count());
    println!("Columns: {}", table.width());
    println!();
    print_rows(&table, 10);

    Ok(())
}

fn cmd_normalize(file: &Path, output: &Path, lf: bool) -> dlgcsv_core::Result<()> {
    let table = read_table(file, false)?;
    let line_ending = if lf { LineEnding::Lf } else { LineEnding::Crlf };
    write_table(output, &table, line_ending)?;

    println!("Wrote {} rows to {}", table.row_count(), output.display());
    Ok(())
}

fn cmd_check(file: &Path) -> dlgcsv_core::Result<()> {
    let table = read_table(file, true)?;

    let width = table.headers().map(|h| h.len()).unwrap_or(0);
    let short: Vec<usize> = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.len() < width)
        .map(|(i, _)| i + 2)
        .collect();

    println!("{}: {} rows, quoting OK", file.display(), table.row_count());
    if !short.is_empty() {
        println!("{} rows have fewer cells than the header:", short.len());
        for row in &short {
            println!("  row {}", row);
        }
    }

    Ok(())
}

fn cmd_export(roots: &[PathBuf], output: Option<PathBuf>, config: &Path) -> dlgcsv_core::Result<()> {
    let settings = Settings::load(config)?;
    let output = output.unwrap_or_else(|| settings.csv_path(&roots[0]));

    let scan_result = scan_containers(roots)?;
    let containers: Vec<_> = scan_result
        .load_all()?
        .into_iter()
        .map(|(_, container)| container)
        .collect();

    let table = export_table(&containers);
    write_table(&output, &table, settings.line_ending)?;

    info!(output = %output.display(), "export complete");
    println!(
        "Exported {} records from {} containers to {}",
        table.records().len(),
        containers.len(),
        output.display()
    );

    Ok(())
}

fn cmd_import(
    roots: &[PathBuf],
    csv: Option<PathBuf>,
    config: &Path,
    report_path: Option<PathBuf>,
) -> dlgcsv_core::Result<()> {
    let settings = Settings::load(config)?;
    let csv = csv.unwrap_or_else(|| settings.csv_path(&roots[0]));

    let table = read_table(&csv, settings.strict)?;

    let scan_result = scan_containers(roots)?;
    let (paths, mut containers): (Vec<PathBuf>, Vec<_>) =
        scan_result.load_all()?.into_iter().unzip();

    let report = import_table(&table, &mut containers);

    for (path, container) in paths.iter().zip(&containers) {
        container.save(path)?;
    }

    println!("Imported {}", csv.display());
    println!("  {} rows read", report.rows_seen);
    println!("  {} rows matched", report.rows_matched);
    println!("  {} texts written", report.cells_written);
    println!("  {} containers saved", paths.len());

    if !report.skipped_rows.is_empty() {
        println!("\nSkipped rows ({}):", report.skipped_rows.len());
        for skipped in &report.skipped_rows {
            println!("  row {}: {}", skipped.row, skipped.reason);
        }
    }

    if let Some(path) = report_path {
        report.save(&path)?;
        println!("\nReport written to {}", path.display());
    }

    Ok(())
}

fn cmd_init_config(output: &Path) -> dlgcsv_core::Result<()> {
    Settings::default().save(output)?;
    println!("Created settings file: {}", output.display());
    Ok(())
}

/// Print the first `limit` rows, tab-separated, with escapes visible
fn print_rows(table: &Table, limit: usize) {
    for row in table.rows.iter().take(limit) {
        let values: Vec<String> = row.iter().map(|c| c.escape_debug().to_string()).collect();
        println!("{}", values.join("\t"));
    }

    if table.row_count() > limit {
        println!("... ({} more rows)", table.row_count() - limit);
    }
}
