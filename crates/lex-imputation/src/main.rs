//! CLI entry point for missingness profiling and imputation.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_imputation::{
    CategoricalMethod, ColumnAction, ColumnDetail, ImputationEngine, ImputationPolicy,
    ImputationReport, MissingnessMatrix, MissingnessProfiler, MissingnessReport,
    MissingnessVisualizer, MutationMode, ProfileOptions, Table,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Rows drawn by the text heatmap before truncating.
const MAX_HEATMAP_ROWS: usize = 60;

/// CLI-compatible categorical method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalMethod {
    /// Fill with the sentinel string
    Constant,
    /// Draw uniformly from the observed categories
    Random,
}

impl From<CliCategoricalMethod> for CategoricalMethod {
    fn from(cli: CliCategoricalMethod) -> Self {
        match cli {
            CliCategoricalMethod::Constant => CategoricalMethod::Constant,
            CliCategoricalMethod::Random => CategoricalMethod::RandomFromObserved,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Missing data profiler and imputer",
    long_about = "Profiles missing values in a CSV file and fills them while keeping each \
                  column's distribution.\n\n\
                  EXAMPLES:\n  \
                  # Profile and impute, writing the result\n  \
                  lex-imputation -i data.csv -o imputed.csv\n\n  \
                  # Detailed profile only, no heatmap\n  \
                  lex-imputation -i data.csv --long-list-missing --profile-only --no-plot\n\n  \
                  # Reproducible random categorical fill\n  \
                  lex-imputation -i data.csv --method random --seed 42"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Write the imputed table to this CSV file
    #[arg(short, long)]
    output: Option<String>,

    /// Print per-column statistics alongside missing counts
    #[arg(long)]
    long_list_missing: bool,

    /// Do not draw the missingness heatmap
    #[arg(long)]
    no_plot: bool,

    /// Stop after profiling
    #[arg(long)]
    profile_only: bool,

    /// Method for filling categorical columns
    #[arg(long, value_enum, default_value = "constant")]
    method: CliCategoricalMethod,

    /// Sentinel written by the constant method
    #[arg(long, default_value = lex_imputation::config::DEFAULT_SENTINEL)]
    sentinel: String,

    /// Categorical columns with more distinct values than this are skipped
    #[arg(long, default_value = "20")]
    max_cardinality: usize,

    /// Columns whose missing fraction reaches this value are skipped (0.0 - 1.0)
    #[arg(long, default_value = "0.5")]
    max_missing_fraction: f64,

    /// Seed for reproducible imputation
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs and the heatmap; only the JSON report is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Report printed by `--json`.
#[derive(Debug, Serialize)]
struct CliReport<'a> {
    input: &'a str,
    profile: &'a MissingnessReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    imputation: Option<&'a ImputationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a str>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    // Fail on bad flags before reading any data
    let policy = build_policy(&args)?;

    info!("Loading dataset from: {}", args.input);
    let df = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    let mut table = Table::try_from(&df)?;

    let options = ProfileOptions::default()
        .long_list_missing(args.long_list_missing)
        .plot_missing(!args.no_plot && !args.json);
    let profiler = MissingnessProfiler::new(options);
    let mut heatmap = TextHeatmap::new(MAX_HEATMAP_ROWS);
    let profile = profiler.profile_with(&table, Some(&mut heatmap));

    if !args.json {
        print_profile(&profile);
    }

    if args.profile_only {
        if args.json {
            print_json(&CliReport {
                input: &args.input,
                profile: &profile,
                imputation: None,
                output: None,
            })?;
        }
        return Ok(());
    }

    let engine = ImputationEngine::new(policy)?;
    let report = engine
        .impute_seeded(&mut table)
        .inspect_err(|e| {
            if e.is_imputation_failure() {
                error!("Imputation aborted: {}", e);
            }
        })?
        .report;

    if let Some(ref path) = args.output {
        write_csv(&table, path)?;
        info!("Imputed table written to: {}", path);
    }

    if args.json {
        print_json(&CliReport {
            input: &args.input,
            profile: &profile,
            imputation: Some(&report),
            output: args.output.as_deref(),
        })?;
    } else {
        print_imputation(&report);
    }

    Ok(())
}

fn build_policy(args: &Args) -> Result<ImputationPolicy> {
    let mut builder = ImputationPolicy::builder()
        .mutation(MutationMode::InPlace)
        .categorical_method(args.method.into())
        .categorical_sentinel(&args.sentinel)
        .max_categorical_cardinality(args.max_cardinality)
        .max_missing_fraction(args.max_missing_fraction);

    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    Ok(builder.build()?)
}

fn load_csv(path: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Failed to read {}: {}", path, e))
}

fn write_csv(table: &Table, path: &str) -> Result<()> {
    let mut df = table.to_frame()?;
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)?;

    Ok(())
}

fn print_json(report: &CliReport<'_>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

// =============================================================================
// Human-readable output
// =============================================================================
//
// These use `println!` on purpose: the summary is the program's output and
// must show regardless of log level.

fn print_profile(report: &MissingnessReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("MISSING DATA PROFILE");
    println!("{}", "=".repeat(80));
    println!(
        "  Shape:    {} rows x {} columns",
        report.n_rows, report.n_columns
    );
    println!(
        "  Missing:  {} of {} cells ({:.2}%)",
        report.total_missing,
        report.total_cells,
        report.missing_fraction * 100.0
    );

    if report.columns.is_empty() {
        println!("\n  No missing values.");
        return;
    }

    println!();
    println!(
        "  {:<24} {:<12} {:>8} {:>8}",
        "COLUMN", "KIND", "MISSING", "PERCENT"
    );
    println!("  {}", "-".repeat(56));
    for column in &report.columns {
        println!(
            "  {:<24} {:<12} {:>8} {:>7.2}%",
            truncate_str(&column.name, 24),
            column.kind.to_string(),
            column.missing_count,
            column.missing_fraction * 100.0
        );

        match &column.detail {
            Some(ColumnDetail::Numeric {
                max,
                min,
                mean,
                std,
            }) => println!(
                "      max={:.4}  min={:.4}  mean={:.4}  std={:.4}",
                max, min, mean, std
            ),
            Some(ColumnDetail::Categorical {
                mode_value,
                mode_count,
            }) => println!(
                "      mode='{}' ({} occurrences)",
                truncate_str(mode_value, 40),
                mode_count
            ),
            None => {}
        }
    }
}

fn print_imputation(report: &ImputationReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("IMPUTATION");
    println!("{}", "=".repeat(80));

    if report.is_no_op() {
        println!("  Nothing to impute.");
        return;
    }

    for column in &report.columns {
        let status = match &column.action {
            ColumnAction::Imputed { cells, method } => {
                format!("{} cells ({})", cells, method)
            }
            ColumnAction::Skipped(reason) => reason.to_string(),
            ColumnAction::Complete => continue,
        };
        println!("  {:<24} {}", truncate_str(&column.name, 24), status);

        if column.type_mismatches > 0 {
            println!(
                "      {} cells left untouched (type mismatch)",
                column.type_mismatches
            );
        }
    }

    println!();
    println!(
        "  Filled {} of {} missing cells; {} remain",
        report.cells_imputed, report.missing_before, report.missing_after
    );
    println!("{}", "=".repeat(80));

    if report.missing_after > 0 {
        warn!(
            "{} missing values remain in skipped columns",
            report.missing_after
        );
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// =============================================================================
// Text heatmap
// =============================================================================

/// Draws the missingness matrix as text: `#` for missing, `.` for present,
/// one line per row and one character per column.
struct TextHeatmap {
    max_rows: usize,
}

impl TextHeatmap {
    fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl MissingnessVisualizer for TextHeatmap {
    fn render(&mut self, matrix: &MissingnessMatrix, title: &str) {
        debug!(
            "Rendering {}x{} missingness matrix",
            matrix.n_rows(),
            matrix.n_columns()
        );

        println!();
        println!("{}", title);
        println!("{}", "-".repeat(title.len()));

        for (idx, name) in matrix.column_names().iter().enumerate() {
            println!("  [{:>3}] {}", idx, name);
        }
        println!();

        let shown = matrix.n_rows().min(self.max_rows);
        for row in 0..shown {
            let line: String = matrix
                .row(row)
                .iter()
                .map(|&missing| if missing { '#' } else { '.' })
                .collect();
            println!("  {:>6} {}", row, line);
        }

        if matrix.n_rows() > shown {
            println!("  ... {} more rows", matrix.n_rows() - shown);
        }
    }
}
