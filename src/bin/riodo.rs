//! Riodo CLI - command-line front end for Riodoraku analytics
//!
//! Commands:
//! - metrics: compute per-date metrics and print a table or JSON
//! - export: write the metrics report as csv/xlsx/pdf/json
//! - chart: render a bar or trend chart to an SVG file
//! - validate: check measurement files and report per-file status

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use riodoraku::export::{self, ReportRow};
use riodoraku::loader::{self, parse_date};
use riodoraku::render;
use riodoraku::{
    discover_csv_files, load_many, AnalysisError, Analyzer, Dataset, Metric, PointCode,
    RecommendationMode,
};

/// Riodo - compute engine for Riodoraku electrodermal measurements
#[derive(Parser)]
#[command(name = "riodo")]
#[command(version)]
#[command(about = "Analyze Riodoraku measurement CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-date metrics and print them
    Metrics {
        #[command(flatten)]
        input: InputArgs,

        /// Restrict output to one observation date
        #[arg(long)]
        date: Option<String>,

        /// Recommendation mode for extreme points
        #[arg(long, value_enum, default_value_t = RecMode::Simple)]
        mode: RecMode,

        /// Print the full JSON report payload
        #[arg(long)]
        json: bool,
    },

    /// Write the metrics report to a file
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Restrict the report to one observation date
        #[arg(long)]
        date: Option<String>,

        /// Recommendation mode for extreme points
        #[arg(long, value_enum, default_value_t = RecMode::Simple)]
        mode: RecMode,

        /// Report format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a chart to an SVG file
    Chart {
        #[command(flatten)]
        input: InputArgs,

        /// Observation date for the bar chart (defaults to the latest)
        #[arg(long)]
        date: Option<String>,

        /// Render the trend of one point code (e.g. H1L) instead
        #[arg(long, conflicts_with = "metric")]
        point: Option<String>,

        /// Render the trend of one numeric metric (e.g. MeanAll) instead
        #[arg(long)]
        metric: Option<String>,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate measurement files and report per-file status
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output the validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Measurement CSV files
    files: Vec<PathBuf>,

    /// Directory scanned for *.csv when no files are given
    #[arg(long, default_value = "data/measurements")]
    data_dir: PathBuf,
}

impl InputArgs {
    fn resolve(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            discover_csv_files(&self.data_dir)
        } else {
            self.files.clone()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RecMode {
    /// Report the corrective action only
    Simple,
    /// Attach the five-element therapeutic point
    FiveElements,
}

impl From<RecMode> for RecommendationMode {
    fn from(mode: RecMode) -> Self {
        match mode {
            RecMode::Simple => RecommendationMode::Simple,
            RecMode::FiveElements => RecommendationMode::FiveElements,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let report = CliError::from(error);
            eprintln!(
                "{}",
                serde_json::to_string(&report)
                    .unwrap_or_else(|_| "{\"code\":\"UNKNOWN\"}".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RiodoCliError> {
    match cli.command {
        Commands::Metrics {
            input,
            date,
            mode,
            json,
        } => cmd_metrics(&input, date.as_deref(), mode.into(), json),
        Commands::Export {
            input,
            date,
            mode,
            format,
            output,
        } => cmd_export(&input, date.as_deref(), mode.into(), format, &output),
        Commands::Chart {
            input,
            date,
            point,
            metric,
            output,
        } => cmd_chart(
            &input,
            date.as_deref(),
            point.as_deref(),
            metric.as_deref(),
            &output,
        ),
        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn load_dataset(input: &InputArgs) -> Result<Dataset, RiodoCliError> {
    let paths = input.resolve();
    if paths.is_empty() {
        return Err(RiodoCliError::NoFiles);
    }
    let dataset = load_many(&paths);
    if dataset.is_empty() {
        return Err(RiodoCliError::Analysis(AnalysisError::EmptyDataset));
    }
    Ok(dataset)
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, RiodoCliError> {
    parse_date(value).ok_or_else(|| RiodoCliError::BadDate(value.to_string()))
}

fn filtered_rows(
    analyzer: &Analyzer,
    dataset: &Dataset,
    date: Option<&str>,
) -> Result<Vec<ReportRow>, RiodoCliError> {
    let rows = export::report_rows(analyzer, dataset);
    match date {
        None => Ok(rows),
        Some(value) => {
            let wanted = parse_date_arg(value)?;
            let rows: Vec<ReportRow> = rows.into_iter().filter(|row| row.date == wanted).collect();
            if rows.is_empty() {
                return Err(RiodoCliError::Analysis(AnalysisError::NoSuchDate(wanted)));
            }
            Ok(rows)
        }
    }
}

fn cmd_metrics(
    input: &InputArgs,
    date: Option<&str>,
    mode: RecommendationMode,
    json: bool,
) -> Result<(), RiodoCliError> {
    let dataset = load_dataset(input)?;
    let analyzer = Analyzer::new(mode);
    let rows = filtered_rows(&analyzer, &dataset, date)?;

    if json {
        println!("{}", export::write_json(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("Date: {}", row.date_string());
        for (name, value) in &row.values {
            println!("  {name:<18} {}", value.render());
        }
        println!();
    }
    Ok(())
}

fn cmd_export(
    input: &InputArgs,
    date: Option<&str>,
    mode: RecommendationMode,
    format: ExportFormat,
    output: &PathBuf,
) -> Result<(), RiodoCliError> {
    let dataset = load_dataset(input)?;
    let analyzer = Analyzer::new(mode);
    let rows = filtered_rows(&analyzer, &dataset, date)?;

    let bytes = match format {
        ExportFormat::Csv => export::write_csv(&rows)?,
        ExportFormat::Xlsx => export::write_xlsx(&rows)?,
        ExportFormat::Pdf => export::write_pdf(&rows)?,
        ExportFormat::Json => export::write_json(&rows)?.into_bytes(),
    };
    fs::write(output, bytes)?;
    tracing::info!(path = %output.display(), rows = rows.len(), "report written");
    Ok(())
}

fn cmd_chart(
    input: &InputArgs,
    date: Option<&str>,
    point: Option<&str>,
    metric: Option<&str>,
    output: &PathBuf,
) -> Result<(), RiodoCliError> {
    let dataset = load_dataset(input)?;
    let analyzer = Analyzer::default();

    if let Some(code) = point {
        let code = PointCode::from_str(code).map_err(RiodoCliError::Analysis)?;
        let series = analyzer.point_series(&dataset, code);
        render::render_series_chart(&series, &code.to_string(), output)?;
        return Ok(());
    }

    if let Some(name) = metric {
        let metric = Metric::from_str(name).map_err(RiodoCliError::Analysis)?;
        let series = analyzer.metric_series(&dataset, metric);
        render::render_series_chart(&series, metric.as_str(), output)?;
        return Ok(());
    }

    let observation = match date {
        Some(value) => {
            let wanted = parse_date_arg(value)?;
            dataset
                .observation_for_date(wanted)
                .ok_or(RiodoCliError::Analysis(AnalysisError::NoSuchDate(wanted)))?
        }
        None => dataset
            .latest()
            .ok_or(RiodoCliError::Analysis(AnalysisError::EmptyDataset))?,
    };
    let corridor = analyzer.row_metrics(observation).corridor;
    render::render_bar_chart(observation, corridor.as_ref(), output)?;
    Ok(())
}

fn cmd_validate(input: &InputArgs, json: bool) -> Result<(), RiodoCliError> {
    let paths = input.resolve();
    if paths.is_empty() {
        return Err(RiodoCliError::NoFiles);
    }

    let mut checks: Vec<FileCheck> = Vec::new();
    for path in &paths {
        match loader::load_file(path) {
            Ok(rows) => checks.push(FileCheck {
                file: path.display().to_string(),
                ok: true,
                rows: rows.len(),
                error: None,
            }),
            Err(error) => checks.push(FileCheck {
                file: path.display().to_string(),
                ok: false,
                rows: 0,
                error: Some(error.to_string()),
            }),
        }
    }

    let failed = checks.iter().filter(|check| !check.ok).count();
    let report = ValidationReport {
        total_files: checks.len(),
        valid_files: checks.len() - failed,
        invalid_files: failed,
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total files:   {}", report.total_files);
        println!("Valid files:   {}", report.valid_files);
        println!("Invalid files: {}", report.invalid_files);
        println!();
        for check in &report.checks {
            if check.ok {
                println!("  [OK]   {} ({} rows)", check.file, check.rows);
            } else {
                println!(
                    "  [SKIP] {}: {}",
                    check.file,
                    check.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    if failed > 0 {
        Err(RiodoCliError::ValidationFailed(failed))
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum RiodoCliError {
    Io(std::io::Error),
    Analysis(AnalysisError),
    Json(serde_json::Error),
    BadDate(String),
    NoFiles,
    ValidationFailed(usize),
}

impl From<std::io::Error> for RiodoCliError {
    fn from(error: std::io::Error) -> Self {
        RiodoCliError::Io(error)
    }
}

impl From<AnalysisError> for RiodoCliError {
    fn from(error: AnalysisError) -> Self {
        RiodoCliError::Analysis(error)
    }
}

impl From<serde_json::Error> for RiodoCliError {
    fn from(error: serde_json::Error) -> Self {
        RiodoCliError::Json(error)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RiodoCliError> for CliError {
    fn from(error: RiodoCliError) -> Self {
        match error {
            RiodoCliError::Io(error) => CliError {
                code: "IO_ERROR".to_string(),
                message: error.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RiodoCliError::Analysis(error) => CliError {
                code: "ANALYSIS_ERROR".to_string(),
                message: error.to_string(),
                hint: Some("Run 'riodo validate' to inspect input files".to_string()),
            },
            RiodoCliError::Json(error) => CliError {
                code: "JSON_ERROR".to_string(),
                message: error.to_string(),
                hint: None,
            },
            RiodoCliError::BadDate(value) => CliError {
                code: "BAD_DATE".to_string(),
                message: format!("Unreadable date argument: {value}"),
                hint: Some("Use YYYY-MM-DD or DD-MM-YYYY".to_string()),
            },
            RiodoCliError::NoFiles => CliError {
                code: "NO_FILES".to_string(),
                message: "No measurement files found".to_string(),
                hint: Some("Pass file paths or --data-dir with CSV files".to_string()),
            },
            RiodoCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{count} files failed validation"),
                hint: Some("Fix or remove the failing files and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_files: usize,
    valid_files: usize,
    invalid_files: usize,
    checks: Vec<FileCheck>,
}

#[derive(serde::Serialize)]
struct FileCheck {
    file: String,
    ok: bool,
    rows: usize,
    error: Option<String>,
}
