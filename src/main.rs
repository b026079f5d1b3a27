//! CLI entry point for the data quality assessment engine.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use indexmap::IndexMap;
use quality_engine::{AnalysisOptions, Dataset, QualityEngine, QualityReport};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data Quality Assessment Engine",
    long_about = "Analyzes a tabular dataset and produces a structured quality report:\n\
                  column profiles, quality metrics, duplicate/PII/bias findings and an\n\
                  overall health score.\n\n\
                  EXAMPLES:\n  \
                  # Analyze a JSON array of row objects\n  \
                  quality-engine -i data.json\n\n  \
                  # Validate against an expected schema\n  \
                  quality-engine -i data.json --schema schema.json\n\n  \
                  # Include bias detection, write the report to a file\n  \
                  quality-engine -i data.json --bias -o report.json\n\n  \
                  # Machine-readable output for piping\n  \
                  quality-engine -i data.json --json | jq .healthScore"
)]
struct Args {
    /// Path to the dataset: a JSON array of flat row objects
    #[arg(short, long)]
    input: PathBuf,

    /// Path to a schema file: a JSON object mapping column names to
    /// expected types (STRING, INTEGER, FLOAT, BOOLEAN, DATE)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Write the JSON report to this file instead of printing a summary
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip PII detection
    #[arg(long)]
    no_pii: bool,

    /// Run bias detection on sensitive attributes
    #[arg(long)]
    bias: bool,

    /// Output the full JSON report to stdout (disables all logging)
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
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

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    info!("Loading dataset from: {}", args.input.display());
    let dataset = load_dataset(&args.input)?;
    info!(
        "Dataset loaded successfully: {} rows x {} columns",
        dataset.row_count(),
        dataset.column_names().len()
    );

    let mut options = AnalysisOptions::default()
        .with_pii_check(!args.no_pii)
        .with_bias_check(args.bias);

    if let Some(ref schema_path) = args.schema {
        options = options.with_schema(load_schema(schema_path)?);
    }

    let engine = QualityEngine::new();
    let report = engine
        .analyze(&dataset, &options)
        .context("Analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(ref output) = args.output {
        std::fs::write(output, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        info!("Report written to: {}", output.display());
    }

    print_summary(&report);

    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid dataset JSON in {}", path.display()))
}

fn load_schema(path: &Path) -> Result<IndexMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read schema file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid schema JSON in {}", path.display()))
}

/// Print a human-readable summary of the quality report.
///
/// Uses `println!` intentionally for user-facing CLI output; unlike
/// logging, this is the primary result and must stay visible regardless
/// of log level.
fn print_summary(report: &QualityReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Dataset: {} rows x {} columns",
        report.summary.row_count, report.summary.column_count
    );
    println!(
        "Health Score: {:.2}/100 ({})",
        report.health_score, report.quality_level
    );
    println!();

    let metrics = &report.quality_metrics;
    println!("Quality Dimensions:");
    println!("  Completeness: {:>6.2}", metrics.completeness_score);
    println!("  Uniqueness:   {:>6.2}", metrics.uniqueness_score);
    println!("  Validity:     {:>6.2}", metrics.validity_score);
    println!("  Consistency:  {:>6.2}", metrics.consistency_score);
    println!("  Accuracy:     {:>6.2}", metrics.accuracy_score);
    println!("  Timeliness:   {:>6.2}", metrics.timeliness_score);
    if let Some(bias_score) = metrics.bias_score {
        println!("  Bias:         {bias_score:>6.2}");
    }
    println!();

    if !report.issues.is_empty() {
        println!("Issues ({}):", report.issues.len());
        for issue in report.issues.iter().take(10) {
            let column = issue
                .column_name
                .as_deref()
                .map(|name| format!(" [{name}]"))
                .unwrap_or_default();
            println!("  - {:?}{}: {}", issue.severity, column, issue.description);
        }
        if report.issues.len() > 10 {
            println!("  ... and {} more issues", report.issues.len() - 10);
        }
        println!();
    }

    println!("Recommendations:");
    for recommendation in &report.recommendations {
        println!("  - {recommendation}");
    }
    println!();

    if let Some(ref pii) = report.pii_findings {
        if pii.pii_detected {
            println!("PII Findings ({} column(s)):", pii.total_pii_columns);
            for (column, categories) in &pii.pii_by_column {
                println!("  - {}: {}", column, categories.join(", "));
            }
            println!();
        }
    }

    println!("Processing time: {}ms", report.processing_time_ms);
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
