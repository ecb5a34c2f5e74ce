//! CLI entry point for the accelerometer conditioning pipeline.

use accel_processing::{
    ConditioningConfig, Pipeline, PipelineResult, ProcessingSummary, ScalingPolicy, describe_table,
    load_csv,
};
use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// CLI-compatible scaling policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliScaling {
    /// One shared min/max across all three axes
    Joint,
    /// Independent min/max per axis
    PerAxis,
}

impl From<CliScaling> for ScalingPolicy {
    fn from(cli: CliScaling) -> Self {
        match cli {
            CliScaling::Joint => ScalingPolicy::Joint,
            CliScaling::PerAxis => ScalingPolicy::PerAxis,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Accelerometer signal conditioning pipeline",
    long_about = "Drops incomplete rows, low-pass filters Accel_X/Y/Z with a zero-phase \
                  Butterworth filter, scales the filtered axes to [0, 1] and appends a \
                  motion_intensity column.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  ACCEL_INPUT     Default input CSV path\n  \
                  ACCEL_OUTPUT    Default output CSV path\n\n\
                  EXAMPLES:\n  \
                  # Default paths\n  \
                  accel-processing\n\n  \
                  # Explicit paths and per-axis scaling\n  \
                  accel-processing -i raw.csv -o processed.csv --scaling per-axis\n\n  \
                  # Inspect the input without processing\n  \
                  accel-processing -i raw.csv --preview"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long, env = "ACCEL_INPUT", default_value = "./data/all_activity_data.csv")]
    input: PathBuf,

    /// Path of the CSV file to write
    #[arg(
        short,
        long,
        env = "ACCEL_OUTPUT",
        default_value = "./data/processed_all_activity_data.csv"
    )]
    output: PathBuf,

    /// Low-pass cutoff frequency in Hz
    #[arg(long, default_value = "5.0")]
    cutoff: f64,

    /// Sampling rate of the recording in Hz
    #[arg(long, default_value = "50.0")]
    sample_rate: f64,

    /// Butterworth filter order
    #[arg(long, default_value = "4")]
    order: usize,

    /// How min-max ranges are fitted across the filtered axes
    #[arg(long, value_enum, default_value = "joint")]
    scaling: CliScaling,

    /// Print the input's shape, column types and first rows, then exit
    #[arg(long)]
    preview: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON on stdout instead of the text summary
    ///
    /// Disables all logging so stdout only carries JSON.
    #[arg(long)]
    json: bool,

    /// Write the run summary next to the output as <output_stem>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is not initialized at all.
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
    // .env must be loaded before clap reads env-backed defaults
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if args.preview {
        return run_preview(&args.input);
    }

    let config = ConditioningConfig::builder()
        .cutoff_hz(args.cutoff)
        .sample_rate_hz(args.sample_rate)
        .filter_order(args.order)
        .scaling(args.scaling.into())
        .build()?;

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            if !update.stage.is_terminal() {
                info!("[{}] {}", update.stage.display_name(), update.message);
            }
        });
    }
    let pipeline = builder.build()?;

    match pipeline.run(&args.input, &args.output) {
        Ok(result) => handle_output(&result, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::json!({ "error": e }));
            }
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Print an overview of the input table.
///
/// Uses `println!` intentionally: this is the command's primary output and
/// must show regardless of log level.
fn run_preview(input: &Path) -> Result<()> {
    let df = load_csv(input)?;
    let overview = describe_table(&df);

    println!("\n{}", "=".repeat(80));
    println!("PREVIEW: {}", input.display());
    println!("{}\n", "=".repeat(80));
    println!("  Rows: {}", overview.rows);
    println!("  Columns: {}", overview.columns.len());
    println!();

    println!("{:<24} {:<12} {:<10}", "Column", "Type", "Missing");
    println!("{}", "-".repeat(48));
    for column in &overview.columns {
        println!(
            "{:<24} {:<12} {:<10}",
            column.name, column.dtype, column.null_count
        );
    }
    println!();
    println!("{}", df.head(Some(5)));

    Ok(())
}

/// Handle pipeline output based on CLI flags.
fn handle_output(result: &PipelineResult, args: &Args) -> Result<()> {
    let summary = &result.summary;

    if args.emit_report {
        summary.write_report(&args.output)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    print_human_readable_summary(summary);
    Ok(())
}

fn print_human_readable_summary(summary: &ProcessingSummary) {
    println!();
    println!("{}", "=".repeat(80));
    println!("CONDITIONING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    if let Some(ref input) = summary.input_file {
        println!("Input:  {} ({} rows)", input, summary.cleaning.rows_before);
    }
    if let Some(ref output) = summary.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output,
            summary.rows_written,
            summary.output_columns.len()
        );
    }
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} with missing values dropped)",
        summary.cleaning.rows_before, summary.cleaning.rows_after, summary.cleaning.rows_dropped
    );
    println!(
        "  Filter: Butterworth order {}, {} Hz cutoff at {} Hz",
        summary.filter.order, summary.filter.cutoff_hz, summary.filter.sample_rate_hz
    );
    println!("  Scaling: {:?}", summary.scaling_policy);
    for (column, range) in summary
        .output_columns
        .iter()
        .filter(|c| c.ends_with("_filtered"))
        .zip(&summary.scaler.ranges)
    {
        println!("    {}: [{:.6}, {:.6}]", column, range.min, range.max);
    }
    println!();

    if !summary.cleaning.missing_per_column.is_empty() {
        println!("Missing values:");
        for (column, count) in &summary.cleaning.missing_per_column {
            println!("  - {}: {}", column, count);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the summary as JSON");
    println!("{}", "=".repeat(80));
}
