//! CLI entry point for the report pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use lex_report::{ArtifactNames, Pipeline, PipelineOutput, ReportConfig, SourceInfo};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Tabular data cleaning and report pipeline",
    long_about = "Cleans a CSV file and produces analytics, a narrative summary and \
                  renderer-ready workbook/document specifications.\n\n\
                  EXAMPLES:\n  \
                  # Basic usage\n  \
                  lex-report -i data.csv\n\n  \
                  # Frequency over another column\n  \
                  lex-report -i data.csv --category-column region --category-label Region\n\n  \
                  # Everything as JSON on stdout\n  \
                  lex-report -i data.csv --json"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// JSON file holding a report configuration
    ///
    /// Command line flags override values from this file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column whose value frequencies are reported (default: COUNTRY)
    #[arg(long)]
    category_column: Option<String>,

    /// Header for the category label column (default: Country)
    #[arg(long)]
    category_label: Option<String>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Do not emit chart descriptors
    #[arg(long)]
    no_charts: bool,

    /// Do not flag null cells in the DATA sheet
    #[arg(long)]
    no_heatmap: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of writing files
    ///
    /// Disables all logs; prints the full pipeline output.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// carries JSON only.
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

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let source = SourceInfo::new(file_name(&args.input));
    let output = match pipeline.process_dataframe(&data, source.clone()) {
        Ok(output) => output,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let names = ArtifactNames::for_source(&source);
    write_outputs(&output, &names, &args.output)?;
    print_human_readable_summary(&output, &names, &args);

    Ok(())
}

/// Merge the optional config file with command line overrides.
fn build_config(args: &Args) -> Result<ReportConfig> {
    let base = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path.display()))?;
            serde_json::from_str::<ReportConfig>(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ReportConfig::default(),
    };

    let config = ReportConfig::builder()
        .category_column(args.category_column.clone().unwrap_or(base.category_column))
        .category_label(args.category_label.clone().unwrap_or(base.category_label))
        .title(args.title.clone().unwrap_or(base.title))
        .attribution(base.attribution)
        .quality_thresholds(base.quality_thresholds.pass, base.quality_thresholds.warn)
        .fill_colors(base.fill_colors)
        .heatmap_color(base.heatmap_color)
        .include_charts(base.include_charts && !args.no_charts)
        .include_null_heatmap(base.include_null_heatmap && !args.no_heatmap)
        .build()?;

    Ok(config)
}

/// Write the cleaned CSV and both report payloads into `output_dir`.
fn write_outputs(output: &PipelineOutput, names: &ArtifactNames, output_dir: &str) -> Result<()> {
    let dir = Path::new(output_dir);
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created output directory: {}", output_dir);
    }

    let data_path = dir.join(&names.cleaned_data);
    let mut df = output.cleaned.to_dataframe()?;
    let mut file = File::create(&data_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;
    info!("Cleaned data saved: {}", data_path.display());

    let workbook_path = dir.join(format!("{}.json", names.workbook));
    std::fs::write(&workbook_path, serde_json::to_string_pretty(&output.workbook)?)?;
    info!("Workbook specification saved: {}", workbook_path.display());

    let document_path = dir.join(format!("{}.json", names.document));
    std::fs::write(&document_path, serde_json::to_string_pretty(&output.document)?)?;
    info!("Document specification saved: {}", document_path.display());

    Ok(())
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(output: &PipelineOutput, names: &ArtifactNames, args: &Args) {
    let metrics = &output.metrics;
    let cleaning = &output.cleaning_report;

    println!();
    println!("{}", "=".repeat(80));
    println!("REPORT COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, output.original_shape.0, output.original_shape.1
    );
    println!(
        "Output: {}/{} ({} rows x {} columns)",
        args.output, names.cleaned_data, metrics.row_count, metrics.column_count
    );
    println!("Workbook spec: {}/{}.json", args.output, names.workbook);
    println!("Document spec: {}/{}.json", args.output, names.document);
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", output.duration_ms);
    println!("  Empty rows removed: {}", cleaning.empty_rows_removed);
    println!("  Duplicate rows removed: {}", cleaning.duplicate_rows_removed);
    if cleaning.removed_columns.is_empty() {
        println!("  Columns removed: none");
    } else {
        println!("  Columns removed: {}", cleaning.removed_columns.join(", "));
    }
    println!("  Total null values: {}", metrics.total_nulls);
    println!("  Data Quality: {:.2}%", metrics.quality_score);
    println!();

    println!("Narrative:");
    for paragraph in &output.narrative.paragraphs {
        println!("  {}", paragraph);
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Load CSV with multiple fallback strategies.
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Every column read as text
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => Ok(df),
        Err(e) => {
            error!("Could not parse {}: {}", path, e);
            Err(e.into())
        }
    }
}
