//! Scan command - extract license fields from a single image.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use dlscan_core::{ExtractionResult, LicenseScanner};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input file as a base64-encoded image payload
    #[arg(long)]
    base64: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show extraction confidence score
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading OCR engine...");
    let scanner = LicenseScanner::from_config(&config);

    pb.set_message("Scanning license...");
    let result = if args.base64 {
        let payload = fs::read_to_string(&args.input)?;
        scanner.scan_base64(&payload)
    } else {
        let data = fs::read(&args.input)?;
        scanner.scan_bytes(&data)
    };

    pb.finish_and_clear();

    write_output(&result, args.format, args.output.as_deref())?;

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence_score * 100.0
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if !result.success {
        anyhow::bail!(
            "Scan failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

/// Format a result and write it to a file or stdout.
pub fn write_output(
    result: &ExtractionResult,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let content = format_result(result, format)?;

    if let Some(output_path) = output {
        fs::write(output_path, &content)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", content);
    }

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(result)?)),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

pub const CSV_HEADER: [&str; 8] = [
    "state",
    "license_number",
    "first_name",
    "last_name",
    "date_of_birth",
    "confidence",
    "success",
    "error",
];

pub fn csv_record(result: &ExtractionResult) -> [String; 8] {
    [
        result.state.map(|j| j.code().to_string()).unwrap_or_default(),
        result.license_number.clone().unwrap_or_default(),
        result.first_name.clone().unwrap_or_default(),
        result.last_name.clone().unwrap_or_default(),
        result.date_of_birth.clone().unwrap_or_default(),
        format!("{:.2}", result.confidence_score),
        result.success.to_string(),
        result.error.clone().unwrap_or_default(),
    ]
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_record(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    if !result.success {
        output.push_str(&format!(
            "Scan failed: {}\n",
            result.error.as_deref().unwrap_or("unknown error")
        ));
        return output;
    }

    let field = |value: Option<&str>| value.unwrap_or("-").to_string();

    output.push_str(&format!(
        "State:          {}\n",
        field(result.state.map(|j| j.code()))
    ));
    output.push_str(&format!(
        "License number: {}\n",
        field(result.license_number.as_deref())
    ));
    output.push_str(&format!(
        "First name:     {}\n",
        field(result.first_name.as_deref())
    ));
    output.push_str(&format!(
        "Last name:      {}\n",
        field(result.last_name.as_deref())
    ));
    output.push_str(&format!(
        "Date of birth:  {}\n",
        field(result.date_of_birth.as_deref())
    ));
    output.push_str(&format!(
        "Confidence:     {:.0}%\n",
        result.confidence_score * 100.0
    ));

    output
}
