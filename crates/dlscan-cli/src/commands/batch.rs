//! Batch scanning command for multiple license images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use dlscan_core::{ExtractionResult, LicenseScanner};

use super::scan::{csv_record, format_result, OutputFormat, CSV_HEADER};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of scanning a single file.
struct FileResult {
    path: PathBuf,
    result: ExtractionResult,
    processing_time_ms: u64,
}

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp", "b64"];

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::config::load(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| IMAGE_EXTENSIONS.contains(&extension(p).as_str()))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to scan",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let scanner = LicenseScanner::from_config(&config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = scan_file(&scanner, &path)?;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        if !result.success {
            let message = result.error.as_deref().unwrap_or("unknown error");
            if args.continue_on_error {
                warn!("Failed to scan {}: {}", path.display(), message);
            } else {
                error!("Failed to scan {}: {}", path.display(), message);
                pb.abandon();
                anyhow::bail!("Scan failed for {}: {}", path.display(), message);
            }
        }

        if let Some(output_dir) = &args.output_dir {
            let output_name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("license");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_result(&result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }

        results.push(FileResult {
            path,
            result,
            processing_time_ms,
        });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&FileResult> = results.iter().filter(|r| !r.result.success).collect();

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            println!(
                "  - {}: {}",
                file.path.display(),
                file.result.error.as_deref().unwrap_or("unknown error")
            );
        }
        anyhow::bail!("{} of {} scans failed", failed.len(), results.len());
    }

    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn scan_file(scanner: &LicenseScanner, path: &Path) -> anyhow::Result<ExtractionResult> {
    if extension(path) == "b64" {
        let payload = fs::read_to_string(path)?;
        Ok(scanner.scan_base64(&payload))
    } else {
        let data = fs::read(path)?;
        Ok(scanner.scan_bytes(&data))
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let scanned_at = Local::now().to_rfc3339();

    let mut header = vec!["filename"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "scanned_at"]);
    wtr.write_record(&header)?;

    for file in results {
        let filename = file
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        record.extend(csv_record(&file.result));
        record.push(file.processing_time_ms.to_string());
        record.push(scanned_at.clone());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
