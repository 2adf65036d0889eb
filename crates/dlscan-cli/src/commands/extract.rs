//! Extract command - run field extraction over already-recognized text.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use dlscan_core::LicenseScanner;

use super::scan::{write_output, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file with one recognized line per line, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::config::load(config_path)?;

    let text = if args.input == "-" {
        io::read_to_string(io::stdin())?
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        fs::read_to_string(&path)?
    };

    info!("Extracting fields from {} lines", text.lines().count());

    let result = LicenseScanner::unconfigured()
        .with_extraction_config(config.extraction)
        .extract_from_text(&text);

    write_output(&result, args.format, args.output.as_deref())
}
