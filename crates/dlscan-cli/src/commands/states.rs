//! States command - list supported jurisdictions and their shape rules.

use clap::Args;
use console::style;
use serde::Serialize;

use dlscan_core::license::rules::GENERIC_SHAPE;
use dlscan_core::{supported_jurisdictions, Jurisdiction};

/// Arguments for the states command.
#[derive(Args)]
pub struct StatesArgs {
    /// Jurisdiction code to show (e.g., "CA"); all when omitted
    code: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StateRow {
    code: &'static str,
    name: &'static str,
    pattern: &'static str,
    description: &'static str,
    specific: bool,
}

impl From<Jurisdiction> for StateRow {
    fn from(j: Jurisdiction) -> Self {
        let (shape, specific) = match j.shape() {
            Some(shape) => (shape, true),
            None => (&*GENERIC_SHAPE, false),
        };
        Self {
            code: j.code(),
            name: j.name(),
            pattern: shape.source,
            description: shape.description,
            specific,
        }
    }
}

pub async fn run(args: StatesArgs) -> anyhow::Result<()> {
    let rows: Vec<StateRow> = match &args.code {
        Some(code) => {
            let j: Jurisdiction = code.parse()?;
            vec![j.into()]
        }
        None => supported_jurisdictions().into_iter().map(StateRow::from).collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        let rule = if row.specific {
            style(row.pattern).green()
        } else {
            style(row.pattern).dim()
        };
        println!("{:<4} {:<22} {:<20} {}", row.code, row.name, rule, row.description);
    }

    if args.code.is_none() {
        println!();
        println!(
            "{} {} jurisdictions, {} with a specific rule",
            style("ℹ").blue(),
            rows.len(),
            rows.iter().filter(|r| r.specific).count()
        );
    }

    Ok(())
}
