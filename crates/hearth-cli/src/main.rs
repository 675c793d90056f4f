//! Hearth CLI - Household financial health scoring
//!
//! Usage:
//!   hearth score --file families.csv         Score per-family records
//!   hearth score --transactions ledger.csv   Roll up a ledger, then score
//!   hearth weights                           Show effective weights
//!   hearth report categories --file CSV      Ledger spending reports

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let weights_path = cli.weights.as_deref();

    match cli.command {
        Commands::Score {
            file,
            transactions,
            discretionary,
            format,
            parallel,
        } => {
            let format: commands::OutputFormat = format
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            match (file, transactions) {
                (_, Some(ledger)) => commands::cmd_score_ledger(
                    &ledger,
                    weights_path,
                    &discretionary,
                    format,
                    parallel,
                ),
                (Some(file), None) => {
                    commands::cmd_score_file(&file, weights_path, format, parallel)
                }
                (None, None) => anyhow::bail!("Specify --file or --transactions"),
            }
        }
        Commands::Weights { action } => match action {
            None | Some(WeightsAction::Show) => commands::cmd_weights_show(weights_path),
            Some(WeightsAction::Path) => commands::cmd_weights_path(),
        },
        Commands::Report { report_type } => match report_type {
            ReportType::Families { file } => commands::cmd_report_families(&file),
            ReportType::Members {
                file,
                limit,
                expand,
            } => commands::cmd_report_members(&file, limit, expand),
            ReportType::Categories { file, limit } => {
                commands::cmd_report_categories(&file, limit)
            }
        },
    }
}
