//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hearth - Household financial health scoring
#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Score household financial health from income, spending and savings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Scoring weights file (TOML)
    ///
    /// Defaults to ~/.local/share/hearth/config/weights.toml when present,
    /// otherwise the built-in reference weights.
    #[arg(long, global = true)]
    pub weights: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score families from a records CSV or a transaction ledger
    Score {
        /// CSV of per-family records
        #[arg(short, long, required_unless_present = "transactions")]
        file: Option<PathBuf>,

        /// Transaction ledger CSV, rolled up per family before scoring
        #[arg(short, long, conflicts_with = "file")]
        transactions: Option<PathBuf>,

        /// Categories counted as discretionary spending (comma-separated, ledger only)
        #[arg(long, value_delimiter = ',', default_values = ["Travel", "Entertainment"])]
        discretionary: Vec<String>,

        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,

        /// Score families on all available cores
        #[arg(long)]
        parallel: bool,
    },

    /// Show the effective scoring weights
    Weights {
        #[command(subcommand)]
        action: Option<WeightsAction>,
    },

    /// Generate spending reports from a transaction ledger
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },
}

#[derive(Subcommand)]
pub enum WeightsAction {
    /// Show the effective weights and their total (default)
    Show,

    /// Show the weights override file location
    Path,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Per-family spending as a share of income
    Families {
        /// Transaction ledger CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Top spending members
    Members {
        /// Transaction ledger CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Number of members to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Break each member's spending down by category
        #[arg(long)]
        expand: bool,
    },

    /// Top spending categories
    Categories {
        /// Transaction ledger CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Number of categories to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}
