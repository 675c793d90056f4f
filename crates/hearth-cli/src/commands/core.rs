//! Shared command utilities
//!
//! This module contains:
//! - `open_csv` - Open an input CSV with a readable error
//! - `load_weights` - Resolve the effective scoring weights
//! - `OutputFormat` - Table or JSON output

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use hearth_core::ScoringWeights;

/// Output format for score results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}. Available: table, json", s)),
        }
    }
}

pub fn open_csv(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))
}

/// Load weights from an explicit path, the override file, or the defaults
pub fn load_weights(path: Option<&Path>) -> Result<ScoringWeights> {
    ScoringWeights::load(path).context("Failed to load scoring weights")
}
