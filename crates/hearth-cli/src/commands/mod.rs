//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open CSV files, load weights, output format)
//! - `reports` - Ledger report commands (families, members, categories)
//! - `score` - Scoring commands (records CSV, transaction ledger)
//! - `weights` - Weight inspection commands

pub mod core;
pub mod reports;
pub mod score;
pub mod weights;

// Re-export command functions for main.rs
pub use self::core::*;
pub use reports::*;
pub use score::*;
pub use weights::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
