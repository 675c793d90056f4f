//! Hearth Core Library
//!
//! Household financial health scoring:
//! - Metric normalization of raw per-family figures into sub-scores
//! - Weighted aggregation into a final score, sequential or parallel
//! - Scoring weights with embedded defaults and a TOML override
//! - CSV import for family records and transaction ledgers
//! - Ledger rollups (family totals, member/category spending)

pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod rollup;
pub mod scoring;
pub mod weights;

pub use error::{Error, Result};
pub use models::{
    FailureKind, FamilyFinancialRecord, FamilyRollup, FamilyScore, MemberCategorySpending,
    RawFamilyRecord, RecordFailure, ScoringReport, SpendingTotal, SubScores, Transaction,
};
pub use scoring::{final_score, ScoringEngine};
pub use weights::{Metric, ScoringWeights};
