//! Scoring weights
//!
//! A weight set maps each of the six metrics to its contribution factor in
//! the final score. Weights are applied as given: they are never
//! renormalized, so a set that does not sum to 1.0 produces final scores
//! outside [0, 100]. Use [`ScoringWeights::total`] to inspect the sum.
//!
//! ## Configuration Resolution
//!
//! Weights are loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/hearth/config/weights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/weights.toml");

/// The six metrics that make up a family's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SavingsToIncome,
    ExpensesToIncome,
    LoanToIncome,
    CreditCardUsage,
    DiscretionarySpending,
    GoalsMet,
}

impl Metric {
    /// Get the config key for this metric
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SavingsToIncome => "savings_to_income",
            Self::ExpensesToIncome => "expenses_to_income",
            Self::LoanToIncome => "loan_to_income",
            Self::CreditCardUsage => "credit_card_usage",
            Self::DiscretionarySpending => "discretionary_spending",
            Self::GoalsMet => "goals_met",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::SavingsToIncome => "Savings-to-Income",
            Self::ExpensesToIncome => "Expenses-to-Income",
            Self::LoanToIncome => "Loan-to-Income",
            Self::CreditCardUsage => "Credit Card Usage",
            Self::DiscretionarySpending => "Discretionary Spending",
            Self::GoalsMet => "Financial Goals",
        }
    }

    /// Whether the sub-score for this metric is clamped to [0, 100]
    pub fn is_clamped(&self) -> bool {
        !matches!(self, Self::SavingsToIncome | Self::GoalsMet)
    }

    /// All metrics, in summation order
    pub fn all() -> &'static [Metric] {
        &[
            Self::SavingsToIncome,
            Self::ExpensesToIncome,
            Self::LoanToIncome,
            Self::CreditCardUsage,
            Self::DiscretionarySpending,
            Self::GoalsMet,
        ]
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "savings_to_income" => Ok(Self::SavingsToIncome),
            "expenses_to_income" => Ok(Self::ExpensesToIncome),
            "loan_to_income" => Ok(Self::LoanToIncome),
            "credit_card_usage" => Ok(Self::CreditCardUsage),
            "discretionary_spending" => Ok(Self::DiscretionarySpending),
            "goals_met" => Ok(Self::GoalsMet),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable, complete weight set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    savings_to_income: f64,
    expenses_to_income: f64,
    loan_to_income: f64,
    credit_card_usage: f64,
    discretionary_spending: f64,
    goals_met: f64,
}

impl Default for ScoringWeights {
    /// Reference weights (sum to 1.20)
    fn default() -> Self {
        Self {
            savings_to_income: 0.35,
            expenses_to_income: 0.25,
            loan_to_income: 0.20,
            credit_card_usage: 0.10,
            discretionary_spending: 0.20,
            goals_met: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Build a weight set from key/weight pairs
    ///
    /// Every metric key is required. Unrecognized keys are logged and
    /// ignored. Weights must be finite and non-negative.
    pub fn from_map<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut found: HashMap<Metric, f64> = HashMap::new();

        for (key, weight) in entries {
            let key = key.as_ref();
            let Ok(metric) = key.parse::<Metric>() else {
                warn!(key, "Ignoring unrecognized scoring weight");
                continue;
            };
            check_weight(metric, weight)?;
            found.insert(metric, weight);
        }

        let missing: Vec<&str> = Metric::all()
            .iter()
            .filter(|m| !found.contains_key(m))
            .map(|m| m.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "Missing scoring weight(s): {}",
                missing.join(", ")
            )));
        }

        let weight = |metric: Metric| found.get(&metric).copied().unwrap_or_default();
        Ok(Self {
            savings_to_income: weight(Metric::SavingsToIncome),
            expenses_to_income: weight(Metric::ExpensesToIncome),
            loan_to_income: weight(Metric::LoanToIncome),
            credit_card_usage: weight(Metric::CreditCardUsage),
            discretionary_spending: weight(Metric::DiscretionarySpending),
            goals_met: weight(Metric::GoalsMet),
        })
    }

    /// Copy of this weight set with one weight replaced
    pub fn with_weight(mut self, metric: Metric, weight: f64) -> Result<Self> {
        check_weight(metric, weight)?;
        match metric {
            Metric::SavingsToIncome => self.savings_to_income = weight,
            Metric::ExpensesToIncome => self.expenses_to_income = weight,
            Metric::LoanToIncome => self.loan_to_income = weight,
            Metric::CreditCardUsage => self.credit_card_usage = weight,
            Metric::DiscretionarySpending => self.discretionary_spending = weight,
            Metric::GoalsMet => self.goals_met = weight,
        }
        Ok(self)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SavingsToIncome => self.savings_to_income,
            Metric::ExpensesToIncome => self.expenses_to_income,
            Metric::LoanToIncome => self.loan_to_income,
            Metric::CreditCardUsage => self.credit_card_usage,
            Metric::DiscretionarySpending => self.discretionary_spending,
            Metric::GoalsMet => self.goals_met,
        }
    }

    /// (metric, weight) pairs in summation order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::all().iter().map(move |&m| (m, self.get(m)))
    }

    /// Raw sum of all weights
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }

    /// Whether the weights sum to 1.0 (within 1e-9)
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() < 1e-9
    }

    /// A copy rescaled to sum to 1.0, or None if every weight is zero
    ///
    /// Scoring never calls this; it exists for callers that explicitly want
    /// a bounded final score.
    pub fn normalized(&self) -> Option<Self> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            savings_to_income: self.savings_to_income / total,
            expenses_to_income: self.expenses_to_income / total,
            loan_to_income: self.loan_to_income / total,
            credit_card_usage: self.credit_card_usage / total,
            discretionary_spending: self.discretionary_spending / total,
            goals_met: self.goals_met / total,
        })
    }

    /// Load weights (explicit path or data-dir override first, then default)
    ///
    /// An explicit path must exist; the data-dir override is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => read_config(path)?,
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => read_config(&default_path)?,
                _ => {
                    debug!("Using embedded default scoring weights");
                    DEFAULT_CONFIG.to_string()
                }
            },
        };

        parse_config(&content)
    }
}

fn check_weight(metric: Metric, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::Configuration(format!(
            "Weight for {} must be a non-negative number, got {}",
            metric, weight
        )));
    }
    Ok(())
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("hearth").join("config").join("weights.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Loading scoring weights from {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!(
            "Failed to read weights file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    weights: Option<HashMap<String, toml::Value>>,
}

/// Parse a weight set from TOML content
pub fn parse_config(content: &str) -> Result<ScoringWeights> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Configuration(format!("Invalid weights TOML: {}", e)))?;

    let table = raw
        .weights
        .ok_or_else(|| Error::Configuration("Missing [weights] table".into()))?;

    let mut entries = Vec::with_capacity(table.len());
    for (key, value) in table {
        let weight = match value {
            toml::Value::Float(f) => f,
            toml::Value::Integer(i) => i as f64,
            other => {
                // Unknown keys only warn, whatever their type
                if key.parse::<Metric>().is_err() {
                    warn!(key = %key, "Ignoring unrecognized scoring weight");
                    continue;
                }
                return Err(Error::Configuration(format!(
                    "Weight for {} must be a number, got {}",
                    key, other
                )));
            }
        };
        entries.push((key, weight));
    }

    ScoringWeights::from_map(entries)
}
