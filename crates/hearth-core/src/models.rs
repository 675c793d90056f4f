//! Domain models for Hearth

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::weights::Metric;

/// Per-family figures as read from a source, before validation
///
/// Absent or non-numeric cells are `None`; validation turns the first one
/// into a missing-field error for that family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFamilyRecord {
    pub family_id: String,
    pub income: Option<f64>,
    pub savings: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub loan_payments: Option<f64>,
    pub credit_card_spending: Option<f64>,
    /// Travel/entertainment spending for the period
    pub discretionary_spending: Option<f64>,
    pub financial_goals_met_pct: Option<f64>,
}

/// Validated per-family figures for one scoring period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyFinancialRecord {
    pub family_id: String,
    /// Always > 0 once validated
    pub income: f64,
    pub savings: f64,
    pub monthly_expenses: f64,
    pub loan_payments: f64,
    pub credit_card_spending: f64,
    pub discretionary_spending: f64,
    /// Percentage of financial goals achieved; the range is not enforced
    pub financial_goals_met_pct: f64,
}

impl From<FamilyFinancialRecord> for RawFamilyRecord {
    fn from(record: FamilyFinancialRecord) -> Self {
        Self {
            family_id: record.family_id,
            income: Some(record.income),
            savings: Some(record.savings),
            monthly_expenses: Some(record.monthly_expenses),
            loan_payments: Some(record.loan_payments),
            credit_card_spending: Some(record.credit_card_spending),
            discretionary_spending: Some(record.discretionary_spending),
            financial_goals_met_pct: Some(record.financial_goals_met_pct),
        }
    }
}

/// The six normalized components of a family's score
///
/// `savings_to_income` and `goals_met` are left unclamped; the other four
/// always lie in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub savings_to_income: f64,
    pub expenses_to_income: f64,
    pub loan_to_income: f64,
    pub credit_card_usage: f64,
    pub discretionary_spending: f64,
    pub goals_met: f64,
}

impl SubScores {
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
}

/// Scoring result for one family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyScore {
    pub family_id: String,
    pub sub_scores: SubScores,
    /// Weighted sum of the sub-scores, not clamped
    pub final_score: f64,
}

/// Why a family record could not be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingField,
    InvalidInput,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A family that was left out of a score report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub family_id: String,
    pub kind: FailureKind,
    pub message: String,
}

impl RecordFailure {
    pub fn from_error(family_id: impl Into<String>, error: &Error) -> Self {
        let kind = match error {
            Error::MissingField { .. } => FailureKind::MissingField,
            _ => FailureKind::InvalidInput,
        };
        Self {
            family_id: family_id.into(),
            kind,
            message: error.to_string(),
        }
    }
}

/// Output of one scoring pass over a batch of families
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    /// Scores keyed by family id
    pub scores: BTreeMap<String, FamilyScore>,
    /// Families that were rejected, in input order
    pub failures: Vec<RecordFailure>,
    /// Raw sum of the weights used; the final score range is only [0, 100]
    /// when this is 1.0
    pub weight_total: f64,
}

impl ScoringReport {
    pub fn get(&self, family_id: &str) -> Option<&FamilyScore> {
        self.scores.get(family_id)
    }

    pub fn scored_count(&self) -> usize {
        self.scores.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Pretty-printed JSON for API responses and dashboards
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Scores ordered from healthiest to least healthy (ties by family id)
    pub fn ranked(&self) -> Vec<&FamilyScore> {
        let mut ranked: Vec<&FamilyScore> = self.scores.values().collect();
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.family_id.cmp(&b.family_id))
        });
        ranked
    }
}

/// One row of a household transaction ledger
///
/// The per-family columns (income, savings, ...) repeat on every row of the
/// same family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub family_id: String,
    pub member_id: String,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub income: f64,
    pub savings: f64,
    pub monthly_expenses: f64,
    pub loan_payments: f64,
    pub credit_card_spending: f64,
    pub dependents: Option<u32>,
    pub financial_goals_met_pct: f64,
}

/// Ledger totals for one family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRollup {
    pub family_id: String,
    pub mean_income: f64,
    pub mean_savings: f64,
    pub total_spending: f64,
    pub transaction_count: usize,
    /// Total spending as a percentage of mean income (None when income <= 0)
    pub spending_pct_income: Option<f64>,
}

/// Total spending of one member in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCategorySpending {
    pub member_id: String,
    pub category: String,
    pub amount: f64,
    pub transaction_count: usize,
}

/// A named spending total (a member or a category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingTotal {
    pub name: String,
    pub amount: f64,
    pub transaction_count: usize,
}
