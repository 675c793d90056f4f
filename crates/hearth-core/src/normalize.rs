//! Metric normalization
//!
//! Turns raw monetary figures into sub-scores where healthier is higher.
//! Spending-style metrics are scored as `100 - (amount / income * 100)` and
//! clamped to [0, 100], so extreme over-spending floors at zero. The
//! savings ratio is not clamped (savings above income score above 100), and
//! the goals percentage is passed through as supplied.

use crate::error::{Error, Result};
use crate::models::{FamilyFinancialRecord, RawFamilyRecord, SubScores};

fn check_income(income: f64) -> Result<()> {
    if !income.is_finite() || income <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "income must be a positive number, got {}",
            income
        )));
    }
    Ok(())
}

/// `100 - amount as a percentage of income`, clamped to [0, 100]
fn inverse_share_score(amount: f64, income: f64) -> Result<f64> {
    check_income(income)?;
    Ok((100.0 - (amount / income * 100.0)).clamp(0.0, 100.0))
}

/// Savings as a percentage of income (unclamped)
pub fn savings_to_income_score(income: f64, savings: f64) -> Result<f64> {
    check_income(income)?;
    Ok((savings / income) * 100.0)
}

pub fn expenses_to_income_score(income: f64, monthly_expenses: f64) -> Result<f64> {
    inverse_share_score(monthly_expenses, income)
}

pub fn loan_to_income_score(income: f64, loan_payments: f64) -> Result<f64> {
    inverse_share_score(loan_payments, income)
}

pub fn credit_card_usage_score(income: f64, credit_card_spending: f64) -> Result<f64> {
    inverse_share_score(credit_card_spending, income)
}

pub fn discretionary_spending_score(income: f64, discretionary_spending: f64) -> Result<f64> {
    inverse_share_score(discretionary_spending, income)
}

/// Goals-met percentage, used directly
pub fn goals_met_score(financial_goals_met_pct: f64) -> f64 {
    financial_goals_met_pct
}

/// Compute all six sub-scores for a validated record
pub fn normalize(record: &FamilyFinancialRecord) -> Result<SubScores> {
    let income = record.income;
    Ok(SubScores {
        savings_to_income: savings_to_income_score(income, record.savings)?,
        expenses_to_income: expenses_to_income_score(income, record.monthly_expenses)?,
        loan_to_income: loan_to_income_score(income, record.loan_payments)?,
        credit_card_usage: credit_card_usage_score(income, record.credit_card_spending)?,
        discretionary_spending: discretionary_spending_score(
            income,
            record.discretionary_spending,
        )?,
        goals_met: goals_met_score(record.financial_goals_met_pct),
    })
}

/// Validate a raw record
///
/// Fails with `MissingField` for the first absent field and `InvalidInput`
/// for non-positive income, negative amounts or non-finite values.
pub fn validate(raw: &RawFamilyRecord) -> Result<FamilyFinancialRecord> {
    let family_id = raw.family_id.trim();
    if family_id.is_empty() {
        return Err(Error::MissingField {
            family_id: String::new(),
            field: "family_id".into(),
        });
    }

    let require = |field: &str, value: Option<f64>| -> Result<f64> {
        let value = value.ok_or_else(|| Error::MissingField {
            family_id: family_id.to_string(),
            field: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} for family {} is not a finite number",
                field, family_id
            )));
        }
        Ok(value)
    };
    let amount = |field: &str, value: Option<f64>| -> Result<f64> {
        let value = require(field, value)?;
        if value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} for family {} must not be negative, got {}",
                field, family_id, value
            )));
        }
        Ok(value)
    };

    let income = require("income", raw.income)?;
    if income <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "income for family {} must be positive, got {}",
            family_id, income
        )));
    }

    Ok(FamilyFinancialRecord {
        family_id: family_id.to_string(),
        income,
        savings: amount("savings", raw.savings)?,
        monthly_expenses: amount("monthly_expenses", raw.monthly_expenses)?,
        loan_payments: amount("loan_payments", raw.loan_payments)?,
        credit_card_spending: amount("credit_card_spending", raw.credit_card_spending)?,
        discretionary_spending: amount("discretionary_spending", raw.discretionary_spending)?,
        financial_goals_met_pct: require("financial_goals_met_pct", raw.financial_goals_met_pct)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family_one() -> FamilyFinancialRecord {
        FamilyFinancialRecord {
            family_id: "1".into(),
            income: 5000.0,
            savings: 1500.0,
            monthly_expenses: 3000.0,
            loan_payments: 500.0,
            credit_card_spending: 600.0,
            discretionary_spending: 700.0,
            financial_goals_met_pct: 80.0,
        }
    }

    #[test]
    fn test_expenses_to_income_score() {
        assert_eq!(expenses_to_income_score(5000.0, 3000.0).unwrap(), 40.0);
    }

    #[test]
    fn test_loan_to_income_score() {
        assert_eq!(loan_to_income_score(5000.0, 500.0).unwrap(), 90.0);
    }

    #[test]
    fn test_credit_card_usage_score() {
        let score = credit_card_usage_score(6000.0, 1000.0).unwrap();
        assert!((score - 83.333_333_333_333_33).abs() < 1e-9);
    }

    #[test]
    fn test_overspending_floors_at_zero() {
        assert_eq!(expenses_to_income_score(1000.0, 5000.0).unwrap(), 0.0);
        assert_eq!(discretionary_spending_score(1000.0, 1000.0).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_spending_caps_at_hundred() {
        assert_eq!(credit_card_usage_score(4000.0, 0.0).unwrap(), 100.0);
    }

    #[test]
    fn test_savings_score_is_unclamped() {
        let score = savings_to_income_score(1000.0, 2500.0).unwrap();
        assert_eq!(score, 250.0);
    }

    #[test]
    fn test_goals_met_passes_through() {
        assert_eq!(goals_met_score(120.0), 120.0);
        assert_eq!(goals_met_score(-5.0), -5.0);
    }

    #[test]
    fn test_non_positive_income_is_rejected() {
        for income in [0.0, -100.0, f64::NAN] {
            assert!(matches!(
                savings_to_income_score(income, 100.0),
                Err(Error::InvalidInput(_))
            ));
            assert!(matches!(
                loan_to_income_score(income, 100.0),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_normalize_family_one() {
        let scores = normalize(&family_one()).unwrap();
        assert_eq!(scores.savings_to_income, (1500.0 / 5000.0) * 100.0);
        assert_eq!(scores.expenses_to_income, 40.0);
        assert_eq!(scores.loan_to_income, 90.0);
        assert_eq!(scores.credit_card_usage, 100.0 - (600.0 / 5000.0 * 100.0));
        assert_eq!(
            scores.discretionary_spending,
            100.0 - (700.0 / 5000.0 * 100.0)
        );
        assert_eq!(scores.goals_met, 80.0);
    }

    #[test]
    fn test_clamped_scores_stay_in_range() {
        let incomes = [1.0, 250.0, 5000.0, 1.0e7];
        let amounts = [0.0, 0.5, 250.0, 4999.0, 5000.0, 1.0e9];
        for &income in &incomes {
            for &amount in &amounts {
                let record = FamilyFinancialRecord {
                    family_id: "x".into(),
                    income,
                    savings: amount,
                    monthly_expenses: amount,
                    loan_payments: amount,
                    credit_card_spending: amount,
                    discretionary_spending: amount,
                    financial_goals_met_pct: 50.0,
                };
                let scores = normalize(&record).unwrap();
                for value in [
                    scores.expenses_to_income,
                    scores.loan_to_income,
                    scores.credit_card_usage,
                    scores.discretionary_spending,
                ] {
                    assert!((0.0..=100.0).contains(&value), "{} out of range", value);
                }
            }
        }
    }

    #[test]
    fn test_validate_complete_record() {
        let raw = RawFamilyRecord::from(family_one());
        assert_eq!(validate(&raw).unwrap(), family_one());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut raw = RawFamilyRecord::from(family_one());
        raw.loan_payments = None;
        raw.financial_goals_met_pct = None;

        match validate(&raw) {
            Err(Error::MissingField { family_id, field }) => {
                assert_eq!(family_id, "1");
                assert_eq!(field, "loan_payments");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_missing_family_id() {
        let mut raw = RawFamilyRecord::from(family_one());
        raw.family_id = "  ".into();
        assert!(matches!(
            validate(&raw),
            Err(Error::MissingField { ref field, .. }) if field == "family_id"
        ));
    }

    #[test]
    fn test_validate_zero_income() {
        let mut raw = RawFamilyRecord::from(family_one());
        raw.income = Some(0.0);
        assert!(matches!(validate(&raw), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_negative_savings() {
        let mut raw = RawFamilyRecord::from(family_one());
        raw.savings = Some(-1.0);
        assert!(matches!(validate(&raw), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_allows_goals_outside_percentage_range() {
        let mut raw = RawFamilyRecord::from(family_one());
        raw.financial_goals_met_pct = Some(140.0);
        assert_eq!(validate(&raw).unwrap().financial_goals_met_pct, 140.0);
    }
}
