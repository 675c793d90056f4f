//! Ledger rollups
//!
//! Group-by aggregation over transaction ledgers:
//! - Per-family totals (spending as a share of income)
//! - Per-family scoring records derived from the ledger
//! - Spending by member and category, and top spenders/categories

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use tracing::debug;

use crate::models::{
    FamilyRollup, MemberCategorySpending, RawFamilyRecord, SpendingTotal, Transaction,
};

/// Categories counted as discretionary (travel/entertainment) by default
pub const DEFAULT_DISCRETIONARY_CATEGORIES: &[&str] = &["Travel", "Entertainment"];

/// Running sums for one family
#[derive(Debug, Default)]
struct FamilyTotals {
    rows: usize,
    income: f64,
    savings: f64,
    monthly_expenses: f64,
    loan_payments: f64,
    credit_card_spending: f64,
    goals_met: f64,
    spending: f64,
    discretionary: f64,
    months: BTreeSet<(i32, u32)>,
}

impl FamilyTotals {
    fn add<S: AsRef<str>>(&mut self, tx: &Transaction, discretionary_categories: &[S]) {
        self.rows += 1;
        self.income += tx.income;
        self.savings += tx.savings;
        self.monthly_expenses += tx.monthly_expenses;
        self.loan_payments += tx.loan_payments;
        self.credit_card_spending += tx.credit_card_spending;
        self.goals_met += tx.financial_goals_met_pct;
        self.spending += tx.amount;
        if discretionary_categories
            .iter()
            .any(|c| c.as_ref().eq_ignore_ascii_case(tx.category.trim()))
        {
            self.discretionary += tx.amount;
        }
        self.months.insert((tx.date.year(), tx.date.month()));
    }

    fn mean(&self, sum: f64) -> f64 {
        sum / self.rows as f64
    }
}

fn group_by_family<'a, S: AsRef<str>>(
    transactions: &'a [Transaction],
    discretionary_categories: &[S],
) -> BTreeMap<&'a str, FamilyTotals> {
    let mut families: BTreeMap<&str, FamilyTotals> = BTreeMap::new();
    for tx in transactions {
        families
            .entry(tx.family_id.as_str())
            .or_default()
            .add(tx, discretionary_categories);
    }
    families
}

/// Per-family ledger totals, ordered by family id
pub fn family_rollups(transactions: &[Transaction]) -> Vec<FamilyRollup> {
    group_by_family::<&str>(transactions, &[])
        .into_iter()
        .map(|(family_id, totals)| {
            let mean_income = totals.mean(totals.income);
            FamilyRollup {
                family_id: family_id.to_string(),
                mean_income,
                mean_savings: totals.mean(totals.savings),
                total_spending: totals.spending,
                transaction_count: totals.rows,
                spending_pct_income: (mean_income > 0.0)
                    .then(|| (totals.spending / mean_income) * 100.0),
            }
        })
        .collect()
}

/// Derive one scoring record per family from a ledger
///
/// The per-family columns are averaged over the family's rows.
/// Discretionary spending is the total of the discretionary categories
/// divided by the number of distinct months the ledger covers for that
/// family, so it is comparable with the monthly figures.
pub fn records_from_transactions<S: AsRef<str>>(
    transactions: &[Transaction],
    discretionary_categories: &[S],
) -> Vec<RawFamilyRecord> {
    let records: Vec<RawFamilyRecord> = group_by_family(transactions, discretionary_categories)
        .into_iter()
        .map(|(family_id, totals)| RawFamilyRecord {
            family_id: family_id.to_string(),
            income: Some(totals.mean(totals.income)),
            savings: Some(totals.mean(totals.savings)),
            monthly_expenses: Some(totals.mean(totals.monthly_expenses)),
            loan_payments: Some(totals.mean(totals.loan_payments)),
            credit_card_spending: Some(totals.mean(totals.credit_card_spending)),
            discretionary_spending: Some(totals.discretionary / totals.months.len() as f64),
            financial_goals_met_pct: Some(totals.mean(totals.goals_met)),
        })
        .collect();

    debug!(
        "Derived {} family records from {} transactions",
        records.len(),
        transactions.len()
    );
    records
}

/// Total spending per (member, category), ordered by member then category
pub fn member_category_spending(transactions: &[Transaction]) -> Vec<MemberCategorySpending> {
    let mut totals: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for tx in transactions {
        let entry = totals
            .entry((tx.member_id.as_str(), tx.category.as_str()))
            .or_default();
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|((member_id, category), (amount, count))| MemberCategorySpending {
            member_id: member_id.to_string(),
            category: category.to_string(),
            amount,
            transaction_count: count,
        })
        .collect()
}

/// Members ranked by total spending (highest first)
pub fn top_spenders(transactions: &[Transaction], limit: usize) -> Vec<SpendingTotal> {
    ranked_totals(transactions.iter().map(|tx| (tx.member_id.as_str(), tx.amount)), limit)
}

/// Categories ranked by total spending (highest first)
pub fn top_categories(transactions: &[Transaction], limit: usize) -> Vec<SpendingTotal> {
    ranked_totals(transactions.iter().map(|tx| (tx.category.as_str(), tx.amount)), limit)
}

fn ranked_totals<'a>(
    amounts: impl Iterator<Item = (&'a str, f64)>,
    limit: usize,
) -> Vec<SpendingTotal> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (name, amount) in amounts {
        let entry = totals.entry(name).or_default();
        entry.0 += amount;
        entry.1 += 1;
    }

    let mut ranked: Vec<SpendingTotal> = totals
        .into_iter()
        .map(|(name, (amount, count))| SpendingTotal {
            name: name.to_string(),
            amount,
            transaction_count: count,
        })
        .collect();

    // Stable sort keeps names ascending among equal totals
    ranked.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(
        family: &str,
        member: &str,
        date: (i32, u32, u32),
        category: &str,
        amount: f64,
    ) -> Transaction {
        Transaction {
            family_id: family.to_string(),
            member_id: member.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.to_string(),
            amount,
            income: if family == "F1" { 5000.0 } else { 8000.0 },
            savings: 1000.0,
            monthly_expenses: 3000.0,
            loan_payments: 400.0,
            credit_card_spending: 600.0,
            dependents: Some(1),
            financial_goals_met_pct: 70.0,
        }
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            tx("F1", "F1_M1", (2024, 1, 5), "Travel", 300.0),
            tx("F1", "F1_M2", (2024, 1, 20), "Groceries", 200.0),
            tx("F1", "F1_M1", (2024, 2, 3), "entertainment", 100.0),
            tx("F2", "F2_M1", (2024, 1, 9), "Groceries", 500.0),
            tx("F2", "F2_M1", (2024, 1, 11), "Healthcare", 500.0),
        ]
    }

    #[test]
    fn test_family_rollups() {
        let rollups = family_rollups(&ledger());
        assert_eq!(rollups.len(), 2);

        let f1 = &rollups[0];
        assert_eq!(f1.family_id, "F1");
        assert_eq!(f1.transaction_count, 3);
        assert_eq!(f1.total_spending, 600.0);
        assert_eq!(f1.mean_income, 5000.0);
        assert_eq!(f1.spending_pct_income, Some(12.0));
    }

    #[test]
    fn test_family_rollup_zero_income() {
        let mut ledger = ledger();
        for t in ledger.iter_mut() {
            t.income = 0.0;
        }
        assert!(family_rollups(&ledger)
            .iter()
            .all(|r| r.spending_pct_income.is_none()));
    }

    #[test]
    fn test_records_from_transactions() {
        let records = records_from_transactions(&ledger(), DEFAULT_DISCRETIONARY_CATEGORIES);
        assert_eq!(records.len(), 2);

        let f1 = &records[0];
        assert_eq!(f1.family_id, "F1");
        assert_eq!(f1.income, Some(5000.0));
        assert_eq!(f1.monthly_expenses, Some(3000.0));
        // Travel + entertainment over two months
        assert_eq!(f1.discretionary_spending, Some(200.0));
        assert_eq!(f1.financial_goals_met_pct, Some(70.0));

        let f2 = &records[1];
        assert_eq!(f2.discretionary_spending, Some(0.0));
    }

    #[test]
    fn test_records_with_custom_categories() {
        let categories = vec!["Healthcare".to_string()];
        let records = records_from_transactions(&ledger(), &categories);
        assert_eq!(records[1].discretionary_spending, Some(500.0));
    }

    #[test]
    fn test_member_category_spending() {
        let spending = member_category_spending(&ledger());
        let first = &spending[0];
        assert_eq!(first.member_id, "F1_M1");
        assert_eq!(first.category, "Travel");
        assert_eq!(first.amount, 300.0);

        let f2 = spending.iter().filter(|s| s.member_id == "F2_M1").count();
        assert_eq!(f2, 2);
    }

    #[test]
    fn test_top_spenders() {
        let top = top_spenders(&ledger(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "F2_M1");
        assert_eq!(top[0].amount, 1000.0);
        assert_eq!(top[0].transaction_count, 2);
        assert_eq!(top[1].name, "F1_M1");
    }

    #[test]
    fn test_top_categories_ties_by_name() {
        let top = top_categories(&ledger(), 10);
        assert_eq!(top[0].name, "Groceries");
        assert_eq!(top[0].amount, 700.0);
        // Healthcare (500) then Travel (300), entertainment (100)
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Healthcare", "Travel", "entertainment"]);
    }

    #[test]
    fn test_empty_ledger() {
        assert!(family_rollups(&[]).is_empty());
        assert!(records_from_transactions(&[], DEFAULT_DISCRETIONARY_CATEGORIES).is_empty());
        assert!(top_categories(&[], 5).is_empty());
    }
}
