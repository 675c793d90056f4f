//! CSV import for family records and transaction ledgers
//!
//! Headers are matched loosely: case, spacing, hyphens and a trailing `(%)`
//! are ignored, so `Financial Goals Met (%)`, `financial goals met` and
//! `financial_goals_met` all name the same column.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RawFamilyRecord, Transaction};

/// Canonical form of a header cell
fn header_key(header: &str) -> String {
    let lowered = header.trim().to_lowercase().replace("(%)", "");
    lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Index of the first header whose canonical form is one of `names`
fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&header_key(h).as_str()))
}

fn require_column(headers: &StringRecord, names: &[&str]) -> Result<usize> {
    find_column(headers, names)
        .ok_or_else(|| Error::InvalidData(format!("Missing column: {}", names[0])))
}

const FAMILY_ID: &[&str] = &["family_id", "family"];
const MEMBER_ID: &[&str] = &["member_id", "member"];
const TRANSACTION_DATE: &[&str] = &["transaction_date", "date"];
const CATEGORY: &[&str] = &["category"];
const AMOUNT: &[&str] = &["amount"];
const INCOME: &[&str] = &["income"];
const SAVINGS: &[&str] = &["savings"];
const MONTHLY_EXPENSES: &[&str] = &["monthly_expenses", "expenses"];
const LOAN_PAYMENTS: &[&str] = &["loan_payments"];
const CREDIT_CARD_SPENDING: &[&str] = &["credit_card_spending"];
const DISCRETIONARY_SPENDING: &[&str] = &["discretionary_spending"];
const DEPENDENTS: &[&str] = &["dependents"];
const GOALS_MET: &[&str] = &["financial_goals_met", "financial_goals_met_pct", "goals_met"];

/// Parse per-family records
///
/// Format: Family ID,Income,Savings,Monthly Expenses,Loan Payments,
///         Credit Card Spending,Discretionary Spending,Financial Goals Met
///
/// Only the family id column is required. Absent columns, blank cells and
/// non-numeric cells become `None` so that each family is rejected on its
/// own when scored.
pub fn parse_family_records<R: Read>(reader: R) -> Result<Vec<RawFamilyRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let family_col = require_column(&headers, FAMILY_ID)?;
    let income_col = find_column(&headers, INCOME);
    let savings_col = find_column(&headers, SAVINGS);
    let expenses_col = find_column(&headers, MONTHLY_EXPENSES);
    let loan_col = find_column(&headers, LOAN_PAYMENTS);
    let credit_col = find_column(&headers, CREDIT_CARD_SPENDING);
    let discretionary_col = find_column(&headers, DISCRETIONARY_SPENDING);
    let goals_col = find_column(&headers, GOALS_MET);

    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let cell = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .and_then(parse_optional_amount)
        };

        records.push(RawFamilyRecord {
            family_id: record.get(family_col).unwrap_or_default().trim().to_string(),
            income: cell(income_col),
            savings: cell(savings_col),
            monthly_expenses: cell(expenses_col),
            loan_payments: cell(loan_col),
            credit_card_spending: cell(credit_col),
            discretionary_spending: cell(discretionary_col),
            financial_goals_met_pct: cell(goals_col),
        });
    }

    debug!("Parsed {} family records", records.len());
    Ok(records)
}

/// Parse a household transaction ledger
///
/// Format: Family ID,Member ID,Transaction Date,Category,Amount,Income,
///         Savings,Monthly Expenses,Loan Payments,Credit Card Spending,
///         Dependents,Financial Goals Met (%)
///
/// Every column except Dependents is required, and a malformed row fails
/// the whole import.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let family_col = require_column(&headers, FAMILY_ID)?;
    let member_col = require_column(&headers, MEMBER_ID)?;
    let date_col = require_column(&headers, TRANSACTION_DATE)?;
    let category_col = require_column(&headers, CATEGORY)?;
    let amount_col = require_column(&headers, AMOUNT)?;
    let income_col = require_column(&headers, INCOME)?;
    let savings_col = require_column(&headers, SAVINGS)?;
    let expenses_col = require_column(&headers, MONTHLY_EXPENSES)?;
    let loan_col = require_column(&headers, LOAN_PAYMENTS)?;
    let credit_col = require_column(&headers, CREDIT_CARD_SPENDING)?;
    let goals_col = require_column(&headers, GOALS_MET)?;
    let dependents_col = find_column(&headers, DEPENDENTS);

    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = index + 2;

        let text = |col: usize, name: &str| -> Result<String> {
            record
                .get(col)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
        };
        let number = |col: usize, name: &str| -> Result<f64> {
            let raw = text(col, name)?;
            parse_amount(&raw)
                .map_err(|_| Error::Import(format!("Line {}: invalid {}: {}", line, name, raw)))
        };

        let dependents = match dependents_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(s) => Some(s.parse::<u32>().map_err(|_| {
                Error::Import(format!("Line {}: invalid dependents: {}", line, s))
            })?),
            None => None,
        };

        let raw_date = text(date_col, "transaction date")?;
        let date = parse_date(&raw_date).map_err(|_| {
            Error::Import(format!("Line {}: invalid transaction date: {}", line, raw_date))
        })?;

        transactions.push(Transaction {
            family_id: text(family_col, "family id")?,
            member_id: text(member_col, "member id")?,
            date,
            category: text(category_col, "category")?,
            amount: number(amount_col, "amount")?,
            income: number(income_col, "income")?,
            savings: number(savings_col, "savings")?,
            monthly_expenses: number(expenses_col, "monthly expenses")?,
            loan_payments: number(loan_col, "loan payments")?,
            credit_card_spending: number(credit_col, "credit card spending")?,
            dependents,
            financial_goals_met_pct: number(goals_col, "financial goals met")?,
        });
    }

    debug!("Parsed {} ledger transactions", transactions.len());
    Ok(transactions)
}

/// Parse a date string in any of the supported formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Spreadsheet exports often carry a midnight timestamp
    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

/// Lenient variant for family records: blank or unparseable is `None`
fn parse_optional_amount(s: &str) -> Option<f64> {
    if s.trim().is_empty() {
        return None;
    }
    parse_amount(s).ok()
}
