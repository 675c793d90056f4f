//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use hearth_core::import::parse_transactions;
use hearth_core::rollup::{family_rollups, member_category_spending, top_categories, top_spenders};
use hearth_core::Transaction;

use super::{open_csv, truncate};

fn load_ledger(file: &Path) -> Result<Vec<Transaction>> {
    parse_transactions(open_csv(file)?)
        .with_context(|| format!("Failed to read ledger from {}", file.display()))
}

pub fn cmd_report_families(file: &Path) -> Result<()> {
    let transactions = load_ledger(file)?;
    let rollups = family_rollups(&transactions);

    println!();
    println!("👪 Family Spending");
    println!("   ─────────────────────────────────────────────────────────────");

    if rollups.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    println!(
        "   {:12} │ {:>10} │ {:>10} │ {:>10} │ {:>8} │ {:>5}",
        "Family", "Income", "Savings", "Spent", "% Income", "Count"
    );
    println!("   ─────────────┼────────────┼────────────┼────────────┼──────────┼───────");

    for rollup in &rollups {
        let pct = rollup
            .spending_pct_income
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "   {:12} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>8} │ {:>5}",
            truncate(&rollup.family_id, 12),
            rollup.mean_income,
            rollup.mean_savings,
            rollup.total_spending,
            pct,
            rollup.transaction_count
        );
    }

    Ok(())
}

pub fn cmd_report_members(file: &Path, limit: usize, expand: bool) -> Result<()> {
    let transactions = load_ledger(file)?;
    let spenders = top_spenders(&transactions, limit);

    println!();
    println!("💳 Top Spenders");
    println!("   ─────────────────────────────────────────────────────────────");

    if spenders.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    println!("   {:25} │ {:>10} │ {:>5}", "Member", "Amount", "Count");
    println!("   ──────────────────────────┼────────────┼───────");

    let breakdown = if expand {
        member_category_spending(&transactions)
    } else {
        Vec::new()
    };

    for (i, spender) in spenders.iter().enumerate() {
        println!(
            "   {:25} │ {:>10.2} │ {:>5}",
            format!("{}. {}", i + 1, truncate(&spender.name, 21)),
            spender.amount,
            spender.transaction_count
        );
        for entry in breakdown.iter().filter(|e| e.member_id == spender.name) {
            println!(
                "   {:25} │ {:>10.2} │ {:>5}",
                format!("     {}", truncate(&entry.category, 20)),
                entry.amount,
                entry.transaction_count
            );
        }
    }

    Ok(())
}

pub fn cmd_report_categories(file: &Path, limit: usize) -> Result<()> {
    let transactions = load_ledger(file)?;
    let categories = top_categories(&transactions, limit);

    println!();
    println!("🏷️  Top Categories");
    println!("   ─────────────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    let total: f64 = transactions.iter().map(|t| t.amount).sum();

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");

    for category in &categories {
        let pct = if total != 0.0 {
            category.amount / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&category.name, 25),
            category.amount,
            pct,
            category.transaction_count
        );
    }

    Ok(())
}
