//! Scoring command implementations

use std::path::Path;

use anyhow::{Context, Result};
use hearth_core::{
    import::{parse_family_records, parse_transactions},
    rollup::records_from_transactions,
    Metric, RawFamilyRecord, ScoringEngine, ScoringReport,
};
use tracing::info;

use super::{load_weights, open_csv, truncate, OutputFormat};

/// Score a per-family records CSV
pub fn cmd_score_file(
    file: &Path,
    weights_path: Option<&Path>,
    format: OutputFormat,
    parallel: bool,
) -> Result<()> {
    // Weights first: a bad weight set aborts before any record is read
    let engine = ScoringEngine::new(load_weights(weights_path)?);

    let records = parse_family_records(open_csv(file)?)
        .with_context(|| format!("Failed to read family records from {}", file.display()))?;

    let report = run(&engine, &records, parallel);
    print_report(&report, format)
}

/// Roll up a transaction ledger per family, then score it
pub fn cmd_score_ledger(
    file: &Path,
    weights_path: Option<&Path>,
    discretionary: &[String],
    format: OutputFormat,
    parallel: bool,
) -> Result<()> {
    let engine = ScoringEngine::new(load_weights(weights_path)?);

    let transactions = parse_transactions(open_csv(file)?)
        .with_context(|| format!("Failed to read ledger from {}", file.display()))?;
    let records = records_from_transactions(&transactions, discretionary);

    let report = run(&engine, &records, parallel);
    print_report(&report, format)
}

fn run(engine: &ScoringEngine, records: &[RawFamilyRecord], parallel: bool) -> ScoringReport {
    let report = if parallel {
        engine.score_batch_parallel(records)
    } else {
        engine.score_batch(records)
    };
    info!(
        "Scored {} of {} families",
        report.scored_count(),
        records.len()
    );
    report
}

fn print_report(report: &ScoringReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = report
                .to_json()
                .context("Failed to serialize scores to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Table => print_table(report),
    }
    Ok(())
}

fn print_table(report: &ScoringReport) {
    println!();
    println!("🏠 Financial Health Scores");
    if (report.weight_total - 1.0).abs() < 1e-9 {
        println!("   Weights total: {:.2}", report.weight_total);
    } else {
        println!(
            "   Weights total: {:.2} (not normalized, scores are not bounded to 0-100)",
            report.weight_total
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if report.scores.is_empty() {
        println!("   No families scored.");
    } else {
        println!(
            "   {:12} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7} │ {:>7}",
            "Family", "Savings", "Expense", "Loan", "Credit", "Discr.", "Goals", "Final"
        );
        println!("   ─────────────┼─────────┼─────────┼─────────┼─────────┼─────────┼─────────┼─────────");

        for score in report.ranked() {
            let cells: Vec<String> = Metric::all()
                .iter()
                .map(|&m| format!("{:>7.2}", score.sub_scores.get(m)))
                .collect();
            println!(
                "   {:12} │ {} │ {:>7.2}",
                truncate(&score.family_id, 12),
                cells.join(" │ "),
                score.final_score
            );
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("⚠️  {} families could not be scored:", report.failed_count());
        for failure in &report.failures {
            let family = if failure.family_id.is_empty() {
                "(no id)"
            } else {
                failure.family_id.as_str()
            };
            println!("   {:12} [{}] {}", family, failure.kind, failure.message);
        }
    }
}
