//! Integration tests for hearth-core
//!
//! These tests exercise the full import → score workflow.

use hearth_core::{
    import::{parse_family_records, parse_transactions},
    rollup::{records_from_transactions, DEFAULT_DISCRETIONARY_CATEGORIES},
    Error, FailureKind, Metric, ScoringEngine, ScoringWeights,
};

/// The three reference families plus two that must be rejected
fn family_csv() -> &'static str {
    r#"Family ID,Income,Savings,Monthly Expenses,Loan Payments,Credit Card Spending,Discretionary Spending,Financial Goals Met
1,5000,1500,3000,500,600,700,80
2,7000,2000,4500,1000,800,900,60
3,6000,1000,4000,800,1000,1100,90
4,0,100,100,100,100,100,50
5,4000,,1000,100,100,100,50"#
}

fn ledger_csv() -> &'static str {
    r#"Family ID,Member ID,Transaction Date,Category,Amount,Income,Savings,Monthly Expenses,Loan Payments,Credit Card Spending,Dependents,Financial Goals Met (%)
FAM001,FAM001_Member1,2024-01-07,Travel,400.00,5000,1500,3000,500,600,2,80
FAM001,FAM001_Member2,2024-01-15,Groceries,250.00,5000,1500,3000,500,600,2,80
FAM001,FAM001_Member1,2024-02-02,Entertainment,300.00,5000,1500,3000,500,600,2,80
FAM002,FAM002_Member1,2024-01-09,Healthcare,120.00,7000,2000,4500,1000,800,0,60"#
}

/// Final score computed directly from the published formula
fn formula_score(
    income: f64,
    savings: f64,
    expenses: f64,
    loan: f64,
    credit_card: f64,
    discretionary: f64,
    goals: f64,
) -> f64 {
    let clip = |v: f64| v.clamp(0.0, 100.0);
    (savings / income) * 100.0 * 0.35
        + clip(100.0 - (expenses / income * 100.0)) * 0.25
        + clip(100.0 - (loan / income * 100.0)) * 0.20
        + clip(100.0 - (credit_card / income * 100.0)) * 0.10
        + clip(100.0 - (discretionary / income * 100.0)) * 0.20
        + goals * 0.10
}

#[test]
fn test_score_family_csv() {
    let records = parse_family_records(family_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(records.len(), 5);

    let report = ScoringEngine::default().score_batch(&records);

    assert_eq!(report.scored_count(), 3);
    assert_eq!(
        report.get("1").unwrap().final_score,
        formula_score(5000.0, 1500.0, 3000.0, 500.0, 600.0, 700.0, 80.0)
    );
    assert_eq!(
        report.get("2").unwrap().final_score,
        formula_score(7000.0, 2000.0, 4500.0, 1000.0, 800.0, 900.0, 60.0)
    );
    assert_eq!(
        report.get("3").unwrap().final_score,
        formula_score(6000.0, 1000.0, 4000.0, 800.0, 1000.0, 1100.0, 90.0)
    );

    assert_eq!(report.failed_count(), 2);
    assert_eq!(report.failures[0].family_id, "4");
    assert_eq!(report.failures[0].kind, FailureKind::InvalidInput);
    assert_eq!(report.failures[1].family_id, "5");
    assert_eq!(report.failures[1].kind, FailureKind::MissingField);
}

#[test]
fn test_ranked_families() {
    let records = parse_family_records(family_csv().as_bytes()).unwrap();
    let report = ScoringEngine::default().score_batch(&records);

    let ranked: Vec<&str> = report
        .ranked()
        .iter()
        .map(|s| s.family_id.as_str())
        .collect();
    assert_eq!(ranked.len(), 3);
    for pair in report.ranked().windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
}

#[test]
fn test_ledger_to_scores() {
    let transactions = parse_transactions(ledger_csv().as_bytes()).unwrap();
    let records = records_from_transactions(&transactions, DEFAULT_DISCRETIONARY_CATEGORIES);
    assert_eq!(records.len(), 2);

    let report = ScoringEngine::default().score_batch_parallel(&records);
    assert_eq!(report.scored_count(), 2);

    // FAM001: (400 + 300) travel/entertainment across two months
    let fam1 = report.get("FAM001").unwrap();
    assert_eq!(
        fam1.final_score,
        formula_score(5000.0, 1500.0, 3000.0, 500.0, 600.0, 350.0, 80.0)
    );

    // FAM002 has no discretionary spending at all
    let fam2 = report.get("FAM002").unwrap();
    assert_eq!(fam2.sub_scores.discretionary_spending, 100.0);
}

#[test]
fn test_custom_weights_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.toml");
    std::fs::write(
        &path,
        r#"
[weights]
savings_to_income = 0.30
expenses_to_income = 0.20
loan_to_income = 0.15
credit_card_usage = 0.10
discretionary_spending = 0.15
goals_met = 0.10
legacy_bonus = 2.0
"#,
    )
    .unwrap();

    let weights = ScoringWeights::load(Some(&path)).unwrap();
    assert!(weights.is_normalized());
    assert_eq!(weights.get(Metric::LoanToIncome), 0.15);

    let records = parse_family_records(family_csv().as_bytes()).unwrap();
    let report = ScoringEngine::new(weights).score_batch(&records);
    assert!((report.weight_total - 1.0).abs() < 1e-9);
    for score in report.scores.values() {
        assert!(score.final_score <= 100.0 || score.sub_scores.savings_to_income > 100.0);
    }
}

#[test]
fn test_incomplete_weights_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.toml");
    std::fs::write(&path, "[weights]\nsavings_to_income = 1.0\n").unwrap();

    match ScoringWeights::load(Some(&path)) {
        Err(Error::Configuration(msg)) => {
            assert!(msg.contains("expenses_to_income"));
            assert!(msg.contains("goals_met"));
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_report_serializes_to_json() {
    let records = parse_family_records(family_csv().as_bytes()).unwrap();
    let report = ScoringEngine::default().score_batch(&records);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["scores"]["1"]["final_score"].is_number());
    assert_eq!(json["failures"][1]["kind"], "missing_field");
}
