//! Weight inspection commands

use std::path::Path;

use anyhow::Result;
use hearth_core::weights::default_config_path;

use super::load_weights;

pub fn cmd_weights_show(weights_path: Option<&Path>) -> Result<()> {
    let weights = load_weights(weights_path)?;

    let source = match weights_path {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    println!();
    println!("⚖️  Scoring Weights");
    println!("   Source: {}", source);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:24} │ {:>6} │ {:7}", "Metric", "Weight", "Clamped");
    println!("   ─────────────────────────┼────────┼────────");

    for (metric, weight) in weights.iter() {
        println!(
            "   {:24} │ {:>6.2} │ {:7}",
            metric.label(),
            weight,
            if metric.is_clamped() { "0-100" } else { "no" }
        );
    }

    println!("   ─────────────────────────┼────────┼────────");
    println!("   {:24} │ {:>6.2} │", "Total", weights.total());

    if !weights.is_normalized() {
        println!();
        println!("   💡 Weights do not sum to 1.0: final scores are not bounded to 0-100");
    }

    Ok(())
}

pub fn cmd_weights_path() -> Result<()> {
    match default_config_path() {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                println!("   (not present, using built-in defaults)");
            }
        }
        None => println!("No data directory available on this platform"),
    }
    Ok(())
}
