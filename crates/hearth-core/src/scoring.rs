//! Weighted aggregation and batch scoring
//!
//! A family's final score is `Σ sub_score × weight` over the six metrics,
//! summed in [`Metric::all`] order. Weights are not renormalized and the
//! result is not clamped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hearth_core::{ScoringEngine, ScoringWeights};
//!
//! let engine = ScoringEngine::new(ScoringWeights::load(None)?);
//! let report = engine.score_batch(&records);
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.family_id, failure.message);
//! }
//! ```

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    FamilyFinancialRecord, FamilyScore, RawFamilyRecord, RecordFailure, ScoringReport, SubScores,
};
use crate::normalize::{normalize, validate};
use crate::weights::{Metric, ScoringWeights};

/// Weighted sum of the sub-scores
pub fn final_score(sub_scores: &SubScores, weights: &ScoringWeights) -> f64 {
    Metric::all()
        .iter()
        .map(|&metric| sub_scores.get(metric) * weights.get(metric))
        .sum()
}

/// Scores families against one immutable weight set
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Build an engine from key/weight pairs
    ///
    /// Fails with a configuration error before any family is scored if a
    /// metric is missing.
    pub fn from_weight_map<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Ok(Self::new(ScoringWeights::from_map(entries)?))
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one validated record
    ///
    /// Fails with `InvalidInput` when a sub-score or the final score
    /// overflows to a non-finite value.
    pub fn score(&self, record: &FamilyFinancialRecord) -> Result<FamilyScore> {
        let sub_scores = normalize(record)?;
        if let Some(&metric) = Metric::all()
            .iter()
            .find(|&&m| !sub_scores.get(m).is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "{} for family {} is not finite",
                metric, record.family_id
            )));
        }

        let weighted = final_score(&sub_scores, &self.weights);
        if !weighted.is_finite() {
            return Err(Error::InvalidInput(format!(
                "final score for family {} is not finite",
                record.family_id
            )));
        }

        Ok(FamilyScore {
            family_id: record.family_id.clone(),
            sub_scores,
            final_score: weighted,
        })
    }

    /// Validate then score one raw record
    pub fn score_raw(&self, raw: &RawFamilyRecord) -> Result<FamilyScore> {
        self.score(&validate(raw)?)
    }

    /// Score a batch sequentially
    ///
    /// Rejected records are listed in the report's failures; they never
    /// abort the rest of the batch.
    pub fn score_batch(&self, records: &[RawFamilyRecord]) -> ScoringReport {
        let results = records.iter().map(|raw| self.score_raw(raw)).collect();
        self.collect(records, results)
    }

    /// Score a batch across the rayon thread pool
    ///
    /// Produces the same report as [`ScoringEngine::score_batch`].
    pub fn score_batch_parallel(&self, records: &[RawFamilyRecord]) -> ScoringReport {
        let results = records.par_iter().map(|raw| self.score_raw(raw)).collect();
        self.collect(records, results)
    }

    fn collect(
        &self,
        records: &[RawFamilyRecord],
        results: Vec<Result<FamilyScore>>,
    ) -> ScoringReport {
        let mut report = ScoringReport {
            weight_total: self.weights.total(),
            ..Default::default()
        };

        // A repeated id rejects every copy, whatever the input order
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for raw in records {
            *occurrences.entry(raw.family_id.trim()).or_default() += 1;
        }

        for (raw, result) in records.iter().zip(results) {
            let family_id = raw.family_id.trim();
            let count = occurrences.get(family_id).copied().unwrap_or_default();
            let result = if count > 1 && !family_id.is_empty() {
                Err(Error::InvalidInput(format!(
                    "family id {} appears {} times in batch",
                    family_id, count
                )))
            } else {
                result
            };

            match result {
                Ok(score) => {
                    report.scores.insert(score.family_id.clone(), score);
                }
                Err(error) => {
                    warn!(family_id, error = %error, "Skipping family record");
                    report.failures.push(RecordFailure::from_error(family_id, &error));
                }
            }
        }

        debug!(
            "Scored {} families ({} rejected)",
            report.scored_count(),
            report.failed_count()
        );
        report
    }
}
