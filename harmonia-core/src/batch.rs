//! Parallel batch analysis
//!
//! Independent inputs are analysed on the rayon worker pool. Output order
//! always matches input order. Cancellation is cooperative and checked once
//! per job: a job already running finishes, jobs not yet started report
//! [`Error::Cancelled`].

use crate::analyzer::HarmonicAnalyzer;
use crate::types::{AnalysisInput, ClassificationResult};
use harmonia_common::{Error, PatternLevel, Result};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One unit of batch work
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub subject_id: String,
    pub input: AnalysisInput,
}

impl BatchJob {
    pub fn new(subject_id: impl Into<String>, input: AnalysisInput) -> Self {
        Self {
            subject_id: subject_id.into(),
            input,
        }
    }
}

/// Result of one batch job
#[derive(Debug)]
pub struct BatchOutcome {
    pub subject_id: String,
    pub result: Result<ClassificationResult>,
}

/// Analyze every job, in parallel
pub fn analyze_batch(
    analyzer: &HarmonicAnalyzer,
    jobs: &[BatchJob],
    cancel_token: &CancellationToken,
) -> Vec<BatchOutcome> {
    debug!("Starting batch of {} jobs", jobs.len());

    let outcomes: Vec<BatchOutcome> = jobs
        .par_iter()
        .map(|job| {
            let result = if cancel_token.is_cancelled() {
                Err(Error::Cancelled)
            } else {
                analyzer.analyze(&job.input, &job.subject_id)
            };
            BatchOutcome {
                subject_id: job.subject_id.clone(),
                result,
            }
        })
        .collect();

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = jobs.len(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "Batch complete"
    );

    outcomes
}

/// Counts over a finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Successful results per level
    pub levels: BTreeMap<PatternLevel, usize>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match &outcome.result {
                Ok(result) => {
                    summary.succeeded += 1;
                    *summary.levels.entry(result.level).or_insert(0) += 1;
                }
                Err(Error::Cancelled) => summary.cancelled += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeSeries;
    use harmonia_common::AnalyzerConfig;

    fn analyzer() -> HarmonicAnalyzer {
        HarmonicAnalyzer::new(AnalyzerConfig::default()).unwrap()
    }

    fn jobs() -> Vec<BatchJob> {
        (0..12)
            .map(|i| BatchJob::new(format!("depth-{i}"), AnalysisInput::Depth(i)))
            .collect()
    }

    #[test]
    fn test_order_preserved() {
        let outcomes = analyze_batch(&analyzer(), &jobs(), &CancellationToken::new());
        assert_eq!(outcomes.len(), 12);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.subject_id, format!("depth-{i}"));
            assert_eq!(outcome.result.as_ref().unwrap().score.depth, i);
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let outcomes = analyze_batch(&analyzer(), &jobs(), &token);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(Error::Cancelled))));
        assert_eq!(BatchSummary::from_outcomes(&outcomes).cancelled, 12);
    }

    #[test]
    fn test_summary_counts() {
        let mut batch = jobs();
        let short = TimeSeries::new(vec![vec![1.0]], 10.0).unwrap();
        batch.push(BatchJob::new("short", AnalysisInput::Signal(short)));

        let outcomes = analyze_batch(&analyzer(), &batch, &CancellationToken::new());
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.succeeded, 12);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.levels.values().sum::<usize>(), 12);
        // depths 0 and 1 fall below the first depth threshold
        assert_eq!(summary.levels.get(&PatternLevel::Level0), Some(&2));
    }
}
