//! Stage 3c: Validation
//!
//! Runs a fixed battery of named checks over a [`PatternScore`] and rolls
//! them up into a [`ValidationReport`].
//!
//! # Checks
//! 1. Composite score floor
//! 2. Reference correlation floor
//! 3. Minimum harmonic count (falsification check)
//! 4. Ratio coherence floor
//! 5. Reference/amplitude consistency cross-check

pub mod quality_scorer;
pub mod threshold_checks;

use crate::types::{PatternScore, ValidationReport};
use harmonia_common::config::ValidationConfig;
use tracing::debug;

/// Message returned by [`Validator::messages`] when nothing failed
pub const ALL_CHECKS_PASSED: &str = "All validation checks passed";

/// Validation battery
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Run every check against a score
    ///
    /// # Arguments
    /// * `score` - Aggregated signatures
    /// * `matched_count` - Number of matched harmonics behind the score
    pub fn validate(&self, score: &PatternScore, matched_count: usize) -> ValidationReport {
        let c = &self.config;
        let checks = vec![
            threshold_checks::validate_composite(score.composite_score, c.min_composite),
            threshold_checks::validate_reference(score.reference_correlation, c.min_reference),
            threshold_checks::validate_harmonic_count(matched_count, c.min_harmonics),
            threshold_checks::validate_ratio_coherence(score.ratio_coherence, c.min_ratio_coherence),
            threshold_checks::validate_signature_consistency(
                score.reference_correlation,
                score.amplitude_correlation,
                c.cross_check_reference,
                c.cross_check_amplitude,
            ),
        ];

        let (quality_score, status) = quality_scorer::calculate_quality_score(&checks, c);

        debug!(
            "Validation complete: {} checks, quality={:.1}%, status={:?}",
            checks.len(),
            quality_score,
            status
        );

        ValidationReport {
            status,
            quality_score,
            checks,
        }
    }

    /// Failure messages in check order, or the all-passed sentinel
    pub fn messages(report: &ValidationReport) -> Vec<String> {
        let failures: Vec<String> = report
            .failures()
            .filter_map(|c| c.message.clone())
            .collect();
        if failures.is_empty() {
            vec![ALL_CHECKS_PASSED.to_string()]
        } else {
            failures
        }
    }
}
