// Composite Score Aggregator
//
// composite  = w_ratio·ratio_coherence + w_ref·reference + w_amp·amplitude, clipped to [0, 1]
// complexity = x · |residual(x)| · ln(depth + 1) · coupling,  x = r^depth
// residual(x) = x + 1/x - r
//
// depth is the matched count capped at `max_depth`. Coupling is the measured
// field coupling when available, else a depth-derived fallback.

use super::correlation::CorrelationScores;
use crate::types::PatternScore;
use harmonia_common::config::ScoringConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of the self-similarity residual x + 1/x - r
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Residual {
    Value(f64),
    /// |x| was too small to invert
    Degenerate,
}

/// Self-similarity residual with an explicit division guard
pub fn residual(x: f64, r: f64, epsilon: f64) -> Residual {
    if !x.is_finite() || x.abs() < epsilon {
        return Residual::Degenerate;
    }
    Residual::Value(x + 1.0 / x - r)
}

/// Blends correlation signatures into the final scalar scores
pub struct CompositeScoreAggregator {
    config: ScoringConfig,
}

impl Default for CompositeScoreAggregator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl CompositeScoreAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted blend of the three signatures, clipped to [0, 1]
    pub fn composite(&self, scores: &CorrelationScores) -> f64 {
        let blended = self.config.ratio_weight * scores.ratio_coherence
            + self.config.reference_weight * scores.reference_correlation
            + self.config.amplitude_weight * scores.amplitude_correlation;
        if blended.is_finite() {
            blended.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Depth estimate: the count capped at `max_depth`
    pub fn depth(&self, count: usize) -> usize {
        count.min(self.config.max_depth)
    }

    /// Coupling used when no cross-channel measurement exists
    pub fn fallback_coupling(&self, depth: usize) -> f64 {
        let c = &self.config;
        (c.fallback_coupling_base + c.fallback_coupling_slope * depth as f64)
            .clamp(c.fallback_coupling_min, c.fallback_coupling_max)
    }

    /// Complexity index for a (capped) depth and scaling ratio
    ///
    /// Degenerate residuals, depths beyond the i32 exponent range and
    /// non-finite products yield 0.
    pub fn complexity_index(&self, depth: usize, r: f64, field_coupling: Option<f64>) -> f64 {
        let Ok(exponent) = i32::try_from(depth) else {
            debug!("Depth {} exceeds the exponent range, complexity 0", depth);
            return 0.0;
        };
        let x = r.powi(exponent);
        let residual = match residual(x, r, self.config.residual_epsilon) {
            Residual::Value(v) => v,
            Residual::Degenerate => {
                debug!("Degenerate residual at depth {} (x={:e}), complexity 0", depth, x);
                return 0.0;
            }
        };
        let info = ((depth + 1) as f64).ln();
        let coupling = field_coupling.unwrap_or_else(|| self.fallback_coupling(depth));

        let complexity = x * residual.abs() * info * coupling;
        if complexity.is_finite() && complexity >= 0.0 {
            complexity
        } else {
            0.0
        }
    }

    /// Assemble the full [`PatternScore`]
    ///
    /// `count` is the matched harmonic count (or a caller-supplied depth).
    pub fn aggregate(
        &self,
        scores: &CorrelationScores,
        count: usize,
        r: f64,
        field_coupling: Option<f64>,
    ) -> PatternScore {
        let depth = self.depth(count);
        PatternScore {
            ratio_coherence: scores.ratio_coherence,
            reference_correlation: scores.reference_correlation,
            amplitude_correlation: scores.amplitude_correlation,
            composite_score: self.composite(scores),
            complexity_index: self.complexity_index(depth, r, field_coupling),
            field_coupling,
            depth,
        }
    }
}
