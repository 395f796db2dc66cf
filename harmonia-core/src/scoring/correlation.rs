// Correlation Scorer
//
// Three independent signatures over the matched amplitude sequence A (length m):
// - ratio coherence: consecutive decay ratios A[i]/A[i+1] against r
// - reference correlation: Pearson(A/max A, descending Fibonacci / max)
// - amplitude correlation: Pearson(A/max A, r^-n / max)
//
// Every signature is clipped to [0, 1]. Degenerate inputs (too few values,
// zero variance, near-zero denominators) score 0 instead of producing NaN.

use serde::{Deserialize, Serialize};

/// Relative magnitude below which an amplitude counts as zero
const AMPLITUDE_EPSILON: f64 = 1e-12;

/// Sum of squared deviations below which a normalized sequence is flat
const VARIANCE_EPSILON: f64 = 1e-18;

/// The three correlation signatures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CorrelationScores {
    pub ratio_coherence: f64,
    pub reference_correlation: f64,
    pub amplitude_correlation: f64,
}

/// Score a matched amplitude sequence against scaling ratio `r`
pub fn score_amplitudes(amplitudes: &[f64], r: f64) -> CorrelationScores {
    CorrelationScores {
        ratio_coherence: ratio_coherence(amplitudes, r),
        reference_correlation: reference_correlation(amplitudes),
        amplitude_correlation: amplitude_correlation(amplitudes, r),
    }
}

/// Agreement between consecutive decay ratios and `r`
///
/// coherence = max(0, 1 - mean(|A[i]/A[i+1] - r| / r)); 0 when m < 2 or any
/// denominator is effectively zero.
pub fn ratio_coherence(amplitudes: &[f64], r: f64) -> f64 {
    if amplitudes.len() < 2 || !(r > 0.0) {
        return 0.0;
    }
    let peak = max_value(amplitudes);
    if peak <= 0.0 {
        return 0.0;
    }
    let mut total = 0.0;
    for pair in amplitudes.windows(2) {
        if pair[1] <= peak * AMPLITUDE_EPSILON {
            return 0.0;
        }
        let ratio = pair[0] / pair[1];
        total += (ratio - r).abs() / r;
    }
    let mean_deviation = total / (amplitudes.len() - 1) as f64;
    clip_unit(1.0 - mean_deviation)
}

/// Pearson correlation with the descending Fibonacci sequence (m >= 3)
pub fn reference_correlation(amplitudes: &[f64]) -> f64 {
    if amplitudes.len() < 3 {
        return 0.0;
    }
    let observed = normalize_by_max(amplitudes);
    let reference = normalize_by_max(&fibonacci_descending(amplitudes.len()));
    clip_unit(pearson(&observed, &reference))
}

/// Pearson correlation with the theoretical decay r^-n (m >= 3)
pub fn amplitude_correlation(amplitudes: &[f64], r: f64) -> f64 {
    if amplitudes.len() < 3 || !(r > 0.0) {
        return 0.0;
    }
    let observed = normalize_by_max(amplitudes);
    let decay: Vec<f64> = (0..amplitudes.len()).map(|n| r.powi(-(n as i32))).collect();
    let decay = normalize_by_max(&decay);
    clip_unit(pearson(&observed, &decay))
}

/// First `m` Fibonacci numbers (1, 1, 2, 3, ...) in descending order
pub fn fibonacci_descending(m: usize) -> Vec<f64> {
    let mut seq = Vec::with_capacity(m);
    let (mut a, mut b) = (1.0f64, 1.0f64);
    for _ in 0..m {
        seq.push(a);
        let next = a + b;
        a = b;
        b = next;
    }
    seq.reverse();
    seq
}

/// Pearson correlation coefficient
///
/// Returns 0 for mismatched lengths, fewer than 2 points, or zero variance
/// in either sequence. Never returns NaN.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a <= VARIANCE_EPSILON || var_b <= VARIANCE_EPSILON {
        return 0.0;
    }
    let r = cov / (var_a.sqrt() * var_b.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Divide by the maximum; all-zero (or empty) input stays zero
fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let peak = max_value(values);
    if !(peak > 0.0) {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / peak).collect()
}

fn clip_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmonia_common::config::GOLDEN_RATIO;

    fn geometric_decay(r: f64, m: usize) -> Vec<f64> {
        (1..=m).map(|n| r.powi(-(n as i32))).collect()
    }

    #[test]
    fn test_perfect_decay_scores_high() {
        let scores = score_amplitudes(&geometric_decay(GOLDEN_RATIO, 5), GOLDEN_RATIO);
        assert!((scores.ratio_coherence - 1.0).abs() < 1e-12);
        assert!((scores.amplitude_correlation - 1.0).abs() < 1e-12);
        assert!(scores.reference_correlation > 0.95, "{}", scores.reference_correlation);
    }

    #[test]
    fn test_ratio_coherence_partial_deviation() {
        // ratios 2.0 and 3.0 against r = 2: deviations 0 and 0.5
        let coherence = ratio_coherence(&[6.0, 3.0, 1.0], 2.0);
        assert!((coherence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_coherence_floors_at_zero() {
        assert_eq!(ratio_coherence(&[100.0, 1.0], 2.0), 0.0);
    }

    #[test]
    fn test_minimum_lengths() {
        assert_eq!(ratio_coherence(&[1.0], 2.0), 0.0);
        assert_eq!(reference_correlation(&[1.0, 0.5]), 0.0);
        assert_eq!(amplitude_correlation(&[1.0, 0.5], 2.0), 0.0);
        assert_eq!(score_amplitudes(&[], 2.0), CorrelationScores::default());
    }

    #[test]
    fn test_zero_denominator_is_neutral() {
        assert_eq!(ratio_coherence(&[1.0, 0.0, 0.5], 2.0), 0.0);
    }

    #[test]
    fn test_flat_amplitudes_zero_variance() {
        let flat = [0.4; 6];
        assert_eq!(reference_correlation(&flat), 0.0);
        assert_eq!(amplitude_correlation(&flat, GOLDEN_RATIO), 0.0);
        assert_eq!(reference_correlation(&[0.0; 4]), 0.0);
    }

    #[test]
    fn test_rising_amplitudes_clip_to_zero() {
        let rising = [0.1, 0.2, 0.4, 0.8];
        assert_eq!(amplitude_correlation(&rising, 2.0), 0.0);
        assert_eq!(reference_correlation(&rising), 0.0);
    }

    #[test]
    fn test_fibonacci_descending() {
        assert_eq!(fibonacci_descending(6), vec![8.0, 5.0, 3.0, 2.0, 1.0, 1.0]);
        assert!(fibonacci_descending(0).is_empty());
    }

    #[test]
    fn test_pearson_basics() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_signatures_bounded() {
        let noisy = [0.3, 0.9, 0.1, 0.7, 0.2, 0.5];
        let scores = score_amplitudes(&noisy, GOLDEN_RATIO);
        for s in [
            scores.ratio_coherence,
            scores.reference_correlation,
            scores.amplitude_correlation,
        ] {
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
