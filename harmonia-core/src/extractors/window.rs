//! Segment tapers for the periodogram
//!
//! Both windows are periodic (DFT-even): the sample at index `len` would equal
//! the one at index 0. That keeps bin-centred sinusoids exactly on a bin.

use harmonia_common::config::WindowKind;
use std::f64::consts::PI;

/// Hann as a cosine sum
const HANN: [f64; 2] = [0.5, -0.5];

/// Flat-top coefficients (same five-term set as SciPy's `flattop`), signs folded in
const FLAT_TOP: [f64; 5] = [
    0.215_578_95,
    -0.416_631_58,
    0.277_263_158,
    -0.083_578_947,
    0.006_947_368,
];

/// Window coefficients of the given kind and length
pub fn coefficients(kind: WindowKind, len: usize) -> Vec<f64> {
    match kind {
        WindowKind::Hann => cosine_sum(len, &HANN),
        WindowKind::FlatTop => cosine_sum(len, &FLAT_TOP),
    }
}

/// Half-width of the main lobe in bins
///
/// A K-term cosine sum has its first spectral null K bins from the centre;
/// two tones closer than this merge into one peak.
pub fn main_lobe_half_width(kind: WindowKind) -> f64 {
    match kind {
        WindowKind::Hann => HANN.len() as f64,
        WindowKind::FlatTop => FLAT_TOP.len() as f64,
    }
}

/// w[i] = Σ_k a_k · cos(2πk·i / len)
fn cosine_sum(len: usize, coeffs: &[f64]) -> Vec<f64> {
    let step = 2.0 * PI / len.max(1) as f64;
    (0..len)
        .map(|i| {
            let x = step * i as f64;
            coeffs
                .iter()
                .enumerate()
                .map(|(k, a)| a * (k as f64 * x).cos())
                .sum::<f64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_starts_at_zero_peaks_at_centre() {
        let w = coefficients(WindowKind::Hann, 8);
        assert!(w[0].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_periodic_symmetry() {
        for kind in [WindowKind::Hann, WindowKind::FlatTop] {
            let w = coefficients(kind, 64);
            for i in 1..32 {
                assert!((w[i] - w[64 - i]).abs() < 1e-12, "{kind:?} asymmetric at {i}");
            }
        }
    }

    #[test]
    fn test_flat_top_peak_near_one() {
        let w = coefficients(WindowKind::FlatTop, 1024);
        assert!((w[512] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_main_lobe_half_width() {
        assert_eq!(main_lobe_half_width(WindowKind::Hann), 2.0);
        assert_eq!(main_lobe_half_width(WindowKind::FlatTop), 5.0);
    }

    #[test]
    fn test_coherent_gain_positive_for_short_windows() {
        for len in 2..16 {
            for kind in [WindowKind::Hann, WindowKind::FlatTop] {
                let sum: f64 = coefficients(kind, len).iter().sum();
                assert!(sum > 0.0, "{kind:?} len {len}");
            }
        }
    }

    #[test]
    fn test_empty() {
        assert!(coefficients(WindowKind::Hann, 0).is_empty());
    }
}
