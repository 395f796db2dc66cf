// Harmonic Series Generator
//
// f_n = f0 · r^(n/k) for n = 1, 2, ..., max_candidates, truncated the first
// time f_n exceeds the ceiling (Nyquist frequency for sampled input).

use crate::types::HarmonicSeries;
use harmonia_common::config::SeriesConfig;
use harmonia_common::{Error, Result};

/// Generate the theoretical series
///
/// Pure function of its arguments. Generation also stops if rounding makes a
/// term fail to exceed its predecessor (possible only for extreme `k`), so
/// the output is always strictly increasing.
///
/// # Errors
/// `InvalidInput` when `f0 <= 0`, `r <= 1`, `k <= 0`, `ceiling <= 0`, or any
/// of them is not finite.
pub fn generate_series(
    f0: f64,
    r: f64,
    k: f64,
    max_candidates: usize,
    ceiling: f64,
) -> Result<HarmonicSeries> {
    if !f0.is_finite() || f0 <= 0.0 {
        return Err(Error::invalid_input("f0", f0, "base frequency must be > 0"));
    }
    if !r.is_finite() || r <= 1.0 {
        return Err(Error::invalid_input("r", r, "scaling ratio must be > 1"));
    }
    if !k.is_finite() || k <= 0.0 {
        return Err(Error::invalid_input("k", k, "depth normalization must be > 0"));
    }
    if !ceiling.is_finite() || ceiling <= 0.0 {
        return Err(Error::invalid_input("nyquist", ceiling, "ceiling frequency must be > 0"));
    }

    let mut frequencies: Vec<f64> = Vec::with_capacity(max_candidates);
    for n in 1..=max_candidates {
        let f = f0 * r.powf(n as f64 / k);
        if !f.is_finite() || f > ceiling {
            break;
        }
        if frequencies.last().is_some_and(|&prev| f <= prev) {
            break;
        }
        frequencies.push(f);
    }

    Ok(HarmonicSeries {
        base_frequency: f0,
        ratio: r,
        depth_normalization: k,
        frequencies,
    })
}

/// Generate the series described by a [`SeriesConfig`]
pub fn generate_from_config(config: &SeriesConfig, ceiling: f64) -> Result<HarmonicSeries> {
    generate_series(
        config.base_frequency,
        config.ratio,
        config.depth_normalization,
        config.max_candidates,
        ceiling,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmonia_common::config::GOLDEN_RATIO;
    use proptest::prelude::*;

    #[test]
    fn test_golden_series_truncated_at_nyquist() {
        // 8·φ^n: 12.9, 20.9, 33.9, 54.8, 88.7, 143.6 (> 128)
        let series = generate_series(8.0, GOLDEN_RATIO, 1.0, 13, 128.0).unwrap();
        assert_eq!(series.len(), 5);
        assert!((series.frequencies[0] - 8.0 * GOLDEN_RATIO).abs() < 1e-9);
        assert!((series.frequencies[4] - 88.721).abs() < 1e-2);
    }

    #[test]
    fn test_depth_normalization_spreads_terms() {
        let series = generate_series(8.0, GOLDEN_RATIO, 7.0, 5, 128.0).unwrap();
        assert_eq!(series.len(), 5);
        let expected = 8.0 * GOLDEN_RATIO.powf(5.0 / 7.0);
        assert!((series.frequencies[4] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_max_candidates_bound() {
        let series = generate_series(1.0, 2.0, 1.0, 3, 1e6).unwrap();
        assert_eq!(series.frequencies, vec![2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_first_term_above_ceiling_gives_empty_series() {
        let series = generate_series(100.0, 2.0, 1.0, 10, 150.0).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            generate_series(0.0, 2.0, 1.0, 5, 100.0),
            Err(Error::InvalidInput { ref parameter, .. }) if parameter == "f0"
        ));
        assert!(matches!(
            generate_series(1.0, 1.0, 1.0, 5, 100.0),
            Err(Error::InvalidInput { ref parameter, .. }) if parameter == "r"
        ));
        assert!(matches!(
            generate_series(1.0, 2.0, 0.0, 5, 100.0),
            Err(Error::InvalidInput { ref parameter, .. }) if parameter == "k"
        ));
        assert!(generate_series(1.0, 2.0, 1.0, 5, 0.0).is_err());
    }

    #[test]
    fn test_extreme_k_stays_strictly_increasing() {
        let series = generate_series(10.0, 1.0001, 1e300, 50, 100.0).unwrap();
        assert!(series.frequencies.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_series_increasing_and_below_nyquist(
            f0 in 0.01f64..500.0,
            r in 1.0001f64..10.0,
            k in 0.01f64..50.0,
            max_candidates in 0usize..64,
            nyquist in 1.0f64..20_000.0,
        ) {
            let series = generate_series(f0, r, k, max_candidates, nyquist).unwrap();
            prop_assert!(series.len() <= max_candidates);
            prop_assert!(series.frequencies.iter().all(|&f| f <= nyquist));
            prop_assert!(series.frequencies.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
