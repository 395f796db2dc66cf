// Harmonic Matcher
//
// Pairs each theoretical frequency with an observed spectral peak.
// For dense spectra the nearest bin is only a starting point: the matcher
// climbs to the local maximum it sits on, so the skirt of a neighbouring
// peak resolves to that peak instead of counting as a harmonic of its own.
// The peak bin is accepted when:
// 1. its relative distance to the theoretical frequency is within tolerance,
// 2. its amplitude stands above the spectrum's noise floor,
// 3. no lower harmonic already claimed it.
// Short spectra are taken as already peak-picked and matched bin-for-bin.
// Rejected entries are dropped; the result is never zero-padded.

use crate::types::{HarmonicSeries, MatchedHarmonic, Spectrum};
use harmonia_common::config::MatcherConfig;
use tracing::debug;

/// Tolerance-windowed peak matcher
pub struct HarmonicMatcher {
    config: MatcherConfig,
}

impl Default for HarmonicMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl HarmonicMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    fn is_dense(&self, spectrum: &Spectrum) -> bool {
        spectrum.len() >= self.config.min_bins_for_peak_search
    }

    /// Amplitude a bin must exceed to count as an observed peak
    ///
    /// `noise_floor_ratio` × median amplitude for spectra with at least
    /// `min_bins_for_peak_search` bins; 0 for shorter (already peak-picked)
    /// spectra.
    pub fn noise_floor(&self, spectrum: &Spectrum) -> f64 {
        if !self.is_dense(spectrum) {
            return 0.0;
        }
        spectrum.median_amplitude() * self.config.noise_floor_ratio
    }

    /// Bin of the peak nearest to `frequency`
    ///
    /// Dense spectra climb from the nearest bin toward the larger neighbour
    /// until neither neighbour is strictly larger.
    pub fn peak_bin(&self, spectrum: &Spectrum, frequency: f64) -> usize {
        let mut bin = spectrum.nearest_bin(frequency);
        if !self.is_dense(spectrum) {
            return bin;
        }
        let amplitudes = spectrum.amplitudes();
        loop {
            let left = bin.checked_sub(1).filter(|&b| amplitudes[b] > amplitudes[bin]);
            let right = Some(bin + 1)
                .filter(|&b| b < amplitudes.len() && amplitudes[b] > amplitudes[bin]);
            bin = match (left, right) {
                (Some(l), Some(r)) => {
                    if amplitudes[r] > amplitudes[l] {
                        r
                    } else {
                        l
                    }
                }
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (None, None) => return bin,
            };
        }
    }

    /// Match a theoretical series against a spectrum
    ///
    /// Returns matches in ascending harmonic order, possibly empty.
    pub fn match_series(&self, series: &HarmonicSeries, spectrum: &Spectrum) -> Vec<MatchedHarmonic> {
        let floor = self.noise_floor(spectrum);
        let frequencies = spectrum.frequencies();
        let amplitudes = spectrum.amplitudes();
        let phases = spectrum.phases();

        let mut matched = Vec::with_capacity(series.len());
        let mut claimed: Vec<usize> = Vec::with_capacity(series.len());
        let mut out_of_tolerance = 0usize;
        let mut below_floor = 0usize;

        for (i, &theoretical) in series.frequencies.iter().enumerate() {
            let bin = self.peak_bin(spectrum, theoretical);
            let observed = frequencies[bin];
            if (observed - theoretical).abs() / theoretical > self.config.tolerance {
                out_of_tolerance += 1;
                continue;
            }
            let amplitude = amplitudes[bin];
            if amplitude <= floor || amplitude <= 0.0 {
                below_floor += 1;
                continue;
            }
            if claimed.contains(&bin) {
                continue;
            }
            claimed.push(bin);
            matched.push(MatchedHarmonic {
                index: i + 1,
                theoretical_frequency: theoretical,
                observed_frequency: observed,
                amplitude,
                phase: phases.map(|p| p[bin]),
            });
        }

        debug!(
            "Matched {}/{} harmonics (floor={:.3e}, {} out of tolerance, {} below floor)",
            matched.len(),
            series.len(),
            floor,
            out_of_tolerance,
            below_floor
        );

        matched
    }
}
