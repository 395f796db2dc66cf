// Cross-Channel Coherence
//
// field_coupling = mean over harmonic frequencies of (mean over channel pairs
// of the magnitude-squared coherence), multiplied by ratio coherence.
//
// MSC for channels x, y at bin b, from the Welch segments s:
//   |Σ_s X_s[b] · conj(Y_s[b])|² / (Σ_s |X_s[b]|² · Σ_s |Y_s[b]|²)
//
// With a single segment the ratio is identically 1, so coherence runs on its
// own segment length: the spectrum segment length, halved until at least
// `min_segments` segments fit. Fewer than two segments leaves the coupling
// unmeasured.
//
// A pair whose auto-power is zero at a bin contributes 0 for that bin.

use crate::extractors::{ChannelSpectra, SpectrumExtractor};
use crate::types::TimeSeries;
use harmonia_common::config::CoherenceConfig;
use harmonia_common::Result;
use realfft::num_complex::Complex;
use tracing::debug;

/// Cross-channel coupling estimator
pub struct CoherenceAnalyzer {
    config: CoherenceConfig,
}

impl Default for CoherenceAnalyzer {
    fn default() -> Self {
        Self::new(CoherenceConfig::default())
    }
}

impl CoherenceAnalyzer {
    pub fn new(config: CoherenceConfig) -> Self {
        Self { config }
    }

    /// Segment length for coherence over `sample_count` samples
    ///
    /// Starts from the extractor's segment length and halves it while fewer
    /// than `min_segments` segments fit and the half is still at least
    /// `min_segment_length`. `None` when even the shortest length gives fewer
    /// than two segments.
    pub fn segment_length(
        &self,
        extractor: &SpectrumExtractor,
        sample_count: usize,
    ) -> Option<usize> {
        let mut seg_len = extractor.effective_segment_length(sample_count);
        while extractor.segment_count(sample_count, seg_len) < self.config.min_segments
            && seg_len / 2 >= self.config.min_segment_length
        {
            seg_len /= 2;
        }
        (extractor.segment_count(sample_count, seg_len) >= 2).then_some(seg_len)
    }

    /// Segment spectra of the leading `channel_pair_cap` channels
    ///
    /// `Ok(None)` when the series is too short for two segments.
    pub fn segment_spectra(
        &self,
        extractor: &SpectrumExtractor,
        series: &TimeSeries,
    ) -> Result<Option<ChannelSpectra>> {
        let Some(seg_len) = self.segment_length(extractor, series.sample_count()) else {
            debug!(
                "Series of {} samples too short for coherence segments",
                series.sample_count()
            );
            return Ok(None);
        };
        let channels = series.channel_count().min(self.config.channel_pair_cap);
        extractor.channel_spectra(series, channels, seg_len).map(Some)
    }

    /// Field coupling at the given harmonic frequencies
    ///
    /// Only the first `channel_pair_cap` channels and first `harmonic_cap`
    /// frequencies take part. Returns 0.0 for fewer than two channels or no
    /// frequencies.
    pub fn field_coupling(
        &self,
        spectra: &ChannelSpectra,
        harmonic_frequencies: &[f64],
        ratio_coherence: f64,
    ) -> f64 {
        let channels = spectra.channel_count().min(self.config.channel_pair_cap);
        let frequencies =
            &harmonic_frequencies[..harmonic_frequencies.len().min(self.config.harmonic_cap)];
        if channels < 2 || frequencies.is_empty() || spectra.segment_count() == 0 {
            return 0.0;
        }

        let mut per_bin = Vec::with_capacity(frequencies.len());
        for &frequency in frequencies {
            let bin = spectra.bin_for(frequency);
            let mut total = 0.0;
            let mut pairs = 0usize;
            for a in 0..channels {
                for b in (a + 1)..channels {
                    total += magnitude_squared_coherence(spectra.channel(a), spectra.channel(b), bin);
                    pairs += 1;
                }
            }
            per_bin.push(total / pairs as f64);
        }

        let mean_coherence = per_bin.iter().sum::<f64>() / per_bin.len() as f64;
        debug!(
            "Coherence over {} channels, {} segments, {} harmonics: mean MSC {:.4}",
            channels,
            spectra.segment_count(),
            frequencies.len(),
            mean_coherence
        );

        let coupling = mean_coherence * ratio_coherence;
        if coupling.is_finite() {
            coupling.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Magnitude-squared coherence of two channels at one bin
///
/// Out-of-range bins and zero auto-power both give 0.
pub fn magnitude_squared_coherence(
    x_segments: &[Vec<Complex<f64>>],
    y_segments: &[Vec<Complex<f64>>],
    bin: usize,
) -> f64 {
    let mut cross = Complex::new(0.0, 0.0);
    let mut power_x = 0.0;
    let mut power_y = 0.0;
    for (x, y) in x_segments.iter().zip(y_segments) {
        let (Some(xb), Some(yb)) = (x.get(bin), y.get(bin)) else {
            return 0.0;
        };
        cross += *xb * yb.conj();
        power_x += xb.norm_sqr();
        power_y += yb.norm_sqr();
    }
    let denominator = power_x * power_y;
    if denominator <= f64::MIN_POSITIVE {
        return 0.0;
    }
    (cross.norm_sqr() / denominator).clamp(0.0, 1.0)
}
