// Spectrum Extractor
//
// Concept: Reduce a multichannel time series to one averaged amplitude spectrum
// Algorithm: Welch periodogram per channel (mean-removed, windowed segments,
// real FFT, segment-averaged power), amplitude-calibrated, averaged across
// channels.
//
// Per-segment complex spectra for cross-channel coherence come from
// `channel_spectra`, which takes its own segment length: coherence needs
// several averaged segments, the amplitude spectrum needs resolution.

use crate::extractors::window;
use crate::types::{Spectrum, TimeSeries};
use harmonia_common::config::SpectrumConfig;
use harmonia_common::{Error, Result};
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;
use tracing::debug;

/// Per-segment complex spectra for a subset of channels
///
/// Layout: `segments[channel][segment][bin]`. Every channel has the same
/// segment count and bin count.
#[derive(Debug, Clone, Default)]
pub struct ChannelSpectra {
    segments: Vec<Vec<Vec<Complex<f64>>>>,
    bin_width: f64,
}

impl ChannelSpectra {
    pub fn channel_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.first().map_or(0, Vec::len)
    }

    /// Frequency spacing of the segment bins in Hz
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Bin closest to `frequency`; may lie past the last bin
    pub fn bin_for(&self, frequency: f64) -> usize {
        if self.bin_width > 0.0 && frequency > 0.0 {
            (frequency / self.bin_width).round() as usize
        } else {
            0
        }
    }

    /// Segment spectra of one channel
    pub fn channel(&self, index: usize) -> &[Vec<Complex<f64>>] {
        &self.segments[index]
    }
}

/// Segment layout and FFT plan for one segment length
struct SegmentPlan {
    seg_len: usize,
    starts: Vec<usize>,
    taper: Vec<f64>,
    coherent_gain: f64,
    fft: Arc<dyn RealToComplex<f64>>,
}

impl SegmentPlan {
    fn bins(&self) -> usize {
        self.seg_len / 2 + 1
    }

    /// Windowed, mean-removed spectrum of every segment of one channel
    fn segment_spectra(&self, samples: &[f64]) -> Result<Vec<Vec<Complex<f64>>>> {
        let mut input = self.fft.make_input_vec();
        let mut spectra = Vec::with_capacity(self.starts.len());
        for &start in &self.starts {
            let segment = &samples[start..start + self.seg_len];
            let mean = segment.iter().sum::<f64>() / self.seg_len as f64;
            for ((slot, &x), &w) in input.iter_mut().zip(segment).zip(&self.taper) {
                *slot = (x - mean) * w;
            }
            let mut output = self.fft.make_output_vec();
            self.fft
                .process(&mut input, &mut output)
                .map_err(|e| Error::Internal(format!("FFT failed: {}", e)))?;
            spectra.push(output);
        }
        Ok(spectra)
    }
}

/// Welch-method spectrum extractor
///
/// Stateless apart from its configuration; an FFT planner is created per
/// call so concurrent extractions share nothing.
pub struct SpectrumExtractor {
    config: SpectrumConfig,
}

impl Default for SpectrumExtractor {
    fn default() -> Self {
        Self::new(SpectrumConfig::default())
    }
}

impl SpectrumExtractor {
    pub fn new(config: SpectrumConfig) -> Self {
        Self { config }
    }

    /// Segment length actually used for a series of `sample_count` samples
    pub fn effective_segment_length(&self, sample_count: usize) -> usize {
        self.config.segment_length.min(sample_count)
    }

    /// Number of segments of `seg_len` samples (with the configured overlap)
    /// that fit in `sample_count` samples
    pub fn segment_count(&self, sample_count: usize, seg_len: usize) -> usize {
        if seg_len == 0 || seg_len > sample_count {
            return 0;
        }
        (sample_count - seg_len) / self.hop(seg_len) + 1
    }

    fn hop(&self, seg_len: usize) -> usize {
        let noverlap = ((seg_len as f64) * self.config.overlap).floor() as usize;
        seg_len.saturating_sub(noverlap).max(1)
    }

    fn validate(series: &TimeSeries) -> Result<()> {
        let sample_count = series.sample_count();
        if sample_count < 2 {
            return Err(Error::invalid_input(
                "sample_count",
                sample_count,
                "at least 2 samples required",
            ));
        }
        let rate = series.sampling_rate();
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::invalid_input("sampling_rate", rate, "must be a finite value > 0"));
        }
        Ok(())
    }

    fn plan(&self, sample_count: usize, seg_len: usize) -> Result<SegmentPlan> {
        let hop = self.hop(seg_len);
        let starts: Vec<usize> = (0..=sample_count - seg_len).step_by(hop).collect();
        let taper = window::coefficients(self.config.window, seg_len);
        let coherent_gain: f64 = taper.iter().sum();
        if coherent_gain <= 0.0 {
            return Err(Error::Internal(format!(
                "window {:?} of length {} has no coherent gain",
                self.config.window, seg_len
            )));
        }
        let fft = RealFftPlanner::<f64>::new().plan_fft_forward(seg_len);
        Ok(SegmentPlan {
            seg_len,
            starts,
            taper,
            coherent_gain,
            fft,
        })
    }

    /// Extract the channel-averaged spectrum
    ///
    /// Phases come from the segment-summed spectrum of the first channel.
    ///
    /// # Errors
    /// `InvalidInput` for fewer than 2 samples or a non-positive sampling rate.
    pub fn extract(&self, series: &TimeSeries) -> Result<Spectrum> {
        Self::validate(series)?;
        let sample_count = series.sample_count();
        let rate = series.sampling_rate();
        let plan = self.plan(sample_count, self.effective_segment_length(sample_count))?;
        let seg_len = plan.seg_len;
        let n_bins = plan.bins();

        // Single-sided amplitude scale: DC (and Nyquist for even lengths)
        // are not doubled.
        let scale: Vec<f64> = (0..n_bins)
            .map(|k| {
                let single = k == 0 || (seg_len % 2 == 0 && k == seg_len / 2);
                if single {
                    1.0 / plan.coherent_gain
                } else {
                    2.0 / plan.coherent_gain
                }
            })
            .collect();

        let channel_count = series.channel_count();
        let mut amplitude_sum = vec![0.0f64; n_bins];
        let mut phase_acc = vec![Complex::new(0.0, 0.0); n_bins];

        for (ch_index, samples) in series.channels().iter().enumerate() {
            let segments = plan.segment_spectra(samples)?;
            let mut power = vec![0.0f64; n_bins];
            for output in &segments {
                for (p, bin) in power.iter_mut().zip(output) {
                    *p += bin.norm_sqr();
                }
                if ch_index == 0 {
                    for (acc, bin) in phase_acc.iter_mut().zip(output) {
                        *acc += *bin;
                    }
                }
            }

            let count = segments.len() as f64;
            for ((sum, p), s) in amplitude_sum.iter_mut().zip(&power).zip(&scale) {
                *sum += (p / count).sqrt() * s;
            }
        }

        let amplitudes: Vec<f64> = amplitude_sum
            .iter()
            .map(|a| a / channel_count as f64)
            .collect();
        let frequencies: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * rate / seg_len as f64)
            .collect();
        let phases: Vec<f64> = phase_acc.iter().map(|c| c.im.atan2(c.re)).collect();

        debug!(
            "Spectrum extracted: {} channels, {} segments of {} samples, {} bins ({:.4} Hz resolution)",
            channel_count,
            plan.starts.len(),
            seg_len,
            n_bins,
            rate / seg_len as f64
        );

        Spectrum::new(frequencies, amplitudes, Some(phases))
    }

    /// Segment spectra of the leading `channels` channels
    ///
    /// `segment_length` is clamped to the series length.
    ///
    /// # Errors
    /// Same input checks as [`extract`](Self::extract).
    pub fn channel_spectra(
        &self,
        series: &TimeSeries,
        channels: usize,
        segment_length: usize,
    ) -> Result<ChannelSpectra> {
        Self::validate(series)?;
        let sample_count = series.sample_count();
        let seg_len = segment_length.clamp(2, sample_count);
        let plan = self.plan(sample_count, seg_len)?;
        let segments = series
            .channels()
            .iter()
            .take(channels)
            .map(|samples| plan.segment_spectra(samples))
            .collect::<Result<Vec<_>>>()?;
        Ok(ChannelSpectra {
            segments,
            bin_width: series.sampling_rate() / seg_len as f64,
        })
    }
}
