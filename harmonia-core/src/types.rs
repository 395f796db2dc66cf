// Shared Types and Data Contracts
//
// Each stage of the pipeline consumes and produces one of the types below.
// Inputs (TimeSeries, SpectrumInput) are immutable once constructed; every
// intermediate value is owned by a single `analyze` call.

use harmonia_common::{Error, PatternLevel, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Inputs
// ============================================================================

/// Multichannel sampled signal
///
/// Fields are private so a constructed series can't be reshaped afterwards.
/// Length is not checked here; the spectrum extractor rejects series that are
/// too short to analyse.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    channels: Vec<Vec<f64>>,
    sampling_rate: f64,
}

impl TimeSeries {
    /// Build a series from per-channel sample buffers
    ///
    /// # Errors
    /// `InvalidInput` when there are no channels, channels differ in length,
    /// a sample is not finite, or `sampling_rate` is not a positive number.
    pub fn new(channels: Vec<Vec<f64>>, sampling_rate: f64) -> Result<Self> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(Error::invalid_input(
                "sampling_rate",
                sampling_rate,
                "must be a finite value > 0",
            ));
        }
        if channels.is_empty() {
            return Err(Error::invalid_input("channel_count", 0, "at least one channel required"));
        }
        let expected = channels[0].len();
        if let Some((i, ch)) = channels.iter().enumerate().find(|(_, ch)| ch.len() != expected) {
            return Err(Error::invalid_input(
                format!("channels[{}].len", i),
                ch.len(),
                format!("all channels must have {} samples", expected),
            ));
        }
        for (i, ch) in channels.iter().enumerate() {
            if let Some(j) = ch.iter().position(|v| !v.is_finite()) {
                return Err(Error::invalid_input(
                    format!("channels[{}][{}]", i, j),
                    ch[j],
                    "samples must be finite",
                ));
            }
        }
        Ok(Self {
            channels,
            sampling_rate,
        })
    }

    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }
}

/// Frequency/amplitude spectrum
///
/// Invariants: frequencies strictly increasing and finite, amplitudes finite
/// and non-negative, phases (when present) one per frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    amplitudes: Vec<f64>,
    phases: Option<Vec<f64>>,
}

impl Spectrum {
    pub fn new(
        frequencies: Vec<f64>,
        amplitudes: Vec<f64>,
        phases: Option<Vec<f64>>,
    ) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::invalid_input("frequencies.len", 0, "spectrum must not be empty"));
        }
        if amplitudes.len() != frequencies.len() {
            return Err(Error::invalid_input(
                "amplitudes.len",
                amplitudes.len(),
                format!("must equal frequencies.len ({})", frequencies.len()),
            ));
        }
        if let Some(ref p) = phases {
            if p.len() != frequencies.len() {
                return Err(Error::invalid_input(
                    "phases.len",
                    p.len(),
                    format!("must equal frequencies.len ({})", frequencies.len()),
                ));
            }
        }
        if let Some(i) = frequencies.iter().position(|f| !f.is_finite() || *f < 0.0) {
            return Err(Error::invalid_input(
                format!("frequencies[{}]", i),
                frequencies[i],
                "must be finite and >= 0",
            ));
        }
        if let Some(i) = frequencies.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::invalid_input(
                format!("frequencies[{}]", i + 1),
                frequencies[i + 1],
                "frequencies must be strictly increasing",
            ));
        }
        if let Some(i) = amplitudes.iter().position(|a| !a.is_finite() || *a < 0.0) {
            return Err(Error::invalid_input(
                format!("amplitudes[{}]", i),
                amplitudes[i],
                "must be finite and >= 0",
            ));
        }
        Ok(Self {
            frequencies,
            amplitudes,
            phases,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn phases(&self) -> Option<&[f64]> {
        self.phases.as_deref()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Always false for a constructed spectrum; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Highest frequency present
    pub fn max_frequency(&self) -> f64 {
        self.frequencies.last().copied().unwrap_or(0.0)
    }

    /// Index of the bin closest to `frequency` (lower bin wins ties)
    pub fn nearest_bin(&self, frequency: f64) -> usize {
        let upper = self.frequencies.partition_point(|&f| f < frequency);
        if upper == 0 {
            return 0;
        }
        if upper == self.frequencies.len() {
            return upper - 1;
        }
        let below = frequency - self.frequencies[upper - 1];
        let above = self.frequencies[upper] - frequency;
        if above < below {
            upper
        } else {
            upper - 1
        }
    }

    /// Median amplitude (upper median for even lengths)
    pub fn median_amplitude(&self) -> f64 {
        let mut sorted = self.amplitudes.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted[sorted.len() / 2]
    }
}

/// Precomputed spectrum supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumInput {
    pub spectrum: Spectrum,
    /// Only used to bound the theoretical series; without it the highest
    /// spectrum frequency is the ceiling.
    pub sampling_rate: Option<f64>,
}

impl SpectrumInput {
    /// Validate a frequency/amplitude pair
    pub fn new(frequencies: Vec<f64>, amplitudes: Vec<f64>) -> Result<Self> {
        Ok(Self {
            spectrum: Spectrum::new(frequencies, amplitudes, None)?,
            sampling_rate: None,
        })
    }

    /// Attach per-frequency phases
    pub fn with_phases(self, phases: Vec<f64>) -> Result<Self> {
        let Spectrum {
            frequencies,
            amplitudes,
            ..
        } = self.spectrum;
        Ok(Self {
            spectrum: Spectrum::new(frequencies, amplitudes, Some(phases))?,
            sampling_rate: self.sampling_rate,
        })
    }

    /// Attach the sampling rate the spectrum was computed at
    pub fn with_sampling_rate(mut self, sampling_rate: f64) -> Result<Self> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(Error::invalid_input(
                "sampling_rate",
                sampling_rate,
                "must be a finite value > 0",
            ));
        }
        self.sampling_rate = Some(sampling_rate);
        Ok(self)
    }

    /// Upper bound for theoretical frequencies
    pub fn ceiling(&self) -> f64 {
        match self.sampling_rate {
            Some(rate) => rate / 2.0,
            None => self.spectrum.max_frequency(),
        }
    }
}

/// Everything `analyze` accepts
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    /// Raw multichannel signal; enables cross-channel coherence
    Signal(TimeSeries),
    /// Precomputed frequency/amplitude spectrum
    Spectrum(SpectrumInput),
    /// Pre-estimated recursion depth, classified without any spectrum
    Depth(usize),
}

impl AnalysisInput {
    /// Short name used in logs and audit events
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisInput::Signal(_) => "signal",
            AnalysisInput::Spectrum(_) => "spectrum",
            AnalysisInput::Depth(_) => "depth",
        }
    }
}

// ============================================================================
// Intermediate Results
// ============================================================================

/// Theoretical geometric series f_n = f0 · r^(n/k), n = 1..=N
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicSeries {
    pub base_frequency: f64,
    pub ratio: f64,
    pub depth_normalization: f64,
    /// Strictly increasing, all at or below the ceiling used to build them
    pub frequencies: Vec<f64>,
}

impl HarmonicSeries {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Smallest gap between adjacent candidates in Hz
    pub fn min_spacing(&self) -> Option<f64> {
        self.frequencies
            .windows(2)
            .map(|w| w[1] - w[0])
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Theoretical frequency paired with the spectral bin that matched it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedHarmonic {
    /// n in f_n (1-based)
    pub index: usize,
    pub theoretical_frequency: f64,
    pub observed_frequency: f64,
    pub amplitude: f64,
    pub phase: Option<f64>,
}

impl MatchedHarmonic {
    /// |observed - theoretical| / theoretical
    pub fn relative_error(&self) -> f64 {
        (self.observed_frequency - self.theoretical_frequency).abs() / self.theoretical_frequency
    }
}

/// Scalar signatures for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternScore {
    /// [0, 1]
    pub ratio_coherence: f64,
    /// [0, 1]
    pub reference_correlation: f64,
    /// [0, 1]
    pub amplitude_correlation: f64,
    /// Weighted blend of the three signatures, [0, 1]
    pub composite_score: f64,
    /// Unbounded, >= 0
    pub complexity_index: f64,
    /// Cross-channel coupling, present only for multichannel signal input
    pub field_coupling: Option<f64>,
    /// Depth estimate that fed the complexity index
    pub depth: usize,
}

impl PatternScore {
    /// All-zero score
    pub fn neutral() -> Self {
        Self {
            ratio_coherence: 0.0,
            reference_correlation: 0.0,
            amplitude_correlation: 0.0,
            composite_score: 0.0,
            complexity_index: 0.0,
            field_coupling: None,
            depth: 0,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Individual validation check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub score: Option<f64>,
    pub message: Option<String>,
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pass,
    Warning,
    Fail,
    Pending,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "Pass"),
            ValidationStatus::Warning => write!(f, "Warning"),
            ValidationStatus::Fail => write!(f, "Fail"),
            ValidationStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// Outcome of the validator battery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    /// Passed checks as a percentage (0-100)
    pub quality_score: f64,
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// Checks that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

// ============================================================================
// Output
// ============================================================================

/// Result of one `analyze` call
///
/// Contains no timestamps or random identifiers: identical input and
/// configuration always produce an identical result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub subject_id: String,
    pub level: PatternLevel,
    pub score: PatternScore,
    pub matched_harmonics: Vec<MatchedHarmonic>,
    /// Failure messages, or the single all-passed sentinel
    pub messages: Vec<String>,
    pub validation: ValidationReport,
}

impl ClassificationResult {
    pub fn matched_count(&self) -> usize {
        self.matched_harmonics.len()
    }

    /// Serialize for downstream report collaborators
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
