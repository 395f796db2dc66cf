//! Analyzer configuration
//!
//! All tunables of the pipeline live in [`AnalyzerConfig`], constructed by the
//! caller and handed to each analyzer instance. Nothing here touches the
//! filesystem: [`AnalyzerConfig::from_toml_str`] parses text the caller has
//! already obtained.
//!
//! Every table is optional in TOML; missing keys take the defaults below.
//!
//! ```toml
//! [series]
//! base_frequency = 8.0
//! depth_normalization = 7.0
//!
//! [classification]
//! complexity_thresholds = [2.0, 25.0, 400.0, 4000.0]
//! ```
//!
//! Several defaults (validator floors, complexity breakpoints) are opaque
//! calibration constants, not values derived from a model.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Golden ratio, the default scaling ratio
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Upper bound on `scoring.max_depth`; r^depth is computed with an i32 exponent
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Complete analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub spectrum: SpectrumConfig,
    pub series: SeriesConfig,
    pub matcher: MatcherConfig,
    pub scoring: ScoringConfig,
    pub coherence: CoherenceConfig,
    pub classification: ClassificationConfig,
    pub validation: ValidationConfig,
}

/// Taper applied to each periodogram segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Hann window: narrow main lobe, up to ~1.4 dB scalloping loss
    Hann,
    /// Five-term flat-top window: wide main lobe, amplitude-accurate
    FlatTop,
}

/// Welch periodogram settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Samples per segment (clamped to the series length when shorter)
    pub segment_length: usize,
    /// Fractional overlap between consecutive segments, in [0, 1)
    pub overlap: f64,
    pub window: WindowKind,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            segment_length: 1024,
            overlap: 0.5,
            window: WindowKind::FlatTop,
        }
    }
}

/// Theoretical series parameters: f_n = f0 · r^(n/k)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// f0 in Hz
    pub base_frequency: f64,
    /// r, must be > 1
    pub ratio: f64,
    /// k, must be > 0
    pub depth_normalization: f64,
    /// Upper bound on generated candidates before Nyquist truncation
    pub max_candidates: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            base_frequency: 8.0,
            ratio: GOLDEN_RATIO,
            depth_normalization: 1.0,
            max_candidates: 13,
        }
    }
}

/// Peak matching settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Maximum relative distance |observed - theoretical| / theoretical
    pub tolerance: f64,
    /// A matched bin must exceed this multiple of the median spectrum amplitude.
    /// Zero disables the gate (amplitudes must still be positive).
    pub noise_floor_ratio: f64,
    /// Spectra with fewer bins are treated as already peak-picked: no median
    /// floor and no climb from the nearest bin to its local maximum
    pub min_bins_for_peak_search: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            noise_floor_ratio: 3.0,
            min_bins_for_peak_search: 16,
        }
    }
}

/// Composite score and complexity index settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub ratio_weight: f64,
    pub reference_weight: f64,
    pub amplitude_weight: f64,
    /// Cap on the depth estimate derived from the matched count
    pub max_depth: usize,
    /// |x| below this makes the residual term degenerate
    pub residual_epsilon: f64,
    /// Fallback coupling = clamp(base + slope · depth, min, max)
    pub fallback_coupling_base: f64,
    pub fallback_coupling_slope: f64,
    pub fallback_coupling_min: f64,
    pub fallback_coupling_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ratio_weight: 0.4,
            reference_weight: 0.3,
            amplitude_weight: 0.3,
            max_depth: 13,
            residual_epsilon: 1e-12,
            fallback_coupling_base: 0.1,
            fallback_coupling_slope: 0.15,
            fallback_coupling_min: 0.1,
            fallback_coupling_max: 2.0,
        }
    }
}

/// Cross-channel coherence cost bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    /// Only the first N channels take part in pairwise coherence
    pub channel_pair_cap: usize,
    /// Only the first N matched harmonics are evaluated
    pub harmonic_cap: usize,
    /// Coherence segments are shortened (halving) until at least this many
    /// fit in the series. A single segment always has coherence 1.
    pub min_segments: usize,
    /// Halving stops at this length; below two segments coupling is not measured
    pub min_segment_length: usize,
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            channel_pair_cap: 10,
            harmonic_cap: 5,
            min_segments: 8,
            min_segment_length: 32,
        }
    }
}

/// Level breakpoints (ascending, closed-open intervals)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Breakpoints t1..t4 on the complexity index
    pub complexity_thresholds: [f64; 4],
    /// Breakpoints on the raw depth / matched count
    pub depth_thresholds: [usize; 4],
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            complexity_thresholds: [2.0, 25.0, 400.0, 4000.0],
            depth_thresholds: [2, 4, 6, 8],
        }
    }
}

/// Validator floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_composite: f64,
    pub min_reference: f64,
    pub min_harmonics: usize,
    pub min_ratio_coherence: f64,
    /// Reference correlation at or above this is "high" for the cross-check
    pub cross_check_reference: f64,
    /// Amplitude correlation below this is "low" for the cross-check
    pub cross_check_amplitude: f64,
    /// Percentage of checks passed for a `Pass` report
    pub pass_threshold: f64,
    /// Percentage of checks passed for a `Warning` report
    pub warning_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_composite: 0.5,
            min_reference: 0.5,
            min_harmonics: 3,
            min_ratio_coherence: 0.5,
            cross_check_reference: 0.7,
            cross_check_amplitude: 0.3,
            pass_threshold: 90.0,
            warning_threshold: 70.0,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a TOML document and validate the result
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its valid range
    ///
    /// Returns the first violation found as [`Error::Config`].
    pub fn validate(&self) -> Result<()> {
        let s = &self.spectrum;
        if s.segment_length < 2 {
            return Err(config_err("spectrum.segment_length", s.segment_length, "must be >= 2"));
        }
        if !(0.0..1.0).contains(&s.overlap) {
            return Err(config_err("spectrum.overlap", s.overlap, "out of range [0, 1)"));
        }

        let series = &self.series;
        positive("series.base_frequency", series.base_frequency)?;
        positive("series.depth_normalization", series.depth_normalization)?;
        if !series.ratio.is_finite() || series.ratio <= 1.0 {
            return Err(config_err("series.ratio", series.ratio, "must be > 1"));
        }
        if series.max_candidates == 0 {
            return Err(config_err("series.max_candidates", 0, "must be >= 1"));
        }

        let m = &self.matcher;
        if !m.tolerance.is_finite() || m.tolerance <= 0.0 || m.tolerance >= 1.0 {
            return Err(config_err("matcher.tolerance", m.tolerance, "out of range (0, 1)"));
        }
        non_negative("matcher.noise_floor_ratio", m.noise_floor_ratio)?;

        let sc = &self.scoring;
        non_negative("scoring.ratio_weight", sc.ratio_weight)?;
        non_negative("scoring.reference_weight", sc.reference_weight)?;
        non_negative("scoring.amplitude_weight", sc.amplitude_weight)?;
        positive("scoring.residual_epsilon", sc.residual_epsilon)?;
        if sc.max_depth == 0 || sc.max_depth > MAX_DEPTH_LIMIT {
            return Err(config_err(
                "scoring.max_depth",
                sc.max_depth,
                &format!("out of range [1, {}]", MAX_DEPTH_LIMIT),
            ));
        }
        if !(sc.fallback_coupling_min.is_finite()
            && sc.fallback_coupling_max.is_finite()
            && sc.fallback_coupling_min <= sc.fallback_coupling_max)
        {
            return Err(config_err(
                "scoring.fallback_coupling_min",
                sc.fallback_coupling_min,
                "must be finite and <= fallback_coupling_max",
            ));
        }
        if !sc.fallback_coupling_base.is_finite() || !sc.fallback_coupling_slope.is_finite() {
            return Err(config_err(
                "scoring.fallback_coupling_base",
                sc.fallback_coupling_base,
                "base and slope must be finite",
            ));
        }

        let co = &self.coherence;
        if co.min_segments < 2 {
            return Err(config_err("coherence.min_segments", co.min_segments, "must be >= 2"));
        }
        if co.min_segment_length < 2 {
            return Err(config_err(
                "coherence.min_segment_length",
                co.min_segment_length,
                "must be >= 2",
            ));
        }

        let c = &self.classification;
        if !c.complexity_thresholds.iter().all(|t| t.is_finite())
            || !c.complexity_thresholds.windows(2).all(|w| w[0] < w[1])
        {
            return Err(config_err(
                "classification.complexity_thresholds",
                format!("{:?}", c.complexity_thresholds),
                "must be finite and strictly ascending",
            ));
        }
        if !c.depth_thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(config_err(
                "classification.depth_thresholds",
                format!("{:?}", c.depth_thresholds),
                "must be strictly ascending",
            ));
        }

        let v = &self.validation;
        for (key, value) in [
            ("validation.min_composite", v.min_composite),
            ("validation.min_reference", v.min_reference),
            ("validation.min_ratio_coherence", v.min_ratio_coherence),
            ("validation.cross_check_reference", v.cross_check_reference),
            ("validation.cross_check_amplitude", v.cross_check_amplitude),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(config_err(key, value, "out of range [0.0, 1.0]"));
            }
        }
        if !(0.0..=100.0).contains(&v.pass_threshold) {
            return Err(config_err("validation.pass_threshold", v.pass_threshold, "out of range [0, 100]"));
        }
        if !(0.0..=v.pass_threshold).contains(&v.warning_threshold) {
            return Err(config_err(
                "validation.warning_threshold",
                v.warning_threshold,
                "must be in [0, pass_threshold]",
            ));
        }

        Ok(())
    }
}

fn config_err(key: &str, value: impl std::fmt::Display, reason: &str) -> Error {
    Error::Config(format!("{}: value {} {}", key, value, reason))
}

fn positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(config_err(key, value, "must be > 0"))
    }
}

fn non_negative(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(config_err(key, value, "must be >= 0"))
    }
}
