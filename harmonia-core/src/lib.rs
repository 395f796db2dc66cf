//! # Harmonia Core
//!
//! Harmonic-pattern detection and classification.
//!
//! Given a multichannel time series (or a precomputed spectrum), the pipeline
//! builds a theoretical geometric frequency series f_n = f0 · r^(n/k),
//! matches observed spectral peaks against it, scores the match with several
//! independent signatures and classifies the result into an ordinal
//! [`PatternLevel`].
//!
//! ```rust,ignore
//! use harmonia_core::{AnalysisInput, HarmonicAnalyzer, TimeSeries};
//! use harmonia_common::AnalyzerConfig;
//!
//! let analyzer = HarmonicAnalyzer::new(AnalyzerConfig::default())?;
//! let series = TimeSeries::new(channels, 256.0)?;
//! let result = analyzer.analyze(&AnalysisInput::Signal(series), "subject-01")?;
//! println!("{} ({:.3})", result.level, result.score.composite_score);
//! ```

pub mod analyzer;
pub mod batch;
pub mod classifier;
pub mod extractors;
pub mod harmonics;
pub mod scoring;
pub mod types;
pub mod validators;

pub use analyzer::HarmonicAnalyzer;
pub use batch::{analyze_batch, BatchJob, BatchOutcome, BatchSummary};
pub use classifier::LevelClassifier;
pub use types::{
    AnalysisInput, ClassificationResult, HarmonicSeries, MatchedHarmonic, PatternScore, Spectrum,
    SpectrumInput, TimeSeries, ValidationCheck, ValidationReport, ValidationStatus,
};
pub use validators::Validator;

pub use harmonia_common::{Error, PatternLevel, Result};
