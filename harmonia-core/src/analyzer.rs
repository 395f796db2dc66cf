//! Pipeline entry point
//!
//! [`HarmonicAnalyzer::analyze`] runs one input through every stage:
//!
//! ```text
//! AnalysisInput ──► SpectrumExtractor ──► series + HarmonicMatcher
//!                                              │
//!              CorrelationScorer + CoherenceAnalyzer
//!                                              │
//!              CompositeScoreAggregator ──► LevelClassifier + Validator
//!                                              │
//!                                     ClassificationResult
//! ```
//!
//! The analyzer owns only immutable configuration and a shared audit sink,
//! so one instance can serve any number of threads.

use crate::classifier::LevelClassifier;
use crate::extractors::{window, ChannelSpectra, SpectrumExtractor};
use crate::harmonics::{generate_from_config, HarmonicMatcher};
use crate::scoring::{score_amplitudes, CoherenceAnalyzer, CompositeScoreAggregator, CorrelationScores};
use crate::types::{
    AnalysisInput, ClassificationResult, MatchedHarmonic, PatternScore, Spectrum, SpectrumInput,
    TimeSeries,
};
use crate::validators::Validator;
use chrono::Utc;
use harmonia_common::{AnalysisEvent, AnalyzerConfig, AuditSink, NoopSink, PatternLevel, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Harmonic-pattern analyzer
pub struct HarmonicAnalyzer {
    config: AnalyzerConfig,
    extractor: SpectrumExtractor,
    matcher: HarmonicMatcher,
    coherence: CoherenceAnalyzer,
    aggregator: CompositeScoreAggregator,
    classifier: LevelClassifier,
    validator: Validator,
    sink: Arc<dyn AuditSink>,
}

/// Stage outputs shared by the signal and spectrum paths
struct ScoredMatch {
    matched: Vec<MatchedHarmonic>,
    score: PatternScore,
}

impl HarmonicAnalyzer {
    /// Create an analyzer that discards audit events
    ///
    /// # Errors
    /// `Config` if the configuration fails validation.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(NoopSink))
    }

    /// Create an analyzer reporting to `sink`
    pub fn with_sink(config: AnalyzerConfig, sink: Arc<dyn AuditSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: SpectrumExtractor::new(config.spectrum.clone()),
            matcher: HarmonicMatcher::new(config.matcher.clone()),
            coherence: CoherenceAnalyzer::new(config.coherence.clone()),
            aggregator: CompositeScoreAggregator::new(config.scoring.clone()),
            classifier: LevelClassifier::new(config.classification.clone()),
            validator: Validator::new(config.validation.clone()),
            config,
            sink,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one input
    ///
    /// Deterministic: the same input and configuration always produce the
    /// same result. Numeric degeneracies lower the scores and show up in the
    /// validator messages; only malformed input is an error.
    ///
    /// # Errors
    /// `InvalidInput` for series shorter than 2 samples or a ceiling
    /// frequency that is not positive.
    pub fn analyze(&self, input: &AnalysisInput, subject_id: &str) -> Result<ClassificationResult> {
        debug!(subject_id, input_kind = input.kind(), "Analysis started");
        self.sink.record(&AnalysisEvent::AnalysisStarted {
            subject_id: subject_id.to_string(),
            input_kind: input.kind().to_string(),
            timestamp: Utc::now(),
        });

        let outcome = match input {
            AnalysisInput::Signal(series) => self.analyze_signal(series, subject_id),
            AnalysisInput::Spectrum(spectrum) => self.analyze_spectrum(spectrum, subject_id),
            AnalysisInput::Depth(depth) => Ok(self.analyze_depth(*depth, subject_id)),
        };

        match outcome {
            Ok(result) => {
                let failed_checks = result.validation.failures().count();
                info!(
                    subject_id,
                    level = %result.level,
                    matched = result.matched_count(),
                    composite = result.score.composite_score,
                    complexity = result.score.complexity_index,
                    failed_checks,
                    "Analysis complete"
                );
                self.sink.record(&AnalysisEvent::AnalysisCompleted {
                    subject_id: subject_id.to_string(),
                    level: result.level,
                    composite_score: result.score.composite_score,
                    complexity_index: result.score.complexity_index,
                    failed_checks,
                    timestamp: Utc::now(),
                });
                Ok(result)
            }
            Err(e) => {
                warn!(subject_id, error = %e, "Analysis rejected input");
                self.sink.record(&AnalysisEvent::AnalysisFailed {
                    subject_id: subject_id.to_string(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    fn analyze_signal(&self, series: &TimeSeries, subject_id: &str) -> Result<ClassificationResult> {
        let spectrum = self.extractor.extract(series)?;
        let seg_len = self.extractor.effective_segment_length(series.sample_count());
        let separation = window::main_lobe_half_width(self.config.spectrum.window)
            * series.sampling_rate()
            / seg_len as f64;
        let channel_spectra = if series.channel_count() >= 2 {
            self.coherence.segment_spectra(&self.extractor, series)?
        } else {
            None
        };
        let scored = self.score_spectrum(
            &spectrum,
            series.nyquist(),
            Some(separation),
            channel_spectra.as_ref(),
            subject_id,
        )?;
        Ok(self.finish(subject_id, scored, |score| {
            self.classifier.classify_complexity(score.complexity_index)
        }))
    }

    fn analyze_spectrum(&self, input: &SpectrumInput, subject_id: &str) -> Result<ClassificationResult> {
        let scored = self.score_spectrum(&input.spectrum, input.ceiling(), None, None, subject_id)?;
        Ok(self.finish(subject_id, scored, |score| {
            self.classifier.classify_complexity(score.complexity_index)
        }))
    }

    fn analyze_depth(&self, depth: usize, subject_id: &str) -> ClassificationResult {
        let score = self.aggregator.aggregate(
            &CorrelationScores::default(),
            depth,
            self.config.series.ratio,
            None,
        );
        let scored = ScoredMatch {
            matched: Vec::new(),
            score,
        };
        self.finish(subject_id, scored, |_| self.classifier.classify_depth(depth))
    }

    /// Series generation, matching, correlation, coherence and aggregation
    ///
    /// `separation` is the closest spacing (Hz) at which two tones still
    /// show as separate peaks in `spectrum`.
    fn score_spectrum(
        &self,
        spectrum: &Spectrum,
        ceiling: f64,
        separation: Option<f64>,
        channel_spectra: Option<&ChannelSpectra>,
        subject_id: &str,
    ) -> Result<ScoredMatch> {
        let series = generate_from_config(&self.config.series, ceiling)?;
        if let (Some(separation), Some(spacing)) = (separation, series.min_spacing()) {
            if spacing < separation {
                warn!(
                    subject_id,
                    spacing,
                    separation,
                    "Spectral resolution too coarse to separate adjacent harmonic candidates"
                );
            }
        }
        let matched = self.matcher.match_series(&series, spectrum);
        self.sink.record(&AnalysisEvent::HarmonicsMatched {
            subject_id: subject_id.to_string(),
            candidates: series.len(),
            matched: matched.len(),
            timestamp: Utc::now(),
        });

        if matched.len() < 2 {
            let detail = format!(
                "{} of {} harmonics matched; correlation signatures set to 0",
                matched.len(),
                series.len()
            );
            warn!(subject_id, "{}", detail);
            self.sink.record(&AnalysisEvent::DegenerateInput {
                subject_id: subject_id.to_string(),
                detail,
                timestamp: Utc::now(),
            });
        }

        let amplitudes: Vec<f64> = matched.iter().map(|m| m.amplitude).collect();
        let scores = score_amplitudes(&amplitudes, self.config.series.ratio);
        debug!(
            subject_id,
            ratio_coherence = scores.ratio_coherence,
            reference = scores.reference_correlation,
            amplitude = scores.amplitude_correlation,
            "Correlation signatures"
        );

        let field_coupling = channel_spectra.map(|spectra| {
            let frequencies: Vec<f64> = matched.iter().map(|m| m.observed_frequency).collect();
            self.coherence.field_coupling(spectra, &frequencies, scores.ratio_coherence)
        });

        let score = self.aggregator.aggregate(
            &scores,
            matched.len(),
            self.config.series.ratio,
            field_coupling,
        );
        Ok(ScoredMatch { matched, score })
    }

    fn finish(
        &self,
        subject_id: &str,
        scored: ScoredMatch,
        classify: impl FnOnce(&PatternScore) -> PatternLevel,
    ) -> ClassificationResult {
        let level = classify(&scored.score);
        let validation = self.validator.validate(&scored.score, scored.matched.len());
        let messages = Validator::messages(&validation);
        ClassificationResult {
            subject_id: subject_id.to_string(),
            level,
            score: scored.score,
            matched_harmonics: scored.matched,
            messages,
            validation,
        }
    }
}
