//! Stage 1: Spectral Extraction
//!
//! Turns a raw multichannel [`TimeSeries`](crate::types::TimeSeries) into the
//! single averaged [`Spectrum`](crate::types::Spectrum) the rest of the
//! pipeline works on.
//!
//! # Architecture
//! - **Stage 1:** Extract a spectrum from the signal (THIS MODULE)
//! - **Stage 2:** Generate and match the theoretical harmonic series
//! - **Stage 3:** Score, classify and validate the match

pub mod spectrum_extractor;
pub mod window;

pub use spectrum_extractor::{ChannelSpectra, SpectrumExtractor};
