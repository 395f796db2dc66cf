//! Stage 2: Theoretical Series and Peak Matching
//!
//! - **series** - geometric series f_n = f0 · r^(n/k), bounded by Nyquist
//! - **matcher** - nearest-bin matching within a relative tolerance

pub mod matcher;
pub mod series;

pub use matcher::HarmonicMatcher;
pub use series::{generate_from_config, generate_series};
