//! Stage 3a: Scoring
//!
//! - **correlation** - ratio coherence, reference and amplitude correlation
//! - **coherence** - cross-channel magnitude-squared coherence (field coupling)
//! - **composite** - weighted composite score and complexity index

pub mod coherence;
pub mod composite;
pub mod correlation;

pub use coherence::CoherenceAnalyzer;
pub use composite::{residual, CompositeScoreAggregator, Residual};
pub use correlation::{score_amplitudes, CorrelationScores};
