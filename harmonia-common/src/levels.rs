//! Ordinal pattern levels
//!
//! Five ordered categories produced by the level classifiers. The ordering
//! is meaningful (`Level0 < Level4`); the labels are descriptive only.

use serde::{Deserialize, Serialize};

/// Ordinal classification level
///
/// Derives `Ord` so callers can compare levels directly:
/// `PatternLevel::Level2 > PatternLevel::Level1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternLevel {
    /// No usable harmonic structure
    Level0,
    /// Weak structure
    Level1,
    /// Moderate structure
    Level2,
    /// Strong structure
    Level3,
    /// Dominant structure
    Level4,
}

impl PatternLevel {
    /// All levels in ascending order
    pub const ALL: [PatternLevel; 5] = [
        PatternLevel::Level0,
        PatternLevel::Level1,
        PatternLevel::Level2,
        PatternLevel::Level3,
        PatternLevel::Level4,
    ];

    /// Zero-based ordinal index
    pub fn index(self) -> usize {
        match self {
            PatternLevel::Level0 => 0,
            PatternLevel::Level1 => 1,
            PatternLevel::Level2 => 2,
            PatternLevel::Level3 => 3,
            PatternLevel::Level4 => 4,
        }
    }

    /// Level for a zero-based index, saturating at `Level4`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Short human-readable label
    pub fn label(self) -> &'static str {
        match self {
            PatternLevel::Level0 => "absent",
            PatternLevel::Level1 => "weak",
            PatternLevel::Level2 => "moderate",
            PatternLevel::Level3 => "strong",
            PatternLevel::Level4 => "dominant",
        }
    }
}

impl std::fmt::Display for PatternLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "level{} ({})", self.index(), self.label())
    }
}
