// Level Classifier
//
// Maps a scalar onto five ordinal levels using four ascending breakpoints:
//   value < t1        -> Level0
//   t1 <= value < t2  -> Level1
//   ...
//   value >= t4       -> Level4
// A value equal to a breakpoint belongs to the level that starts there.

use harmonia_common::config::ClassificationConfig;
use harmonia_common::PatternLevel;

/// Threshold classifier for complexity indices and depths
#[derive(Debug, Clone, Default)]
pub struct LevelClassifier {
    config: ClassificationConfig,
}

impl LevelClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    /// Level for a complexity index; NaN maps to `Level0`
    pub fn classify_complexity(&self, complexity: f64) -> PatternLevel {
        if complexity.is_nan() {
            return PatternLevel::Level0;
        }
        let passed = self
            .config
            .complexity_thresholds
            .iter()
            .take_while(|&&t| complexity >= t)
            .count();
        PatternLevel::from_index(passed)
    }

    /// Level for a raw depth or matched-harmonic count
    pub fn classify_depth(&self, depth: usize) -> PatternLevel {
        let passed = self
            .config
            .depth_thresholds
            .iter()
            .take_while(|&&t| depth >= t)
            .count();
        PatternLevel::from_index(passed)
    }
}
