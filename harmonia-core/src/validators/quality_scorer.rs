// Quality Scorer - roll individual checks up into a report status
//
// quality = passed / total × 100; the status bands come from ValidationConfig.

use crate::types::{ValidationCheck, ValidationStatus};
use harmonia_common::config::ValidationConfig;

/// Status band for a quality percentage
pub fn status_for(quality_score: f64, config: &ValidationConfig) -> ValidationStatus {
    if quality_score >= config.pass_threshold {
        ValidationStatus::Pass
    } else if quality_score >= config.warning_threshold {
        ValidationStatus::Warning
    } else {
        ValidationStatus::Fail
    }
}

/// Percentage of passed checks and the matching status
///
/// An empty check list is `Pending` with score 0.
pub fn calculate_quality_score(
    checks: &[ValidationCheck],
    config: &ValidationConfig,
) -> (f64, ValidationStatus) {
    if checks.is_empty() {
        return (0.0, ValidationStatus::Pending);
    }
    let passed = checks.iter().filter(|c| c.passed).count();
    let quality_score = passed as f64 * 100.0 / checks.len() as f64;
    (quality_score, status_for(quality_score, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(passed: &[bool]) -> Vec<ValidationCheck> {
        passed
            .iter()
            .map(|&passed| ValidationCheck {
                name: "Check".to_string(),
                passed,
                score: None,
                message: (!passed).then(|| "Failed".to_string()),
            })
            .collect()
    }

    #[test]
    fn test_default_bands() {
        let config = ValidationConfig::default();
        let (score, status) = calculate_quality_score(&checks(&[true, true]), &config);
        assert_eq!((score, status), (100.0, ValidationStatus::Pass));

        let (score, status) = calculate_quality_score(&checks(&[true, true, true, false]), &config);
        assert_eq!((score, status), (75.0, ValidationStatus::Warning));

        let (score, status) = calculate_quality_score(&checks(&[true, false, true]), &config);
        assert!((score - 66.67).abs() < 0.1);
        assert_eq!(status, ValidationStatus::Fail);
    }

    #[test]
    fn test_band_edges_inclusive() {
        let config = ValidationConfig::default();
        assert_eq!(status_for(90.0, &config), ValidationStatus::Pass);
        assert_eq!(status_for(89.9, &config), ValidationStatus::Warning);
        assert_eq!(status_for(70.0, &config), ValidationStatus::Warning);
        assert_eq!(status_for(69.9, &config), ValidationStatus::Fail);
    }

    #[test]
    fn test_configured_bands() {
        // 4 of 5 checks: Warning by default, Pass with a lenient pass band
        let lenient = ValidationConfig {
            pass_threshold: 80.0,
            warning_threshold: 50.0,
            ..ValidationConfig::default()
        };
        let four_of_five = checks(&[true, true, true, true, false]);
        assert_eq!(
            calculate_quality_score(&four_of_five, &ValidationConfig::default()).1,
            ValidationStatus::Warning
        );
        assert_eq!(calculate_quality_score(&four_of_five, &lenient).1, ValidationStatus::Pass);
        assert_eq!(status_for(60.0, &lenient), ValidationStatus::Warning);
    }

    #[test]
    fn test_quality_score_empty() {
        let (score, status) = calculate_quality_score(&[], &ValidationConfig::default());
        assert_eq!(score, 0.0);
        assert_eq!(status, ValidationStatus::Pending);
    }
}
