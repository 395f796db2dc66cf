// Threshold and Consistency Checks
//
// Each function produces one named ValidationCheck. A failing check always
// carries a message; a passing check never does.

use crate::types::ValidationCheck;

pub const COMPOSITE_CHECK: &str = "Composite Score";
pub const REFERENCE_CHECK: &str = "Reference Correlation";
pub const HARMONIC_COUNT_CHECK: &str = "Harmonic Count";
pub const RATIO_COHERENCE_CHECK: &str = "Ratio Coherence";
pub const CONSISTENCY_CHECK: &str = "Signature Consistency";

/// composite_score >= floor
pub fn validate_composite(composite: f64, floor: f64) -> ValidationCheck {
    let passed = composite >= floor;
    ValidationCheck {
        name: COMPOSITE_CHECK.to_string(),
        passed,
        score: Some(composite),
        message: (!passed).then(|| {
            format!(
                "Composite score below threshold ({:.3} < {:.3})",
                composite, floor
            )
        }),
    }
}

/// reference_correlation >= floor
pub fn validate_reference(reference: f64, floor: f64) -> ValidationCheck {
    let passed = reference >= floor;
    ValidationCheck {
        name: REFERENCE_CHECK.to_string(),
        passed,
        score: Some(reference),
        message: (!passed).then(|| {
            format!(
                "Weak correlation with reference sequence ({:.3} < {:.3})",
                reference, floor
            )
        }),
    }
}

/// matched_count >= minimum
///
/// Too few matches falsifies the harmonic-pattern hypothesis outright.
pub fn validate_harmonic_count(matched: usize, minimum: usize) -> ValidationCheck {
    let passed = matched >= minimum;
    ValidationCheck {
        name: HARMONIC_COUNT_CHECK.to_string(),
        passed,
        score: Some(matched as f64),
        message: (!passed).then(|| {
            format!(
                "Insufficient harmonic matches ({} < {}): harmonic pattern hypothesis falsified",
                matched, minimum
            )
        }),
    }
}

/// ratio_coherence >= floor
pub fn validate_ratio_coherence(coherence: f64, floor: f64) -> ValidationCheck {
    let passed = coherence >= floor;
    ValidationCheck {
        name: RATIO_COHERENCE_CHECK.to_string(),
        passed,
        score: Some(coherence),
        message: (!passed).then(|| {
            format!(
                "Amplitude decay does not follow the scaling ratio ({:.3} < {:.3})",
                coherence, floor
            )
        }),
    }
}

/// Cross-check between the two correlation signatures
///
/// A high reference correlation alongside a low amplitude correlation
/// suggests the reference match is spurious.
pub fn validate_signature_consistency(
    reference: f64,
    amplitude: f64,
    reference_high: f64,
    amplitude_low: f64,
) -> ValidationCheck {
    let inconsistent = reference >= reference_high && amplitude < amplitude_low;
    ValidationCheck {
        name: CONSISTENCY_CHECK.to_string(),
        passed: !inconsistent,
        score: None,
        message: inconsistent.then(|| {
            format!(
                "Inconsistent signatures: reference correlation {:.3} is high but amplitude correlation {:.3} is low (possible spurious match)",
                reference, amplitude
            )
        }),
    }
}
