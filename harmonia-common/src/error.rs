//! Common error types for Harmonia

use thiserror::Error;

/// Common result type for Harmonia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Harmonia crates
///
/// Numeric degeneracies (near-zero divisions, zero-variance correlations,
/// empty match lists) are not errors: they resolve to neutral scores and are
/// reported by the validator instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed top-level input (empty series, non-positive sampling rate, ...)
    #[error("Invalid input: {parameter} = {value} ({reason})")]
    InvalidInput {
        /// Name of the offending parameter
        parameter: String,
        /// Offending value, formatted for display
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration parsing or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job skipped because its batch was cancelled
    #[error("Analysis cancelled")]
    Cancelled,

    /// Internal invariant violated (e.g. FFT buffer mismatch)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build an [`Error::InvalidInput`] from any displayable value
    pub fn invalid_input(
        parameter: impl Into<String>,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidInput {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_carries_parameter_and_value() {
        let err = Error::invalid_input("sampling_rate", -1.0, "must be > 0");
        let text = err.to_string();
        assert!(text.contains("sampling_rate"));
        assert!(text.contains("-1"));
        assert!(text.contains("must be > 0"));
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
