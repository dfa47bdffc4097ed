//! Pattern engine error types

use thiserror::Error;

/// Errors raised by the pattern engine.
///
/// Only hard failures live here. Thin or flat series are not errors: they
/// surface as `None`, empty lists or a [`DataStatus`](crate::DataStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// A sample was rejected at ingestion; the series is left untouched
    #[error("Invalid input for series '{series_id}': {reason}")]
    InvalidInput { series_id: String, reason: String },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Configuration source could not be read or parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PatternError {
    /// Shorthand for [`PatternError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PatternError::InvalidInput`].
    pub fn invalid_input(series_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            series_id: series_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_input_error_message() {
        let error = PatternError::invalid_input("cpu", "value is NaN");
        assert_eq!(
            error.to_string(),
            "Invalid input for series 'cpu': value is NaN"
        );
    }

    #[test]
    fn test_invalid_parameter_error_message() {
        let error = PatternError::invalid_parameter("window_size", "must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'window_size': must be positive"
        );
    }

    #[test]
    fn test_invalid_parameter_error_fields() {
        let error = PatternError::invalid_parameter("horizon", "exceeds 1000");
        if let PatternError::InvalidParameter { name, reason } = error {
            assert_eq!(name, "horizon");
            assert_eq!(reason, "exceeds 1000");
        } else {
            panic!("Expected InvalidParameter variant");
        }
    }

    #[test]
    fn test_invalid_config_error_message() {
        let error = PatternError::InvalidConfig("expected a table".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: expected a table");
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn Error> = Box::new(PatternError::InvalidConfig(String::new()));
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternError>();
    }

    #[test]
    fn test_error_downcast() {
        let error: Box<dyn Error + Send + Sync> =
            Box::new(PatternError::invalid_input("a", "empty"));
        let downcasted = error.downcast_ref::<PatternError>();
        assert!(matches!(
            downcasted,
            Some(PatternError::InvalidInput { .. })
        ));
    }
}
