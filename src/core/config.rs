//! Configuration error types and validation traits.
//!
//! Stage configurations implement [`ConfigValidator`] so the pipeline can
//! refuse a bad configuration before any image is touched.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a configuration file could not be found.
    #[error("configuration file does not exist: {path}")]
    FileNotFound { path: std::path::PathBuf },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a ratio lies in `[0.0, 1.0]`.
    ///
    /// # Arguments
    ///
    /// * `name` - Field name used in the error message.
    /// * `value` - The ratio to validate.
    fn validate_ratio(&self, name: &str, value: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            Err(ConfigError::InvalidConfig {
                message: format!("{name} must be between 0.0 and 1.0, got {value}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a value is finite and not negative.
    fn validate_non_negative(&self, name: &str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() || value < 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{name} must be a finite non-negative number, got {value}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a value is finite and strictly positive.
    fn validate_positive(&self, name: &str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{name} must be a finite positive number, got {value}"),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    impl ConfigValidator for Dummy {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Dummy
        }
    }

    #[test]
    fn test_validate_ratio_bounds() {
        assert!(Dummy.validate_ratio("r", 0.0).is_ok());
        assert!(Dummy.validate_ratio("r", 1.0).is_ok());
        assert!(Dummy.validate_ratio("r", 1.01).is_err());
        assert!(Dummy.validate_ratio("r", f32::NAN).is_err());
    }

    #[test]
    fn test_validate_positive_rejects_zero_and_nan() {
        assert!(Dummy.validate_positive("sigma", 75.0).is_ok());
        assert!(Dummy.validate_positive("sigma", 0.0).is_err());
        assert!(Dummy.validate_positive("sigma", f32::NAN).is_err());
        assert!(Dummy.validate_non_negative("d", 0.0).is_ok());
        assert!(Dummy.validate_non_negative("d", f32::INFINITY).is_err());
    }
}
