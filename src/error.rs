// src/error.rs
use std::fmt;

/// Errors raised by the pricing core and the record/batch layer
#[derive(Debug, Clone)]
pub enum PricingError {
    /// A market or option parameter outside its domain
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Numerical result that cannot be reported (NaN, infinite)
    NumericalInstability { method: String, reason: String },

    /// Invalid run configuration
    InvalidConfiguration { field: String, reason: String },

    /// Malformed option record
    RecordError { line: u64, reason: String },

    /// File access failure while reading or writing records
    Io { path: String, reason: String },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            PricingError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
            PricingError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            PricingError::RecordError { line, reason } => {
                write!(f, "Malformed option record on line {}: {}", line, reason)
            }
            PricingError::Io { path, reason } => {
                write!(f, "I/O error on '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Result type alias for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Upper bound on paths per pricing run
    pub const MAX_PATHS: usize = 1_000_000_000;

    /// Validate that a parameter is finite and positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > MAX_PATHS {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate worker count; each worker needs at least one path
    pub fn validate_workers(workers: usize, paths: usize) -> PricingResult<()> {
        if workers == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if workers > paths {
            Err(PricingError::InvalidConfiguration {
                field: "workers".to_string(),
                reason: format!("{} workers cannot share {} paths", workers, paths),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("t", 0.0).is_ok());
        assert!(validate_non_negative("t", 1.5).is_ok());
        assert!(validate_non_negative("t", -1e-12).is_err());
        assert!(validate_non_negative("t", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_paths_and_workers() {
        assert!(validate_paths(1).is_ok());
        assert!(validate_paths(0).is_err());
        assert!(validate_paths(MAX_PATHS + 1).is_err());

        assert!(validate_workers(4, 1_000).is_ok());
        assert!(validate_workers(0, 1_000).is_err());
        assert!(validate_workers(8, 4).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = PricingError::InvalidParameters {
            parameter: "sigma".to_string(),
            value: -0.1,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("sigma"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_record_error_display() {
        let error = PricingError::RecordError {
            line: 7,
            reason: "expected 7 fields, found 5".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("line 7"));
        assert!(display.contains("7 fields"));
    }
}
