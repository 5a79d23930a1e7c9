//! Error types for rust_slalom

use std::fmt;

/// Main error type for motion generation
#[derive(Debug)]
pub enum MotionError {
    /// Invalid parameter (non-positive limit, non-finite value, ...)
    InvalidParameter(String),
    /// Constraints are valid on their own but cannot be met together
    Infeasible(String),
    /// I/O error
    IoError(std::io::Error),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            MotionError::Infeasible(msg) => write!(f, "Infeasible constraints: {}", msg),
            MotionError::IoError(e) => write!(f, "I/O error: {}", e),
            MotionError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for MotionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MotionError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MotionError {
    fn from(e: std::io::Error) -> Self {
        MotionError::IoError(e)
    }
}

/// Result type alias for motion generation
pub type MotionResult<T> = Result<T, MotionError>;

/// Fail with `InvalidParameter` unless every value is finite
pub(crate) fn ensure_finite(values: &[(&str, f64)]) -> MotionResult<()> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, v)) => Err(MotionError::InvalidParameter(format!(
            "{} must be finite, got {}",
            name, v
        ))),
        None => Ok(()),
    }
}

/// Fail with `InvalidParameter` unless the value is finite and strictly positive
pub(crate) fn ensure_positive(name: &str, value: f64) -> MotionResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MotionError::InvalidParameter("j_max must be positive, got 0".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid parameter: j_max must be positive, got 0"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MotionError = io_err.into();
        assert!(matches!(err, MotionError::IoError(_)));
    }

    #[test]
    fn test_parameter_guards() {
        assert!(ensure_positive("a_max", 1.0).is_ok());
        assert!(ensure_positive("a_max", 0.0).is_err());
        assert!(ensure_positive("a_max", f64::NAN).is_err());
        assert!(ensure_finite(&[("v", 1.0), ("d", -2.0)]).is_ok());
        assert!(ensure_finite(&[("v", 1.0), ("d", f64::INFINITY)]).is_err());
    }
}
