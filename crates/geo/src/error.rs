//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
///
/// Clustering itself never fails; these come from validating inputs that
/// cross a boundary (config values, JSON payloads, caller-built viewports).
#[derive(Debug, Error)]
pub enum GeoError {
    /// Viewport span is negative or not a finite number
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    /// Grid divisor must be a finite number greater than zero
    #[error("Invalid grid divisor: {0}")]
    InvalidDivisor(f64),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with spotfeed-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid viewport span
    InvalidViewport = 10001,
    /// Invalid grid divisor
    InvalidDivisor = 10002,
    /// Invalid coordinate values
    InvalidCoordinate = 10003,
    /// JSON parsing error
    JsonParsing = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidViewport(_) => GeoErrorCode::InvalidViewport,
            GeoError::InvalidDivisor(_) => GeoErrorCode::InvalidDivisor,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::InvalidDivisor(0.0).code() as u32, 10002);
        assert_eq!(
            GeoError::InvalidViewport("negative".into()).code(),
            GeoErrorCode::InvalidViewport
        );
    }

    #[test]
    fn test_error_display() {
        let err = GeoError::InvalidDivisor(-1.0);
        assert_eq!(err.to_string(), "Invalid grid divisor: -1");
    }
}
