//! Request-level error types.
//!
//! Upstream failures never surface here: they are carried inside the response
//! envelope. Only problems with the request itself abort a request.

use thiserror::Error;

/// Result type alias using WeatherError.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Errors that abort a weather request before any upstream is contacted.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Coordinates are outside the supported area: latitude {latitude}, longitude {longitude}")]
    OutOfBounds { latitude: f64, longitude: f64 },

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl WeatherError {
    /// Short machine-readable code used in JSON error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            WeatherError::OutOfBounds { .. } => "OutOfBounds",
            WeatherError::MissingParameter(_) => "MissingParameterValue",
            WeatherError::InvalidParameter { .. } => "InvalidParameterValue",
            WeatherError::InternalError(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WeatherError::MissingParameter(_) | WeatherError::InvalidParameter { .. } => 400,
            WeatherError::OutOfBounds { .. } => 404,
            WeatherError::InternalError(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_maps_to_not_found() {
        let err = WeatherError::OutOfBounds {
            latitude: 51.5,
            longitude: -0.12,
        };
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "OutOfBounds");
        assert!(err.to_string().contains("51.5"));
    }

    #[test]
    fn test_parameter_errors_are_bad_requests() {
        let missing = WeatherError::MissingParameter("latitude".to_string());
        let invalid = WeatherError::InvalidParameter {
            param: "longitude".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(missing.http_status_code(), 400);
        assert_eq!(invalid.http_status_code(), 400);
    }
}
