//! Centralized error types for the Sevzap aggregation layer.
//!
//! This module provides a typed error hierarchy that:
//! - Separates caller mistakes (bad query parameters) from upstream failures
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Every error raised by the aggregators converts into this type.
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Input(#[from] InputError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Input(e) => e.user_message(),
            AppError::Upstream(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
        }
    }

    /// True when the caller supplied bad parameters (a request-level error,
    /// never worth retrying).
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

/// Malformed or missing caller parameters.
///
/// Raised before any upstream call is made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Parameter {field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Parameter {field} is out of range: {value}")]
    OutOfRange { field: String, value: f64 },
}

impl InputError {
    pub fn user_message(&self) -> &'static str {
        match self {
            InputError::MissingParameter(_) => "A required parameter is missing.",
            InputError::InvalidNumber { .. } => "A parameter that must be a number is not one.",
            InputError::OutOfRange { .. } => "A parameter is outside its allowed range.",
        }
    }
}

/// A single upstream call failed (network, status or payload).
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{source_name}: connection failed: {message}")]
    ConnectionFailed {
        source_name: String,
        message: String,
    },

    #[error("{source_name}: request timed out")]
    Timeout { source_name: String },

    #[error("{source_name}: server returned {status} - {message}")]
    Status {
        source_name: String,
        status: u16,
        message: String,
    },

    #[error("{source_name}: invalid response: {message}")]
    InvalidResponse {
        source_name: String,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl UpstreamError {
    pub fn invalid_response(source_name: &str, message: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            UpstreamError::ConnectionFailed { .. } => {
                "Unable to reach the data source. Check your internet connection."
            }
            UpstreamError::Timeout { .. } => "The data source timed out. Please try again.",
            UpstreamError::Status { status, .. } if *status >= 500 => {
                "The data source is experiencing issues. Please try again later."
            }
            UpstreamError::Status { .. } => "The data source rejected the request.",
            UpstreamError::InvalidResponse { .. } => {
                "Received an unexpected response from the data source."
            }
            UpstreamError::Client(_) => "The HTTP client could not be created.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the path.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_upstream_error(self, source_name: &str) -> UpstreamError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_upstream_error(self, source_name: &str) -> UpstreamError {
        if self.is_timeout() {
            UpstreamError::Timeout {
                source_name: source_name.to_string(),
            }
        } else if let Some(status) = self.status() {
            UpstreamError::Status {
                source_name: source_name.to_string(),
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            UpstreamError::invalid_response(source_name, self.to_string())
        } else {
            UpstreamError::ConnectionFailed {
                source_name: source_name.to_string(),
                message: self.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_conversion() {
        let input = InputError::MissingParameter("lat".into());
        let app_err: AppError = input.into();
        assert!(app_err.is_input_error());
        assert!(matches!(app_err, AppError::Input(InputError::MissingParameter(_))));
    }

    #[test]
    fn test_input_messages_do_not_assume_the_field() {
        let missing = InputError::MissingParameter("codes".into());
        let out_of_range = InputError::OutOfRange {
            field: "limit".into(),
            value: -1.0,
        };
        assert!(!missing.user_message().contains("lat"));
        assert!(!out_of_range.user_message().contains("Coordinates"));
        assert_eq!(missing.to_string(), "Missing required parameter: codes");
    }

    #[test]
    fn test_upstream_error_is_not_input_error() {
        let app_err: AppError = UpstreamError::Timeout {
            source_name: "open-meteo".into(),
        }
        .into();
        assert!(!app_err.is_input_error());
        assert_eq!(
            app_err.user_message(),
            "The data source timed out. Please try again."
        );
    }

    #[test]
    fn test_server_status_message_depends_on_class() {
        let server = UpstreamError::Status {
            source_name: "cbr".into(),
            status: 503,
            message: "unavailable".into(),
        };
        let client = UpstreamError::Status {
            source_name: "cbr".into(),
            status: 404,
            message: "missing".into(),
        };
        assert!(server.user_message().contains("experiencing issues"));
        assert!(client.user_message().contains("rejected"));
    }

    #[test]
    fn test_upstream_display_names_source() {
        let err = UpstreamError::invalid_response("geocoding", "expected object");
        assert_eq!(
            err.to_string(),
            "geocoding: invalid response: expected object"
        );
    }
}
