//! # Error Types
//!
//! Errors of the desk shell: `ConfigError` stops startup, `ApiError` is what
//! a command caller sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in quote-desk                             │
//! │                                                                         │
//! │  stdin                         Rust Shell                               │
//! │  ─────                         ──────────                               │
//! │                                                                         │
//! │  {"command":"add_service","id":"ghost"}                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Malformed JSON? ─── serde_json::Error ───────────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Unknown id? ─── CoreError::UnknownService ──── ApiError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ── QuoteResponse ──────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout                                                                 │
//! │  {"error":{"code":"NOT_FOUND","message":"Service not found: ghost"}}    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use quote_core::CoreError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Config Error
// =============================================================================

/// Startup failures. Any of these aborts the process before the first
/// command is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Reading the config file failed.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: String, reason: String },

    /// The pricing tables failed validation.
    #[error("Invalid pricing tables: {0}")]
    Tables(#[from] CoreError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from shell commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Service not found: ghost"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown catalog id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation failed
    CartError,

    /// The command line could not be parsed
    InvalidCommand,

    /// The pricing tables are inconsistent
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an invalid command error.
    pub fn invalid_command(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidCommand, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownService(id) => ApiError::not_found("Service", &id),
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Quote cannot have more than {} services", max),
            ),
            CoreError::EmptyBundle(_)
            | CoreError::UnknownBundleItem { .. }
            | CoreError::UnknownUpsellTarget(_) => {
                tracing::error!("Pricing tables inconsistent: {}", err);
                ApiError::new(ErrorCode::ConfigError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Malformed command lines.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_command(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_core::ValidationError;

    #[test]
    fn test_unknown_service_maps_to_not_found() {
        let err = ApiError::from(CoreError::UnknownService("ghost".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Service not found: ghost");
    }

    #[test]
    fn test_validation_maps_to_validation_error() {
        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "id".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&ApiError::from(CoreError::CartTooLarge { max: 100 })).unwrap();
        assert_eq!(
            json,
            r#"{"code":"CART_ERROR","message":"Quote cannot have more than 100 services"}"#
        );
    }

    #[test]
    fn test_bad_json_is_invalid_command() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert_eq!(ApiError::from(parse_err).code, ErrorCode::InvalidCommand);
    }
}
