//! # Error Types
//!
//! Domain-specific error types for quote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quote-core errors (this file)                                          │
//! │  ├── CoreError        - Precondition and pricing-table failures         │
//! │  └── ValidationError  - Field-level input validation failures           │
//! │                                                                         │
//! │  quote-desk errors (shell)                                              │
//! │  ├── ConfigError      - Fatal at startup                                │
//! │  └── ApiError         - What the caller sees (serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError / ConfigError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! An unrecognized promo code. It is reported through
//! [`crate::promo::PromoOutcome::Invalid`] and the invoice still computes.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart references an id that is not in the catalog.
    ///
    /// ## When This Occurs
    /// - The cart source sent a stale or mistyped id
    /// - The catalog was reconfigured while a draft was open
    ///
    /// The engine fails fast instead of emitting a zero-priced line.
    #[error("Service not found in catalog: {0}")]
    UnknownService(String),

    /// The cart has more distinct services than allowed.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A bundle lists no required items.
    #[error("Bundle {0} has no required items")]
    EmptyBundle(String),

    /// A bundle requires an item the catalog does not contain.
    #[error("Bundle {bundle} requires unknown service {item}")]
    UnknownBundleItem { bundle: String, item: String },

    /// An upsell rule or the fallback points at an unknown service.
    #[error("Upsell suggestion refers to unknown service {0}")]
    UnknownUpsellTarget(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while validating pricing tables or caller input before any
/// computation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed rate, lowercase promo code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. two catalog entries with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownService("cr-renewal".to_string());
        assert_eq!(err.to_string(), "Service not found in catalog: cr-renewal");

        let err = CoreError::UnknownBundleItem {
            bundle: "formation-starter".to_string(),
            item: "ghost".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Bundle formation-starter requires unknown service ghost"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::Duplicate {
            field: "service id".to_string(),
            value: "cr-registration".to_string(),
        };
        assert_eq!(err.to_string(), "service id 'cr-registration' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
