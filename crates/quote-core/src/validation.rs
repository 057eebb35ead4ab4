//! # Validation Module
//!
//! Field validators for pricing tables and caller input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Startup (fatal)                                               │
//! │  ├── PricingTables::from_config runs every table through THIS MODULE    │
//! │  └── A bad rate or fee stops the process before any quote is priced     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Shell command (per request)                                   │
//! │  ├── Service id lookups                                                 │
//! │  └── Rejected before the draft is mutated                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine                                                        │
//! │  └── Pure arithmetic on values that already passed layers 1 and 2       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Rate;
use crate::MAX_AMOUNT_UNITS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted service, bundle or promo identifier.
const MAX_ID_LEN: usize = 64;

/// Highest accepted SAR exchange multiplier (100.0).
pub const MAX_EXCHANGE_RATE: Rate = Rate::from_bps(1_000_000);

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a catalog or bundle identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_service_id;
///
/// assert!(validate_service_id("cr-registration").is_ok());
/// assert!(validate_service_id("").is_err());
/// assert!(validate_service_id("has space").is_err());
/// ```
pub fn validate_service_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: format!(
                "'{}' must contain only letters, numbers, hyphens, and underscores",
                id
            ),
        });
    }

    Ok(())
}

/// Validates a promo registry key.
///
/// ## Rules
/// - Must not be empty, at most 64 characters
/// - Uppercase ASCII letters and digits only, since lookups normalize
///   user input to uppercase
pub fn validate_promo_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "promo code".to_string(),
        });
    }

    if code.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "promo code".to_string(),
            max: MAX_ID_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "promo code".to_string(),
            reason: format!("'{}' must be uppercase letters and digits", code),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a fee or flat discount in whole SAR.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (services without a government fee)
/// - At most `MAX_AMOUNT_UNITS`, so invoice sums cannot overflow
///
/// ## Example
/// ```rust
/// use quote_core::validation::validate_amount;
///
/// assert!(validate_amount("professional_fee", 4_500).is_ok());
/// assert!(validate_amount("government_fee", 0).is_ok());
/// assert!(validate_amount("discount_amount", -1).is_err());
/// assert!(validate_amount("professional_fee", i64::MAX).is_err());
/// ```
pub fn validate_amount(field: &str, units: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_UNITS).contains(&units) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_UNITS,
        });
    }

    Ok(())
}

/// Validates a discount rate: must be in `[0, 1)`.
pub fn validate_discount_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if !rate.is_fractional() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: Rate::SCALE as i64 - 1,
        });
    }

    Ok(())
}

/// Validates an exchange rate: must be in `(0, MAX_EXCHANGE_RATE]`.
pub fn validate_exchange_rate(rate: Rate) -> ValidationResult<()> {
    if rate.is_zero() || rate > MAX_EXCHANGE_RATE {
        return Err(ValidationError::OutOfRange {
            field: "exchange rate".to_string(),
            min: 1,
            max: MAX_EXCHANGE_RATE.bps() as i64,
        });
    }

    Ok(())
}

/// Validates the fast-track surcharge rate: must be in `[0, 1]`.
pub fn validate_surcharge_rate(rate: Rate) -> ValidationResult<()> {
    validate_rate_at_most_one("fast track rate", rate)
}

/// Validates the VAT rate: must be in `[0, 1]`.
///
/// ## Example
/// ```rust
/// use quote_core::types::Rate;
/// use quote_core::validation::validate_tax_rate;
///
/// assert!(validate_tax_rate(Rate::from_bps(1500)).is_ok());
/// assert!(validate_tax_rate(Rate::from_bps(50_000)).is_err());
/// ```
pub fn validate_tax_rate(rate: Rate) -> ValidationResult<()> {
    validate_rate_at_most_one("vat rate", rate)
}

fn validate_rate_at_most_one(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate > Rate::ONE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: Rate::SCALE as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
