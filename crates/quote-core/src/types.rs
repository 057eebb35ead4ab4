//! # Domain Types
//!
//! Core domain types used throughout the quotation engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌──────────────────────┐  ┌───────────────┐  │
//! │  │ ServiceCatalogItem   │  │  BundleDefinition    │  │  PromoCode    │  │
//! │  │  ──────────────────  │  │  ──────────────────  │  │  ───────────  │  │
//! │  │  id                  │  │  id                  │  │  code (UPPER) │  │
//! │  │  professional_fee    │  │  required_item_ids   │  │  rate (bps)   │  │
//! │  │  government_fee      │  │  discount_amount     │  └───────────────┘  │
//! │  └──────────────────────┘  └──────────────────────┘                     │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌──────────────────────┐                     │
//! │  │       Rate           │  │      Currency        │                     │
//! │  │  bps (u32)           │  │  SAR (base)          │                     │
//! │  │  2666 = 0.2666       │  │  USD                 │                     │
//! │  └──────────────────────┘  └──────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All catalog and bundle amounts are denominated in SAR. They are converted
//! to the quote currency by [`crate::currency::CurrencyConverter`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A non-negative multiplier represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so every rate the engine uses is exact:
///
/// | Rate            | Decimal | bps   |
/// |-----------------|---------|-------|
/// | SAR → USD       | 0.2666  | 2666  |
/// | Fast-track      | 0.25    | 2500  |
/// | VAT             | 0.15    | 1500  |
/// | Identity (SAR)  | 1       | 10000 |
///
/// ## Deserialization
/// Accepts either an integer (basis points) or a decimal string
/// (`"0.2666"`), so configuration files can use the readable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Number of basis points in 1.0.
    pub const SCALE: u32 = 10_000;

    /// The identity rate (1.0).
    pub const ONE: Rate = Rate(Self::SCALE);

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the rate is strictly below 1.0.
    #[inline]
    pub const fn is_fractional(&self) -> bool {
        self.0 < Self::SCALE
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Formats as a decimal with trailing zeros trimmed: `0.2666`, `0.15`, `1`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:04}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Parses a decimal rate such as `"0.2666"`, `"0.15"` or `"1"`.
///
/// ## Rules
/// - Digits with at most one `.`, no sign
/// - At most 4 fractional digits (basis-point precision)
///
/// ## Example
/// ```rust
/// use quote_core::types::Rate;
///
/// assert_eq!("0.2666".parse::<Rate>().unwrap().bps(), 2666);
/// assert_eq!("0.15".parse::<Rate>().unwrap().bps(), 1500);
/// assert!("-0.5".parse::<Rate>().is_err());
/// assert!("0.12345".parse::<Rate>().is_err());
/// ```
impl FromStr for Rate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "rate".to_string(),
            reason: format!("'{}' {}", s, reason),
        };

        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "rate".to_string(),
            });
        }
        if s.starts_with('-') {
            return Err(invalid("must not be negative"));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("is not a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("is not a number"));
        }
        if frac.len() > 4 {
            return Err(invalid("has more than 4 decimal places"));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is too large"))?
        };
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<4}", frac)
                .parse()
                .map_err(|_| invalid("is not a number"))?
        };

        let bps = whole
            .checked_mul(Rate::SCALE as u64)
            .and_then(|w| w.checked_add(frac))
            .filter(|bps| *bps <= u32::MAX as u64)
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Rate(bps as u32))
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bps(u32),
            Decimal(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Bps(bps) => Ok(Rate(bps)),
            Repr::Decimal(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Quote currency. Catalog data is always SAR; USD is a converted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Saudi riyal, the catalog's base currency.
    #[default]
    Sar,
    /// US dollar, converted at the configured exchange rate.
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Sar => "SAR",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAR" => Ok(Currency::Sar),
            "USD" => Ok(Currency::Usd),
            _ => Err(ValidationError::NotAllowed {
                field: "currency".to_string(),
                allowed: vec!["SAR".to_string(), "USD".to_string()],
            }),
        }
    }
}

// =============================================================================
// Service Catalog Item
// =============================================================================

/// A consultancy service that can be placed on a quote.
///
/// Fees are whole SAR. The government fee is a pass-through: it appears on
/// the quote but is never discounted or taxed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceCatalogItem {
    /// Stable identifier (e.g. `cr-registration`).
    pub id: String,

    /// Display name shown on the quote.
    pub name: String,

    /// Short description shown under the line item.
    #[serde(default)]
    pub description: String,

    /// Consultancy fee in SAR. Subject to surcharge, discounts and VAT.
    pub professional_fee: i64,

    /// Regulatory fee in SAR. Informational only.
    #[serde(default)]
    pub government_fee: i64,

    /// Free-text grouping used by upsell keyword rules (e.g. `licensing`).
    #[serde(default)]
    pub category: String,
}

impl ServiceCatalogItem {
    /// Returns the professional fee as Money (SAR).
    #[inline]
    pub fn professional_fee(&self) -> Money {
        Money::from_units(self.professional_fee)
    }

    /// Returns the government fee as Money (SAR).
    #[inline]
    pub fn government_fee(&self) -> Money {
        Money::from_units(self.government_fee)
    }
}

// =============================================================================
// Bundle Definition
// =============================================================================

/// A flat discount unlocked when every required item is in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleDefinition {
    pub id: String,
    pub name: String,
    /// Catalog ids that must all be present. Never empty.
    pub required_item_ids: Vec<String>,
    /// Flat discount in SAR (not a percentage).
    pub discount_amount: i64,
}

impl BundleDefinition {
    /// Returns the discount as Money (SAR).
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_units(self.discount_amount)
    }
}

// =============================================================================
// Promo Code
// =============================================================================

/// One entry of the promo registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PromoCode {
    /// Uppercase code as typed on the quote form.
    pub code: String,
    /// Discount rate, strictly below 1.0.
    pub rate: Rate,
}

// =============================================================================
// Quote Request
// =============================================================================

/// An explicit snapshot of everything an invoice depends on.
///
/// The shell owns the mutable draft and hands the engine one of these on
/// every change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteRequest {
    /// Selected catalog ids in display order.
    pub cart_ids: Vec<String>,
    /// Expedited processing requested.
    pub fast_track: bool,
    /// Free-text promo code as entered, if any.
    pub promo_code: Option<String>,
    /// Currency the invoice is expressed in.
    pub currency: Currency,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_parsing() {
        assert_eq!("0.2666".parse::<Rate>().unwrap(), Rate::from_bps(2666));
        assert_eq!("0.25".parse::<Rate>().unwrap(), Rate::from_bps(2500));
        assert_eq!("1".parse::<Rate>().unwrap(), Rate::ONE);
        assert_eq!(".5".parse::<Rate>().unwrap(), Rate::from_bps(5000));
        assert_eq!("3.75".parse::<Rate>().unwrap(), Rate::from_bps(37_500));
        assert_eq!(" 0.15 ".parse::<Rate>().unwrap(), Rate::from_bps(1500));
    }

    #[test]
    fn test_rate_parsing_rejects_malformed() {
        assert!("".parse::<Rate>().is_err());
        assert!("-0.2666".parse::<Rate>().is_err());
        assert!("abc".parse::<Rate>().is_err());
        assert!("0.1.2".parse::<Rate>().is_err());
        assert!(".".parse::<Rate>().is_err());
        assert!("0.00001".parse::<Rate>().is_err());
        assert!("99999999999".parse::<Rate>().is_err());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_bps(2666).to_string(), "0.2666");
        assert_eq!(Rate::from_bps(1500).to_string(), "0.15");
        assert_eq!(Rate::ONE.to_string(), "1");
        assert_eq!(Rate::from_bps(9900).to_string(), "0.99");
    }

    #[test]
    fn test_rate_deserializes_from_bps_or_decimal() {
        let from_bps: Rate = serde_json::from_str("2666").unwrap();
        let from_text: Rate = serde_json::from_str("\"0.2666\"").unwrap();
        assert_eq!(from_bps, from_text);

        assert!(serde_json::from_str::<Rate>("-5").is_err());
        assert!(serde_json::from_str::<Rate>("\"lots\"").is_err());
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("SAR".parse::<Currency>().unwrap(), Currency::Sar);
        assert!("EUR".parse::<Currency>().is_err());
        assert_eq!(Currency::default(), Currency::Sar);
    }

    #[test]
    fn test_currency_serde_uses_iso_codes() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        let parsed: Currency = serde_json::from_str("\"SAR\"").unwrap();
        assert_eq!(parsed, Currency::Sar);
    }
}
