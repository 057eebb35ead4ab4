//! # Promotion Resolver
//!
//! Resolves a user-typed promo code against the registry.
//!
//! ## Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input            normalized      outcome                               │
//! │  ─────────────    ────────────    ─────────────────────────────────     │
//! │  None             -               NotSupplied                           │
//! │  "   "            -               NotSupplied                           │
//! │  " welcome10 "    WELCOME10       Applied { code, rate: 0.10 }          │
//! │  "bogus"          BOGUS           Invalid { code: "BOGUS" }             │
//! │                                                                         │
//! │  Invalid is NOT an error: the invoice still computes with zero promo    │
//! │  discount and the caller shows an inline message.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PromoCode, Rate};
use crate::validation::{validate_discount_rate, validate_promo_code};

// =============================================================================
// Promo Outcome
// =============================================================================

/// What happened to the promo code supplied with a quote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromoOutcome {
    /// No code, or only whitespace.
    #[default]
    NotSupplied,
    /// Recognized code; `code` is the normalized (uppercase) form.
    Applied { code: String, rate: Rate },
    /// A code was supplied but the registry does not know it.
    Invalid { code: String },
}

impl PromoOutcome {
    /// Discount rate to apply, zero unless `Applied`.
    pub fn rate(&self) -> Rate {
        match self {
            PromoOutcome::Applied { rate, .. } => *rate,
            PromoOutcome::NotSupplied | PromoOutcome::Invalid { .. } => Rate::zero(),
        }
    }

    /// The applied code, if any.
    pub fn applied_code(&self) -> Option<&str> {
        match self {
            PromoOutcome::Applied { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, PromoOutcome::Invalid { .. })
    }
}

// =============================================================================
// Promo Registry
// =============================================================================

/// Uppercase code → discount rate.
#[derive(Debug, Clone, Default)]
pub struct PromoRegistry {
    codes: BTreeMap<String, Rate>,
}

impl PromoRegistry {
    /// Builds the registry. Codes must be uppercase, unique, and carry a
    /// rate in `[0, 1)`.
    pub fn new(codes: Vec<PromoCode>) -> CoreResult<Self> {
        let mut registry = BTreeMap::new();

        for promo in codes {
            validate_promo_code(&promo.code)?;
            validate_discount_rate("promo rate", promo.rate)?;

            if registry.contains_key(&promo.code) {
                return Err(ValidationError::Duplicate {
                    field: "promo code".to_string(),
                    value: promo.code,
                }
                .into());
            }
            registry.insert(promo.code, promo.rate);
        }

        Ok(PromoRegistry { codes: registry })
    }

    /// Resolves free text into a [`PromoOutcome`]. Case-insensitive.
    pub fn resolve(&self, input: Option<&str>) -> PromoOutcome {
        let Some(code) = input.and_then(normalize_code) else {
            return PromoOutcome::NotSupplied;
        };

        let outcome = match self.codes.get(&code) {
            Some(&rate) => PromoOutcome::Applied { code, rate },
            None => PromoOutcome::Invalid { code },
        };

        debug!(?outcome, "Promo code resolved");
        outcome
    }

    /// Registered codes in lexical order.
    pub fn codes(&self) -> impl Iterator<Item = (&str, Rate)> {
        self.codes.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Resolves `input` against `registry`.
pub fn resolve_promo(registry: &PromoRegistry, input: Option<&str>) -> PromoOutcome {
    registry.resolve(input)
}

/// Trims and uppercases user input. Blank input yields `None`.
pub fn normalize_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// `floor(rate * discountable_base)`; zero when the base is not positive.
pub fn promo_discount(outcome: &PromoOutcome, discountable_base: Money) -> Money {
    if !discountable_base.is_positive() {
        return Money::zero();
    }
    discountable_base.apply_rate(outcome.rate())
}
