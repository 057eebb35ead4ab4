//! # Currency Converter
//!
//! Converts SAR-denominated catalog figures into the quote currency.
//!
//! ## Truncation Point
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line A prof fee 3 SAR ──► floor(3 × 0.2666) = 0 USD ─┐                 │
//! │  line B prof fee 3 SAR ──► floor(3 × 0.2666) = 0 USD ─┴─► subtotal 0    │
//! │                                                                         │
//! │  NOT: (3 + 3) × 0.2666 = 1.5996 → 1                                     │
//! │                                                                         │
//! │  Every value is floored where it is converted, individually.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Currency, Rate};

/// The fixed exchange rate from SAR to a quote currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConverter {
    currency: Currency,
    rate: Rate,
}

impl CurrencyConverter {
    /// Creates a converter. SAR always uses the identity rate regardless of
    /// what `usd_exchange` says.
    pub fn new(currency: Currency, usd_exchange: Rate) -> Self {
        let rate = match currency {
            Currency::Sar => Rate::ONE,
            Currency::Usd => usd_exchange,
        };
        CurrencyConverter { currency, rate }
    }

    /// Target currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Rate applied to SAR amounts.
    #[inline]
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Converts a SAR amount: `floor(amount * rate)`.
    #[inline]
    pub fn convert(&self, amount_sar: Money) -> Money {
        amount_sar.apply_rate(self.rate)
    }
}
