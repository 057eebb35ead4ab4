//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.15 * 29375 = 4406.25      → floor → 4406   (fine)                  │
//! │    18000 * 0.2666 = 4798.8     → floor → 4798   (fine)                  │
//! │    but 0.1 + 0.2 = 0.30000000000000004 means a product that should      │
//! │    land exactly on an integer can land just below it and floor to       │
//! │    one unit less.                                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer units × basis points                             │
//! │    floor(amount * rate) = amount * bps / 10000   (exact)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Units
//! Catalog fees are whole riyals with no minor unit. Converted amounts are
//! whole units of the target currency. Every conversion truncates.
//!
//! ## Usage
//! ```rust
//! use quote_core::money::Money;
//! use quote_core::types::Rate;
//!
//! let fee = Money::from_units(18_000);
//! let usd = fee.apply_rate(Rate::from_bps(2666));
//! assert_eq!(usd.units(), 4798);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole units of a single currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate values such as
///   `subtotal + surcharge - bundle discount` may go below zero before the
///   totalizer clamps them
/// - **Single field tuple struct**: zero-cost abstraction over i64, serialized
///   as a plain number
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ServiceCatalogItem.professional_fee ──► convert ──► line item          │
/// │                                               │                         │
/// │                                               ▼                         │
/// │  base subtotal ─► + surcharge ─► − bundle ─► − promo ─► taxable ─► VAT  │
/// │                                                                         │
/// │  EVERY monetary figure in an invoice flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    ///
    /// let fee = Money::from_units(2_500);
    /// assert_eq!(fee.units(), 2_500);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the larger of `self` and zero.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(-40).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_units(40).clamp_non_negative().units(), 40);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies by a rate and truncates toward negative infinity.
    ///
    /// This is the single rounding primitive of the engine: currency
    /// conversion, the fast-track surcharge, promo discounts and VAT all go
    /// through it, and each call floors its own result.
    ///
    /// ## Implementation
    /// `floor(amount * bps / 10000)` computed in i128. `div_euclid` with a
    /// positive divisor is a true floor, also for negative amounts. A result
    /// outside `i64` saturates at `i64::MIN` / `i64::MAX`; validated pricing
    /// tables never get there.
    ///
    /// ## Example
    /// ```rust
    /// use quote_core::money::Money;
    /// use quote_core::types::Rate;
    ///
    /// let subtotal = Money::from_units(23_500);
    /// assert_eq!(subtotal.apply_rate(Rate::from_bps(2500)).units(), 5_875);
    /// assert_eq!(Money::from_units(29_375).apply_rate(Rate::from_bps(1500)).units(), 4_406);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = (self.0 as i128 * rate.bps() as i128).div_euclid(Rate::SCALE as i128);
        let units = i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX });
        Money::from_units(units)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the bare unit count.
///
/// ## Note
/// Currency symbols and grouping are the presentation layer's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
