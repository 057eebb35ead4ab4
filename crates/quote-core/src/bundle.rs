//! # Bundle Matcher
//!
//! Finds every bundle whose required items are all in the cart.
//!
//! ## Stacking Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bundle A requires {x, y}   discount 2500                               │
//! │  Bundle B requires {y, z}   discount 1500                               │
//! │                                                                         │
//! │  cart {x, y, z}  ──►  A ✓  B ✓  ──►  bundle discount = 2500 + 1500      │
//! │  cart {x, y}     ──►  A ✓  B ✗  ──►  bundle discount = 2500             │
//! │  cart {x, z}     ──►  A ✗  B ✗  ──►  bundle discount = 0                │
//! │                                                                         │
//! │  Bundles never exclude each other, even when they share items.          │
//! │  A bundle is never partially applied.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::cart::Cart;
use crate::currency::CurrencyConverter;
use crate::money::Money;
use crate::types::BundleDefinition;

/// A bundle that fired, with its discount in the quote currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedBundle {
    pub id: String,
    pub name: String,
    pub discount: Money,
}

/// Result of matching a cart against the bundle table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleMatch {
    /// Satisfied bundles, in bundle-table order.
    pub applied: Vec<AppliedBundle>,
    /// Sum of the individually converted discounts.
    pub total: Money,
}

impl BundleDefinition {
    /// A bundle is satisfied iff every required id is in the cart.
    pub fn is_satisfied_by(&self, cart: &Cart) -> bool {
        !self.required_item_ids.is_empty() && cart.contains_all(&self.required_item_ids)
    }
}

/// Matches `cart` against `bundles` and totals the converted discounts.
pub fn match_bundles(
    cart: &Cart,
    bundles: &[BundleDefinition],
    converter: &CurrencyConverter,
) -> BundleMatch {
    let applied: Vec<AppliedBundle> = bundles
        .iter()
        .filter(|bundle| bundle.is_satisfied_by(cart))
        .map(|bundle| AppliedBundle {
            id: bundle.id.clone(),
            name: bundle.name.clone(),
            discount: converter.convert(bundle.discount()),
        })
        .collect();

    let total = applied.iter().map(|bundle| bundle.discount).sum();

    debug!(
        matched = applied.len(),
        total = %total,
        currency = %converter.currency(),
        "Bundles matched"
    );

    BundleMatch { applied, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, Rate};

    fn bundle(id: &str, required: &[&str], discount_amount: i64) -> BundleDefinition {
        BundleDefinition {
            id: id.to_string(),
            name: format!("Bundle {}", id),
            required_item_ids: required.iter().map(|s| s.to_string()).collect(),
            discount_amount,
        }
    }

    fn sar() -> CurrencyConverter {
        CurrencyConverter::new(Currency::Sar, Rate::from_bps(2666))
    }

    #[test]
    fn test_overlapping_bundles_stack() {
        let bundles = vec![bundle("a", &["x", "y"], 2500), bundle("b", &["y", "z"], 1500)];
        let cart = Cart::from_ids(["x", "y", "z"]);

        let result = match_bundles(&cart, &bundles, &sar());

        assert_eq!(result.total.units(), 4000);
        let ids: Vec<&str> = result.applied.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_partial_match_does_not_apply() {
        let bundles = vec![bundle("a", &["x", "y"], 2500)];
        let cart = Cart::from_ids(["x", "z"]);

        let result = match_bundles(&cart, &bundles, &sar());

        assert!(result.applied.is_empty());
        assert!(result.total.is_zero());
    }

    #[test]
    fn test_discounts_convert_individually() {
        // floor(2500 * 0.2666) = 666, floor(1500 * 0.2666) = 399 → 1065
        // (converting the 4000 sum would give floor(1066.4) = 1066)
        let bundles = vec![bundle("a", &["x"], 2500), bundle("b", &["x"], 1500)];
        let cart = Cart::from_ids(["x"]);
        let usd = CurrencyConverter::new(Currency::Usd, Rate::from_bps(2666));

        let result = match_bundles(&cart, &bundles, &usd);

        assert_eq!(result.applied[0].discount.units(), 666);
        assert_eq!(result.applied[1].discount.units(), 399);
        assert_eq!(result.total.units(), 1065);
    }

    #[test]
    fn test_empty_requirement_never_fires() {
        let bundles = vec![bundle("hollow", &[], 500)];
        let result = match_bundles(&Cart::from_ids(["x"]), &bundles, &sar());
        assert!(result.applied.is_empty());
    }
}
