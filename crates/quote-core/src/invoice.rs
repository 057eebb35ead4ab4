//! # Invoice Totalizer
//!
//! Turns a [`QuoteRequest`] snapshot into a fully itemized [`Invoice`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuoteRequest { cart_ids, fast_track, promo_code, currency }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. lines: convert each prof / gov fee  ──► base_professional_subtotal  │
//! │                                          ──► total_government_fees      │
//! │  2. fast_track_surcharge  = ⌊rate × base⌋ (or 0)                        │
//! │  3. bundle_discount       = Σ ⌊convert(bundle.discount)⌋                │
//! │  4. discountable_base     = base + surcharge − bundle_discount          │
//! │  5. promo_discount        = ⌊promo_rate × discountable_base⌋ (≥ 0)      │
//! │  6. taxable_amount        = max(0, discountable_base − promo_discount)  │
//! │  7. vat                   = ⌊vat_rate × taxable_amount⌋                 │
//! │  8. grand_total           = taxable_amount + vat                        │
//! │                                                                         │
//! │  Government fees never enter steps 2-8.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step floors its own result; the order above is part of the pricing
//! contract and changing it changes totals by a unit here and there.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::bundle::{match_bundles, AppliedBundle};
use crate::cart::Cart;
use crate::currency::CurrencyConverter;
use crate::error::CoreResult;
use crate::money::Money;
use crate::promo::{promo_discount, resolve_promo, PromoOutcome};
use crate::surcharge::fast_track_surcharge;
use crate::tables::PricingTables;
use crate::types::{Currency, QuoteRequest, ServiceCatalogItem};

// =============================================================================
// Output Types
// =============================================================================

/// One selected service, converted to the quote currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub government_fee: Money,
    pub professional_fee: Money,
}

/// A computed quote. All amounts are in `currency`.
///
/// ## Invariants
/// - `taxable_amount >= 0`
/// - `grand_total == taxable_amount + vat`
/// - `amount_due == grand_total + total_government_fees`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub currency: Currency,
    /// Cart order, duplicates removed.
    pub line_items: Vec<LineItem>,

    pub base_professional_subtotal: Money,
    pub fast_track_surcharge: Money,
    /// Sum of satisfied bundle discounts. Not clamped: it may exceed the
    /// professional subtotal, in which case `taxable_amount` bottoms out at 0.
    pub bundle_discount: Money,
    pub applied_bundles: Vec<AppliedBundle>,
    pub promo: PromoOutcome,
    pub promo_discount: Money,
    pub taxable_amount: Money,
    pub vat: Money,
    pub grand_total: Money,

    /// Pass-through regulatory fees, untaxed and undiscounted.
    pub total_government_fees: Money,
    /// `bundle_discount + promo_discount`.
    pub total_discount: Money,
    /// What the client pays: `grand_total + total_government_fees`.
    pub amount_due: Money,
}

// =============================================================================
// Engine Operations
// =============================================================================

/// Computes the invoice for `request`.
///
/// ## Errors
/// - `UnknownService` if any cart id is missing from the catalog
/// - `CartTooLarge` if the cart exceeds `MAX_CART_ITEMS`
///
/// An unrecognized promo code is not an error; see [`Invoice::promo`].
pub fn compute_invoice(tables: &PricingTables, request: &QuoteRequest) -> CoreResult<Invoice> {
    let cart = Cart::from_ids(request.cart_ids.iter().map(String::as_str));
    cart.check_size()?;

    let converter = tables.rates().converter(request.currency);
    let services = resolve_services(tables, &cart)?;

    // 1. Lines, converted one value at a time
    let line_items: Vec<LineItem> = services
        .iter()
        .map(|item| line_item(item, &converter))
        .collect();
    let base_professional_subtotal: Money = line_items.iter().map(|line| line.professional_fee).sum();
    let total_government_fees: Money = line_items.iter().map(|line| line.government_fee).sum();

    // 2. Surcharge
    let surcharge = fast_track_surcharge(
        base_professional_subtotal,
        request.fast_track,
        tables.rates().fast_track,
    );

    // 3. Bundles
    let bundles = match_bundles(&cart, tables.bundles(), &converter);

    // 4-6. Promo and taxable amount
    let discountable_base = base_professional_subtotal + surcharge - bundles.total;
    let promo = resolve_promo(tables.promos(), request.promo_code.as_deref());
    let promo_off = promo_discount(&promo, discountable_base);
    let taxable_amount = (discountable_base - promo_off).clamp_non_negative();

    // 7-8. Tax
    let vat = taxable_amount.apply_rate(tables.rates().vat);
    let grand_total = taxable_amount + vat;

    debug!(
        currency = %request.currency,
        lines = line_items.len(),
        base = %base_professional_subtotal,
        surcharge = %surcharge,
        bundle_discount = %bundles.total,
        promo_discount = %promo_off,
        taxable = %taxable_amount,
        vat = %vat,
        grand_total = %grand_total,
        "Invoice computed"
    );

    Ok(Invoice {
        currency: request.currency,
        line_items,
        base_professional_subtotal,
        fast_track_surcharge: surcharge,
        bundle_discount: bundles.total,
        applied_bundles: bundles.applied,
        promo,
        promo_discount: promo_off,
        taxable_amount,
        vat,
        grand_total,
        total_government_fees,
        total_discount: bundles.total + promo_off,
        amount_due: grand_total + total_government_fees,
    })
}

/// Recommends up to two services to add to `cart_ids`.
///
/// Fails with `UnknownService` on ids outside the catalog, like
/// [`compute_invoice`].
pub fn recommend_upsells(
    tables: &PricingTables,
    cart_ids: &[String],
) -> CoreResult<Vec<ServiceCatalogItem>> {
    let cart = Cart::from_ids(cart_ids.iter().map(String::as_str));
    cart.check_size()?;
    resolve_services(tables, &cart)?;
    Ok(tables.upsells().recommend(&cart, tables.catalog()))
}

fn resolve_services<'t>(
    tables: &'t PricingTables,
    cart: &Cart,
) -> CoreResult<Vec<&'t ServiceCatalogItem>> {
    cart.iter().map(|id| tables.catalog().require(id)).collect()
}

fn line_item(item: &ServiceCatalogItem, converter: &CurrencyConverter) -> LineItem {
    LineItem {
        id: item.id.clone(),
        name: item.name.clone(),
        description: item.description.clone(),
        government_fee: converter.convert(item.government_fee()),
        professional_fee: converter.convert(item.professional_fee()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
