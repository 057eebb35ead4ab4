//! # quote-core: Pure Pricing Engine for Consultancy Quotations
//!
//! This crate turns a selection of consultancy services into an itemized
//! invoice: fast-track surcharge, automatic bundle discounts, promo codes,
//! VAT and SAR/USD conversion. It contains no I/O of any kind.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Quotation Engine Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 quote-desk (shell)                              │   │
//! │  │   stdin JSON ──► QuoteState (draft) ──► stdout JSON             │   │
//! │  │   config: defaults → TOML → env        logging: tracing         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ QuoteRequest snapshot                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quote-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │ catalog  │  │ currency │  │  bundle  │  │  promo   │       │   │
//! │  │   └────┬─────┘  └────┬─────┘  └────┬─────┘  └────┬─────┘       │   │
//! │  │        └─────────────┴──────┬──────┴─────────────┘             │   │
//! │  │   ┌──────────┐        ┌─────▼─────┐        ┌──────────┐        │   │
//! │  │   │surcharge │ ─────► │  invoice  │        │  upsell  │        │   │
//! │  │   └──────────┘        └───────────┘        └──────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO GLOBAL STATE • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ServiceCatalogItem, BundleDefinition, Rate, ...)
//! - [`money`] - Whole-unit Money with the single flooring primitive
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level checks used when loading tables
//! - [`cart`] - Ordered, duplicate-free selection
//! - [`catalog`] - Service lookup by id
//! - [`currency`] - SAR → quote currency conversion
//! - [`bundle`] - Bundle matching and stacking
//! - [`promo`] - Promo code resolution and discount
//! - [`surcharge`] - Fast-track surcharge
//! - [`upsell`] - Rule-chain recommendations
//! - [`tables`] - Validated pricing tables
//! - [`seed`] - Built-in catalog, bundles, promos and upsell rules
//! - [`invoice`] - The totalizer and the two engine entry points
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same `QuoteRequest` + same tables = same invoice, byte for byte
//! 2. **Integer Money**: rates are basis points, every step floors exactly once
//! 3. **Fail Fast on Config**: bad tables are rejected when loaded, never mid-quote
//! 4. **Explicit Errors**: typed errors, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use quote_core::{compute_invoice, Currency, PricingTables, QuoteRequest};
//!
//! let tables = PricingTables::builtin()?;
//! let invoice = compute_invoice(
//!     &tables,
//!     &QuoteRequest {
//!         cart_ids: vec!["cr-registration".to_string()],
//!         fast_track: true,
//!         promo_code: None,
//!         currency: Currency::Sar,
//!     },
//! )?;
//!
//! // 4500 + 25% fast track = 5625, + 15% VAT = 6468 (floored)
//! assert_eq!(invoice.taxable_amount.units(), 5_625);
//! assert_eq!(invoice.grand_total.units(), 6_468);
//! # Ok::<(), quote_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundle;
pub mod cart;
pub mod catalog;
pub mod currency;
pub mod error;
pub mod invoice;
pub mod money;
pub mod promo;
pub mod seed;
pub mod surcharge;
pub mod tables;
pub mod types;
pub mod upsell;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bundle::{match_bundles, AppliedBundle};
pub use cart::Cart;
pub use catalog::Catalog;
pub use currency::CurrencyConverter;
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{compute_invoice, recommend_upsells, Invoice, LineItem};
pub use money::Money;
pub use promo::{promo_discount, resolve_promo, PromoOutcome, PromoRegistry};
pub use surcharge::fast_track_surcharge;
pub use tables::{PricingRates, PricingTables, TableConfig};
pub use types::*;
pub use upsell::{UpsellRule, UpsellRules, UpsellTrigger};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct services on one quote.
///
/// ## Business Reason
/// A real engagement tops out at a few dozen services; anything beyond this
/// is a runaway client.
pub const MAX_CART_ITEMS: usize = 100;

/// Largest fee or flat bundle discount accepted in the pricing tables, in
/// whole SAR (one trillion).
///
/// With at most [`MAX_CART_ITEMS`] lines and every rate capped by
/// [`validation`], the largest invoice figure stays below `10^17`, far inside
/// `i64`.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;
