//! # Pricing Tables
//!
//! The static configuration the engine prices against, validated once.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TableConfig (serde, raw)                                               │
//! │    │  built-in seeds, or a config file parsed by the shell              │
//! │    ▼                                                                    │
//! │  PricingTables::from_config  ◄── validates EVERYTHING, fails fast       │
//! │    │  • ids well-formed and unique                                      │
//! │    │  • fees and bundle discounts within [0, MAX_AMOUNT_UNITS]          │
//! │    │  • bundles non-empty and referencing known services                │
//! │    │  • promo codes uppercase, rates in [0, 1)                          │
//! │    │  • exchange rate in (0, 100], VAT and fast track in [0, 1]         │
//! │    │  • upsell targets exist                                            │
//! │    ▼                                                                    │
//! │  PricingTables (immutable, Send + Sync, shared behind Arc)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::currency::CurrencyConverter;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::promo::PromoRegistry;
use crate::seed::builtin_config;
use crate::types::{BundleDefinition, Currency, PromoCode, Rate, ServiceCatalogItem};
use crate::upsell::{UpsellRule, UpsellRules};
use crate::validation::{
    validate_amount, validate_exchange_rate, validate_service_id, validate_surcharge_rate,
    validate_tax_rate,
};

// =============================================================================
// Rates
// =============================================================================

/// Every rate the totalizer applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRates {
    /// SAR → USD multiplier.
    #[serde(default = "default_usd_exchange")]
    pub usd_exchange: Rate,

    /// Fast-track surcharge on the professional subtotal.
    #[serde(default = "default_fast_track")]
    pub fast_track: Rate,

    /// VAT on the post-discount taxable amount.
    #[serde(default = "default_vat")]
    pub vat: Rate,
}

fn default_usd_exchange() -> Rate {
    Rate::from_bps(2_666)
}

fn default_fast_track() -> Rate {
    Rate::from_bps(2_500)
}

fn default_vat() -> Rate {
    Rate::from_bps(1_500)
}

impl Default for PricingRates {
    fn default() -> Self {
        PricingRates {
            usd_exchange: default_usd_exchange(),
            fast_track: default_fast_track(),
            vat: default_vat(),
        }
    }
}

impl PricingRates {
    /// Converter for the given quote currency.
    pub fn converter(&self, currency: Currency) -> CurrencyConverter {
        CurrencyConverter::new(currency, self.usd_exchange)
    }
}

// =============================================================================
// Raw Configuration
// =============================================================================

/// Unvalidated pricing configuration, as read from seeds or a file.
///
/// Omitted sections fall back to the built-in seed tables.
///
/// ## Example (TOML)
/// ```toml
/// fallback_upsell = "legal-consultation"
///
/// [rates]
/// usd_exchange = "0.2666"
/// fast_track = "0.25"
/// vat = "0.15"
///
/// [[promos]]
/// code = "WELCOME10"
/// rate = "0.10"
///
/// [[upsell_rules]]
/// trigger = { contains_any = ["misa-license"] }
/// suggest = "cr-registration"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub rates: PricingRates,
    pub services: Vec<ServiceCatalogItem>,
    pub bundles: Vec<BundleDefinition>,
    pub promos: Vec<PromoCode>,
    pub upsell_rules: Vec<UpsellRule>,
    pub fallback_upsell: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        builtin_config()
    }
}

// =============================================================================
// Validated Tables
// =============================================================================

/// Validated, indexed pricing tables.
#[derive(Debug, Clone)]
pub struct PricingTables {
    catalog: Catalog,
    bundles: Vec<BundleDefinition>,
    promos: PromoRegistry,
    upsells: UpsellRules,
    rates: PricingRates,
}

impl PricingTables {
    /// Validates `config` and builds the lookup structures.
    ///
    /// Any error here is a configuration error and should stop startup.
    pub fn from_config(config: TableConfig) -> CoreResult<Self> {
        validate_exchange_rate(config.rates.usd_exchange)?;
        validate_surcharge_rate(config.rates.fast_track)?;
        validate_tax_rate(config.rates.vat)?;

        let catalog = Catalog::new(config.services)?;
        validate_bundles(&config.bundles, &catalog)?;
        let promos = PromoRegistry::new(config.promos)?;
        let upsells = UpsellRules::new(config.upsell_rules, config.fallback_upsell, &catalog)?;

        debug!(
            services = catalog.len(),
            bundles = config.bundles.len(),
            promos = promos.len(),
            upsell_rules = upsells.rules().len(),
            usd_exchange = %config.rates.usd_exchange,
            "Pricing tables loaded"
        );

        Ok(PricingTables {
            catalog,
            bundles: config.bundles,
            promos,
            upsells,
            rates: config.rates,
        })
    }

    /// The built-in seed tables.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_config(builtin_config())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bundles(&self) -> &[BundleDefinition] {
        &self.bundles
    }

    pub fn promos(&self) -> &PromoRegistry {
        &self.promos
    }

    pub fn upsells(&self) -> &UpsellRules {
        &self.upsells
    }

    pub fn rates(&self) -> &PricingRates {
        &self.rates
    }
}

fn validate_bundles(bundles: &[BundleDefinition], catalog: &Catalog) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(bundles.len());

    for bundle in bundles {
        validate_service_id(&bundle.id)?;
        validate_amount("discount_amount", bundle.discount_amount)?;

        if !seen.insert(bundle.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "bundle id".to_string(),
                value: bundle.id.clone(),
            }
            .into());
        }

        if bundle.required_item_ids.is_empty() {
            return Err(CoreError::EmptyBundle(bundle.id.clone()));
        }

        if let Some(missing) = bundle
            .required_item_ids
            .iter()
            .find(|id| !catalog.contains(id))
        {
            return Err(CoreError::UnknownBundleItem {
                bundle: bundle.id.clone(),
                item: missing.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        let tables = PricingTables::builtin().unwrap();
        assert!(tables.catalog().len() >= 10);
        assert_eq!(tables.bundles().len(), 4);
        assert_eq!(tables.promos().len(), 3);
        assert_eq!(tables.rates().usd_exchange, Rate::from_bps(2666));
        assert_eq!(tables.upsells().fallback(), Some("legal-consultation"));
    }

    #[test]
    fn test_zero_exchange_rate_is_fatal() {
        let mut config = TableConfig::default();
        config.rates.usd_exchange = Rate::zero();
        assert!(PricingTables::from_config(config).is_err());
    }

    #[test]
    fn test_out_of_range_vat_and_fast_track_are_fatal() {
        let mut config = TableConfig::default();
        config.rates.vat = Rate::from_bps(50_000);
        assert!(matches!(
            PricingTables::from_config(config),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let mut config = TableConfig::default();
        config.rates.fast_track = Rate::from_bps(4_000_000_000);
        assert!(PricingTables::from_config(config).is_err());

        // Full rate is still a legal ceiling
        let mut config = TableConfig::default();
        config.rates.vat = Rate::ONE;
        config.rates.fast_track = Rate::ONE;
        assert!(PricingTables::from_config(config).is_ok());
    }

    #[test]
    fn test_oversized_fee_is_fatal() {
        let mut config = TableConfig::default();
        config.services[0].professional_fee = 5_000_000_000_000_000_000;
        config.services[1].professional_fee = 5_000_000_000_000_000_000;
        assert!(matches!(
            PricingTables::from_config(config),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let mut config = TableConfig::default();
        config.bundles[0].discount_amount = crate::MAX_AMOUNT_UNITS + 1;
        assert!(PricingTables::from_config(config).is_err());
    }

    #[test]
    fn test_bundle_with_unknown_item_is_fatal() {
        let mut config = TableConfig::default();
        config.bundles[0].required_item_ids.push("ghost".to_string());
        assert!(matches!(
            PricingTables::from_config(config),
            Err(CoreError::UnknownBundleItem { item, .. }) if item == "ghost"
        ));
    }

    #[test]
    fn test_empty_bundle_is_fatal() {
        let mut config = TableConfig::default();
        config.bundles[1].required_item_ids.clear();
        assert!(matches!(
            PricingTables::from_config(config),
            Err(CoreError::EmptyBundle(_))
        ));
    }

    #[test]
    fn test_negative_bundle_discount_is_fatal() {
        let mut config = TableConfig::default();
        config.bundles[0].discount_amount = -1;
        assert!(PricingTables::from_config(config).is_err());
    }

    #[test]
    fn test_duplicate_bundle_id_is_fatal() {
        let mut config = TableConfig::default();
        let copy = config.bundles[0].clone();
        config.bundles.push(copy);
        assert!(PricingTables::from_config(config).is_err());
    }

    #[test]
    fn test_partial_config_falls_back_to_seeds() {
        let json = r#"{ "rates": { "usd_exchange": "0.2700" }, "promos": [] }"#;
        let config: TableConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.rates.usd_exchange, Rate::from_bps(2700));
        assert_eq!(config.rates.vat, Rate::from_bps(1500));
        assert!(config.promos.is_empty());
        assert_eq!(config.services, TableConfig::default().services);

        let tables = PricingTables::from_config(config).unwrap();
        assert!(tables.promos().is_empty());
    }

    #[test]
    fn test_malformed_rate_is_rejected_at_parse() {
        let json = r#"{ "rates": { "vat": "-0.15" } }"#;
        assert!(serde_json::from_str::<TableConfig>(json).is_err());
    }
}
