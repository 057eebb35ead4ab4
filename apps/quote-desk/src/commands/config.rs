//! # Config Commands
//!
//! Read-only view of the loaded configuration, for building the service
//! picker and showing the rates in force.

use quote_core::{BundleDefinition, Currency, ServiceCatalogItem};
use serde::Serialize;
use tracing::debug;

use crate::state::ConfigState;

/// Rates as decimal strings (`"0.2666"`), the same notation the config
/// file uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesView {
    pub usd_exchange: String,
    pub fast_track: String,
    pub vat: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub default_currency: Currency,
    pub rates: RatesView,
    pub services: Vec<ServiceCatalogItem>,
    pub bundles: Vec<BundleDefinition>,
    /// Config file in effect, if any
    pub source: Option<String>,
}

/// Gets the current configuration.
///
/// Promo codes are not exposed.
pub fn get_config(config: &ConfigState) -> ConfigResponse {
    debug!("get_config command");

    let tables = config.tables();
    let rates = config.rates();

    ConfigResponse {
        default_currency: config.default_currency(),
        rates: RatesView {
            usd_exchange: rates.usd_exchange.to_string(),
            fast_track: rates.fast_track.to_string(),
            vat: rates.vat.to_string(),
        },
        services: tables.catalog().items().to_vec(),
        bundles: tables.bundles().to_vec(),
        source: config.source().map(|path| path.display().to_string()),
    }
}
