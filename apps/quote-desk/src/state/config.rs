//! # Configuration State
//!
//! Pricing tables and desk settings, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUOTE_USD_RATE=0.2700                                              │
//! │     QUOTE_VAT_RATE=0.15                                                │
//! │     QUOTE_FAST_TRACK_RATE=0.25                                         │
//! │     QUOTE_DEFAULT_CURRENCY=USD                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $QUOTE_CONFIG_PATH, or                                             │
//! │     ~/.config/quote-desk/quote.toml (Linux)                            │
//! │     ~/Library/Application Support/com.quote.desk/quote.toml (macOS)    │
//! │                                                                         │
//! │  3. Built-in seed tables (lowest priority)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! default_currency = "SAR"
//!
//! [pricing.rates]
//! usd_exchange = "0.2666"
//! fast_track = "0.25"
//! vat = "0.15"
//!
//! [[pricing.promos]]
//! code = "RAMADAN15"
//! rate = "0.15"
//! ```
//!
//! Any `pricing` section left out keeps the built-in seeds. Everything is
//! validated before the first command is served; a bad table aborts startup.
//!
//! ## Thread Safety
//! Read-only after load. The tables sit behind an `Arc` so command handlers
//! can hold them without borrowing the state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quote_core::{Currency, PricingRates, PricingTables, Rate, TableConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Explicit config file location.
pub const ENV_CONFIG_PATH: &str = "QUOTE_CONFIG_PATH";
/// SAR → USD exchange rate override.
pub const ENV_USD_RATE: &str = "QUOTE_USD_RATE";
/// VAT rate override.
pub const ENV_VAT_RATE: &str = "QUOTE_VAT_RATE";
/// Fast-track surcharge rate override.
pub const ENV_FAST_TRACK_RATE: &str = "QUOTE_FAST_TRACK_RATE";
/// Currency new drafts start in.
pub const ENV_DEFAULT_CURRENCY: &str = "QUOTE_DEFAULT_CURRENCY";

const CONFIG_FILE_NAME: &str = "quote.toml";

// =============================================================================
// File Shape
// =============================================================================

/// Everything the config file may contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Currency of a fresh draft.
    #[serde(default)]
    pub default_currency: Currency,

    /// Pricing tables; omitted sections fall back to the seeds.
    #[serde(default)]
    pub pricing: TableConfig,
}

impl DeskConfig {
    /// Applies `QUOTE_*` overrides found through `lookup`. A value that does
    /// not parse is an error, never silently skipped.
    fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rates = &mut self.pricing.rates;
        for (var, slot) in [
            (ENV_USD_RATE, &mut rates.usd_exchange),
            (ENV_VAT_RATE, &mut rates.vat),
            (ENV_FAST_TRACK_RATE, &mut rates.fast_track),
        ] {
            if let Some(value) = lookup(var) {
                *slot = parse_env::<Rate>(var, &value)?;
                debug!(var, rate = %slot, "Overriding rate from environment");
            }
        }

        if let Some(value) = lookup(ENV_DEFAULT_CURRENCY) {
            self.default_currency = parse_env(ENV_DEFAULT_CURRENCY, &value)?;
            debug!(currency = %self.default_currency, "Overriding default currency from environment");
        }

        Ok(())
    }
}

fn parse_env<T>(var: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Config State
// =============================================================================

/// Loaded, validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigState {
    settings: DeskConfig,
    tables: Arc<PricingTables>,
    source: Option<PathBuf>,
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Built-in seeds
    /// 2. Config file (`path`, else `$QUOTE_CONFIG_PATH`, else the platform
    ///    config dir)
    /// 3. Environment variables
    /// 4. Validation of the merged tables
    pub fn load(path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(path, |var| std::env::var(var).ok())
    }

    /// [`ConfigState::load`] with an injectable environment.
    pub fn load_with<F>(path: Option<PathBuf>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = path.or_else(|| lookup(ENV_CONFIG_PATH).map(PathBuf::from));

        let (mut settings, source) = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => (read_file(&path)?, Some(path)),
            None => match default_config_path() {
                Some(path) if path.exists() => (read_file(&path)?, Some(path)),
                Some(path) => {
                    debug!(?path, "Config file not found, using built-in tables");
                    (DeskConfig::default(), None)
                }
                None => (DeskConfig::default(), None),
            },
        };

        settings.apply_overrides(lookup)?;
        let state = Self::from_settings(settings, source)?;

        info!(
            services = state.tables.catalog().len(),
            bundles = state.tables.bundles().len(),
            promos = state.tables.promos().len(),
            default_currency = %state.settings.default_currency,
            source = ?state.source,
            "Configuration loaded"
        );

        Ok(state)
    }

    /// Validates `settings` and builds the pricing tables.
    pub fn from_settings(settings: DeskConfig, source: Option<PathBuf>) -> ConfigResult<Self> {
        let tables = PricingTables::from_config(settings.pricing.clone())?;
        Ok(ConfigState {
            settings,
            tables: Arc::new(tables),
            source,
        })
    }

    /// Built-in tables, no file, no environment.
    pub fn builtin() -> ConfigResult<Self> {
        Self::from_settings(DeskConfig::default(), None)
    }

    /// Shared handle to the validated tables.
    pub fn tables(&self) -> Arc<PricingTables> {
        Arc::clone(&self.tables)
    }

    pub fn default_currency(&self) -> Currency {
        self.settings.default_currency
    }

    pub fn rates(&self) -> &PricingRates {
        self.tables.rates()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn read_file(path: &Path) -> ConfigResult<DeskConfig> {
    info!(?path, "Loading config from file");
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Returns the default config file path.
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "quote", "desk")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    fn temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quote-desk-{}.toml", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_builtin_defaults() {
        let config = ConfigState::builtin().unwrap();
        assert_eq!(config.default_currency(), Currency::Sar);
        assert_eq!(config.rates().vat, Rate::from_bps(1500));
        assert!(config.source().is_none());
    }

    #[test]
    fn test_file_overrides_seeds() {
        let path = temp_config(
            r#"
default_currency = "USD"

[pricing.rates]
usd_exchange = "0.27"

[[pricing.promos]]
code = "RAMADAN15"
rate = "0.15"
"#,
        );

        let config = ConfigState::load_with(Some(path.clone()), env(&[])).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.default_currency(), Currency::Usd);
        assert_eq!(config.rates().usd_exchange, Rate::from_bps(2700));
        assert_eq!(config.rates().fast_track, Rate::from_bps(2500));
        assert_eq!(config.tables().promos().len(), 1);
        assert!(config.tables().catalog().contains("cr-registration"));
        assert_eq!(config.source(), Some(path.as_path()));
    }

    #[test]
    fn test_env_overrides_file() {
        let path = temp_config("[pricing.rates]\nvat = \"0.05\"\n");
        let lookup = env(&[
            (ENV_CONFIG_PATH, path.to_str().unwrap()),
            (ENV_VAT_RATE, "0.15"),
            (ENV_DEFAULT_CURRENCY, "usd"),
        ]);

        let config = ConfigState::load_with(None, lookup).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rates().vat, Rate::from_bps(1500));
        assert_eq!(config.default_currency(), Currency::Usd);
    }

    #[test]
    fn test_malformed_env_is_fatal() {
        let err = ConfigState::load_with(None, env(&[(ENV_USD_RATE, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == ENV_USD_RATE));

        let err = ConfigState::load_with(None, env(&[(ENV_DEFAULT_CURRENCY, "EUR")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_zero_exchange_rate_is_fatal() {
        let err = ConfigState::load_with(None, env(&[(ENV_USD_RATE, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Tables(_)));
    }

    #[test]
    fn test_out_of_range_rate_overrides_are_fatal() {
        // 5 means 500% VAT, not 5%
        let err = ConfigState::load_with(None, env(&[(ENV_VAT_RATE, "5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Tables(_)));

        let err =
            ConfigState::load_with(None, env(&[(ENV_FAST_TRACK_RATE, "400000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Tables(_)));

        let err = ConfigState::load_with(None, env(&[(ENV_USD_RATE, "250")])).unwrap_err();
        assert!(matches!(err, ConfigError::Tables(_)));

        let config = ConfigState::load_with(None, env(&[(ENV_VAT_RATE, "1")])).unwrap();
        assert_eq!(config.rates().vat, Rate::ONE);
    }

    #[test]
    fn test_oversized_fee_in_file_is_fatal() {
        let path = temp_config(
            r#"
[[pricing.services]]
id = "gold-plated"
name = "Gold Plated"
description = "Too expensive to add up"
professional_fee = 5000000000000000000
government_fee = 0
category = "general"
"#,
        );
        let err = ConfigState::load_with(Some(path.clone()), env(&[])).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            ConfigError::Tables(quote_core::CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_fatal() {
        let missing = std::env::temp_dir().join(format!("absent-{}.toml", Uuid::new_v4()));
        let err = ConfigState::load_with(Some(missing), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_bad_toml_is_fatal() {
        let path = temp_config("default_currency = [");
        let err = ConfigState::load_with(Some(path.clone()), env(&[])).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bundle_pointing_at_unknown_service_is_fatal() {
        let path = temp_config(
            r#"
[[pricing.bundles]]
id = "ghost-pack"
name = "Ghost Pack"
required_item_ids = ["cr-registration", "ghost"]
discount_amount = 500
"#,
        );
        let err = ConfigState::load_with(Some(path.clone()), env(&[])).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Tables(_)));
    }
}
