//! # Upsell Recommender
//!
//! A fixed priority chain of rules that proposes up to two more services.
//! It never affects the invoice.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rules (in order)                       cart {misa-license}             │
//! │  ───────────────────────────────────    ─────────────────────────────   │
//! │  1. contains_any [misa-license]   → cr-registration        ✓ slot 1     │
//! │  2. contains_any [cr-registration]→ chamber-membership     ✗            │
//! │  3. category_keyword "licensing"  → zatca-vat-registration ✓ slot 2     │
//! │  4. ...                                                    (full)       │
//! │                                                                         │
//! │  A rule fires only if its target is not in the cart and not already     │
//! │  suggested. No rule fired at all → suggest the fallback item alone.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::types::ServiceCatalogItem;

/// Maximum number of suggestions returned.
pub const MAX_UPSELLS: usize = 2;

/// When a rule applies to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsellTrigger {
    /// At least one of these ids is in the cart.
    ContainsAny(Vec<String>),
    /// Some cart id contains this substring.
    IdKeyword(String),
    /// Some cart item's category contains this substring (case-insensitive).
    CategoryKeyword(String),
    /// The cart has nothing in it yet.
    EmptyCart,
}

/// One link of the priority chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsellRule {
    pub trigger: UpsellTrigger,
    /// Catalog id to suggest when the trigger matches.
    pub suggest: String,
}

impl UpsellTrigger {
    fn matches(&self, cart: &Cart, catalog: &Catalog) -> bool {
        match self {
            UpsellTrigger::ContainsAny(ids) => ids.iter().any(|id| cart.contains(id)),
            UpsellTrigger::IdKeyword(keyword) => cart.iter().any(|id| id.contains(keyword.as_str())),
            UpsellTrigger::CategoryKeyword(keyword) => {
                let keyword = keyword.to_lowercase();
                cart.iter()
                    .filter_map(|id| catalog.get(id))
                    .any(|item| item.category.to_lowercase().contains(&keyword))
            }
            UpsellTrigger::EmptyCart => cart.is_empty(),
        }
    }
}

/// The configured rule chain plus its fallback.
#[derive(Debug, Clone, Default)]
pub struct UpsellRules {
    rules: Vec<UpsellRule>,
    fallback: Option<String>,
}

impl UpsellRules {
    /// Builds the chain, rejecting suggestions that point outside the catalog.
    pub fn new(rules: Vec<UpsellRule>, fallback: Option<String>, catalog: &Catalog) -> CoreResult<Self> {
        let targets = rules.iter().map(|rule| &rule.suggest).chain(fallback.iter());
        for target in targets {
            if !catalog.contains(target) {
                return Err(CoreError::UnknownUpsellTarget(target.clone()));
            }
        }
        Ok(UpsellRules { rules, fallback })
    }

    pub fn rules(&self) -> &[UpsellRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Proposes up to [`MAX_UPSELLS`] services not already in `cart`.
    pub fn recommend(&self, cart: &Cart, catalog: &Catalog) -> Vec<ServiceCatalogItem> {
        let mut picks: Vec<&str> = Vec::with_capacity(MAX_UPSELLS);

        for rule in &self.rules {
            if picks.len() == MAX_UPSELLS {
                break;
            }
            let target = rule.suggest.as_str();
            if cart.contains(target) || picks.contains(&target) {
                continue;
            }
            if rule.trigger.matches(cart, catalog) {
                picks.push(target);
            }
        }

        if picks.is_empty() {
            if let Some(fallback) = self.fallback.as_deref() {
                if !cart.contains(fallback) {
                    picks.push(fallback);
                }
            }
        }

        debug!(cart_size = cart.len(), suggestions = ?picks, "Upsells recommended");

        picks
            .into_iter()
            .filter_map(|id| catalog.get(id).cloned())
            .collect()
    }
}
