//! # Quote State
//!
//! The single mutable thing in the system: the draft being edited.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  Command                  Draft Change               Then               │
//! │  ───────                  ────────────               ────               │
//! │                                                                         │
//! │  add_service ───────────► cart.insert(id) ────────┐                     │
//! │  remove_service ────────► cart.remove(id) ────────┤                     │
//! │  set_fast_track ────────► fast_track = b ─────────┤  snapshot →         │
//! │  apply_promo ───────────► promo_code = Some(c) ───┼─► QuoteRequest →    │
//! │  clear_promo ───────────► promo_code = None ──────┤  compute_invoice    │
//! │  set_currency ──────────► currency = c ───────────┤                     │
//! │  clear_quote ───────────► fresh draft, new id ────┘                     │
//! │                                                                         │
//! │  The invoice is never stored: it is recomputed from a snapshot after    │
//! │  every change and the previous one is simply dropped.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use quote_core::{Cart, Currency, QuoteRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The quote currently being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    /// Fresh for every new draft, including after `clear_quote`
    pub quote_id: Uuid,

    /// Selected service ids in display order
    pub cart: Cart,

    pub fast_track: bool,

    /// Code as typed; normalized by the engine
    pub promo_code: Option<String>,

    pub currency: Currency,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteDraft {
    /// Creates an empty draft in `currency`.
    pub fn new(currency: Currency) -> Self {
        let now = Utc::now();
        QuoteDraft {
            quote_id: Uuid::new_v4(),
            cart: Cart::new(),
            fast_track: false,
            promo_code: None,
            currency,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of everything the invoice depends on.
    pub fn to_request(&self) -> QuoteRequest {
        QuoteRequest {
            cart_ids: self.cart.ids().to_vec(),
            fast_track: self.fast_track,
            promo_code: self.promo_code.clone(),
            currency: self.currency,
        }
    }

    /// Marks the draft as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Shared quote draft.
///
/// ## Thread Safety
/// `Arc<Mutex<QuoteDraft>>`: every command takes the lock, mutates, clones a
/// snapshot and releases it before any pricing runs.
#[derive(Debug, Clone)]
pub struct QuoteState {
    draft: Arc<Mutex<QuoteDraft>>,
    default_currency: Currency,
}

impl QuoteState {
    /// Creates state holding an empty draft.
    pub fn new(default_currency: Currency) -> Self {
        QuoteState {
            draft: Arc::new(Mutex::new(QuoteDraft::new(default_currency))),
            default_currency,
        }
    }

    /// Currency a cleared draft starts in.
    pub fn default_currency(&self) -> Currency {
        self.default_currency
    }

    /// Executes a function with read access to the draft.
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&QuoteDraft) -> R,
    {
        let draft = self.lock();
        f(&draft)
    }

    /// Executes a function with write access to the draft.
    pub fn with_draft_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut QuoteDraft) -> R,
    {
        let mut draft = self.lock();
        f(&mut draft)
    }

    /// Clones the current draft.
    pub fn snapshot(&self) -> QuoteDraft {
        self.with_draft(QuoteDraft::clone)
    }

    /// Every draft field is valid on its own, so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, QuoteDraft> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_empty() {
        let state = QuoteState::new(Currency::Usd);
        let draft = state.snapshot();

        assert!(draft.cart.is_empty());
        assert!(!draft.fast_track);
        assert!(draft.promo_code.is_none());
        assert_eq!(draft.currency, Currency::Usd);
        assert_eq!(draft.created_at, draft.updated_at);
    }

    #[test]
    fn test_request_snapshot_keeps_cart_order() {
        let state = QuoteState::new(Currency::Sar);
        state.with_draft_mut(|draft| {
            draft.cart.insert("b").unwrap();
            draft.cart.insert("a").unwrap();
            draft.fast_track = true;
            draft.promo_code = Some("welcome10".to_string());
        });

        let request = state.with_draft(QuoteDraft::to_request);
        assert_eq!(request.cart_ids, vec!["b".to_string(), "a".to_string()]);
        assert!(request.fast_track);
        assert_eq!(request.promo_code.as_deref(), Some("welcome10"));
    }

    #[test]
    fn test_clones_share_the_draft() {
        let state = QuoteState::new(Currency::Sar);
        let other = state.clone();
        other.with_draft_mut(|draft| draft.fast_track = true);
        assert!(state.snapshot().fast_track);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let state = QuoteState::new(Currency::Sar);
        let poisoner = state.clone();
        let _ = std::thread::spawn(move || {
            poisoner.with_draft_mut(|_| panic!("command panicked"));
        })
        .join();

        state.with_draft_mut(|draft| draft.fast_track = true);
        assert!(state.snapshot().fast_track);
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let draft = QuoteDraft::new(Currency::Sar);
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("quoteId").is_some());
        assert_eq!(json["fastTrack"], false);
        assert_eq!(json["cart"], serde_json::json!([]));
    }
}
