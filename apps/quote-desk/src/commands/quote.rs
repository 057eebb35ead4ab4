//! # Quote Commands
//!
//! Commands that edit the draft. Every one of them answers with a complete,
//! freshly computed [`QuoteResponse`].
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                         │
//! │  │  Empty   │────►│ Editing  │────►│  Quoted  │  (document rendered     │
//! │  │  Draft   │     │          │     │          │   by the caller)        │
//! │  └──────────┘     └──────────┘     └──────────┘                         │
//! │                        │                                                │
//! │                   add_service      set_fast_track    set_currency       │
//! │                   remove_service   apply_promo       clear_promo        │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_quote ──────────────────► (new empty draft)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use quote_core::promo::normalize_code;
use quote_core::{
    compute_invoice, recommend_upsells, Currency, Invoice, PromoOutcome, Rate, ServiceCatalogItem,
};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, QuoteDraft, QuoteState};

/// Draft snapshot plus everything derived from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub draft: QuoteDraft,
    pub invoice: Invoice,
    /// Zero to two suggested services
    pub upsells: Vec<ServiceCatalogItem>,
    /// Only set on the reply to `apply_promo`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_message: Option<String>,
}

/// Recomputes the invoice and upsells for the current draft.
fn respond(quote: &QuoteState, config: &ConfigState) -> Result<QuoteResponse, ApiError> {
    let draft = quote.snapshot();
    let tables = config.tables();

    let invoice = compute_invoice(&tables, &draft.to_request())?;
    let upsells = recommend_upsells(&tables, draft.cart.ids())?;

    Ok(QuoteResponse {
        draft,
        invoice,
        upsells,
        promo_message: None,
    })
}

/// Returns the current draft and its invoice.
pub fn get_quote(quote: &QuoteState, config: &ConfigState) -> Result<QuoteResponse, ApiError> {
    debug!("get_quote command");
    respond(quote, config)
}

/// Adds a catalog service to the draft.
///
/// ## Behavior
/// - Unknown id: rejected before the draft is touched
/// - Already selected: no-op, the quote is returned unchanged
pub fn add_service(
    quote: &QuoteState,
    config: &ConfigState,
    id: String,
) -> Result<QuoteResponse, ApiError> {
    debug!(id = %id, "add_service command");

    config.tables().catalog().require(&id)?;

    let added = quote.with_draft_mut(|draft| {
        let added = draft.cart.insert(id.as_str())?;
        if added {
            draft.touch();
        }
        Ok::<bool, ApiError>(added)
    })?;

    if !added {
        debug!(id = %id, "Service already on quote");
    }

    respond(quote, config)
}

/// Removes a service from the draft. Removing an absent id is a no-op.
pub fn remove_service(
    quote: &QuoteState,
    config: &ConfigState,
    id: String,
) -> Result<QuoteResponse, ApiError> {
    debug!(id = %id, "remove_service command");

    quote.with_draft_mut(|draft| {
        if draft.cart.remove(&id) {
            draft.touch();
        }
    });

    respond(quote, config)
}

/// Turns expedited processing on or off.
pub fn set_fast_track(
    quote: &QuoteState,
    config: &ConfigState,
    enabled: bool,
) -> Result<QuoteResponse, ApiError> {
    debug!(enabled, "set_fast_track command");

    quote.with_draft_mut(|draft| {
        draft.fast_track = enabled;
        draft.touch();
    });

    respond(quote, config)
}

/// Applies a promo code, replacing any previous one.
///
/// A blank code clears the promo. An unknown code is kept on the draft and
/// reported through `promo_message`; it is not an error.
pub fn apply_promo(
    quote: &QuoteState,
    config: &ConfigState,
    code: String,
) -> Result<QuoteResponse, ApiError> {
    debug!(code = %code, "apply_promo command");

    let code = normalize_code(&code);
    quote.with_draft_mut(|draft| {
        draft.promo_code = code;
        draft.touch();
    });

    let mut response = respond(quote, config)?;
    response.promo_message = promo_message(&response.invoice.promo);
    Ok(response)
}

/// Removes the promo code.
pub fn clear_promo(quote: &QuoteState, config: &ConfigState) -> Result<QuoteResponse, ApiError> {
    debug!("clear_promo command");

    quote.with_draft_mut(|draft| {
        draft.promo_code = None;
        draft.touch();
    });

    respond(quote, config)
}

/// Switches the currency the invoice is expressed in.
pub fn set_currency(
    quote: &QuoteState,
    config: &ConfigState,
    currency: Currency,
) -> Result<QuoteResponse, ApiError> {
    debug!(%currency, "set_currency command");

    quote.with_draft_mut(|draft| {
        draft.currency = currency;
        draft.touch();
    });

    respond(quote, config)
}

/// Discards the draft and starts a new one with a new quote id.
pub fn clear_quote(quote: &QuoteState, config: &ConfigState) -> Result<QuoteResponse, ApiError> {
    debug!("clear_quote command");

    let fresh = QuoteDraft::new(quote.default_currency());
    quote.with_draft_mut(|draft| *draft = fresh);

    respond(quote, config)
}

fn promo_message(outcome: &PromoOutcome) -> Option<String> {
    match outcome {
        PromoOutcome::NotSupplied => None,
        PromoOutcome::Applied { code, rate } => Some(format!(
            "Promo code {} applied: {} off professional fees",
            code,
            percent(*rate)
        )),
        PromoOutcome::Invalid { code } => Some(format!("Promo code {} is not valid", code)),
    }
}

/// `1000` bps → `10%`, `1250` bps → `12.5%`.
fn percent(rate: Rate) -> String {
    let bps = rate.bps();
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        format!("{}%", whole)
    } else {
        let frac = format!("{:02}", frac);
        format!("{}.{}%", whole, frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn setup() -> (QuoteState, ConfigState) {
        let config = ConfigState::builtin().unwrap();
        (QuoteState::new(config.default_currency()), config)
    }

    #[test]
    fn test_add_service_recomputes_invoice() {
        let (quote, config) = setup();

        let response = add_service(&quote, &config, "cr-registration".to_string()).unwrap();

        assert_eq!(response.invoice.line_items.len(), 1);
        assert_eq!(response.invoice.base_professional_subtotal.units(), 4_500);
        assert_eq!(response.invoice.grand_total.units(), 5_175);
        assert_eq!(response.draft.cart.ids(), ["cr-registration".to_string()]);
        assert!(response.promo_message.is_none());
    }

    #[test]
    fn test_add_unknown_service_leaves_draft_untouched() {
        let (quote, config) = setup();
        let before = quote.snapshot();

        let err = add_service(&quote, &config, "ghost".to_string()).unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(quote.snapshot(), before);
    }

    #[test]
    fn test_add_twice_is_idempotent() {
        let (quote, config) = setup();
        add_service(&quote, &config, "cr-registration".to_string()).unwrap();
        let response = add_service(&quote, &config, "cr-registration".to_string()).unwrap();
        assert_eq!(response.draft.cart.len(), 1);
    }

    #[test]
    fn test_remove_service() {
        let (quote, config) = setup();
        add_service(&quote, &config, "cr-registration".to_string()).unwrap();

        let response = remove_service(&quote, &config, "cr-registration".to_string()).unwrap();
        assert!(response.invoice.line_items.is_empty());

        // Absent id is a no-op
        assert!(remove_service(&quote, &config, "cr-registration".to_string()).is_ok());
    }

    #[test]
    fn test_fast_track_toggle() {
        let (quote, config) = setup();
        add_service(&quote, &config, "cr-registration".to_string()).unwrap();

        let response = set_fast_track(&quote, &config, true).unwrap();
        assert_eq!(response.invoice.fast_track_surcharge.units(), 1_125);

        let response = set_fast_track(&quote, &config, false).unwrap();
        assert!(response.invoice.fast_track_surcharge.is_zero());
    }

    #[test]
    fn test_apply_promo_messages() {
        let (quote, config) = setup();
        add_service(&quote, &config, "cr-registration".to_string()).unwrap();

        let response = apply_promo(&quote, &config, " welcome10 ".to_string()).unwrap();
        assert_eq!(response.invoice.promo_discount.units(), 450);
        assert_eq!(
            response.promo_message.as_deref(),
            Some("Promo code WELCOME10 applied: 10% off professional fees")
        );
        assert_eq!(response.draft.promo_code.as_deref(), Some("WELCOME10"));

        let response = apply_promo(&quote, &config, "bogus".to_string()).unwrap();
        assert!(response.invoice.promo.is_invalid());
        assert!(response.invoice.promo_discount.is_zero());
        assert_eq!(
            response.promo_message.as_deref(),
            Some("Promo code BOGUS is not valid")
        );

        // The message is transient
        let response = get_quote(&quote, &config).unwrap();
        assert!(response.promo_message.is_none());
        assert!(response.invoice.promo.is_invalid());
    }

    #[test]
    fn test_blank_promo_clears() {
        let (quote, config) = setup();
        apply_promo(&quote, &config, "WELCOME10".to_string()).unwrap();

        let response = apply_promo(&quote, &config, "   ".to_string()).unwrap();
        assert!(response.draft.promo_code.is_none());
        assert!(response.promo_message.is_none());

        apply_promo(&quote, &config, "WELCOME10".to_string()).unwrap();
        let response = clear_promo(&quote, &config).unwrap();
        assert_eq!(response.invoice.promo, PromoOutcome::NotSupplied);
    }

    #[test]
    fn test_set_currency_converts() {
        let (quote, config) = setup();
        add_service(&quote, &config, "misa-license".to_string()).unwrap();

        let response = set_currency(&quote, &config, Currency::Usd).unwrap();
        assert_eq!(response.invoice.currency, Currency::Usd);
        // floor(12000 * 0.2666) = 3199
        assert_eq!(response.invoice.base_professional_subtotal.units(), 3_199);
    }

    #[test]
    fn test_clear_quote_starts_new_draft() {
        let (quote, config) = setup();
        let first = add_service(&quote, &config, "cr-registration".to_string()).unwrap();
        set_currency(&quote, &config, Currency::Usd).unwrap();

        let response = clear_quote(&quote, &config).unwrap();

        assert!(response.draft.cart.is_empty());
        assert_eq!(response.draft.currency, Currency::Sar);
        assert_ne!(response.draft.quote_id, first.draft.quote_id);
        assert!(response.invoice.grand_total.is_zero());
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(Rate::from_bps(1000)), "10%");
        assert_eq!(percent(Rate::from_bps(1250)), "12.5%");
        assert_eq!(percent(Rate::from_bps(1505)), "15.05%");
    }
}
