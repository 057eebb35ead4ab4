//! # State Module
//!
//! Application state for the desk shell, split the same way commands use it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐     │
//! │  │         QuoteState           │  │         ConfigState          │     │
//! │  │                              │  │                              │     │
//! │  │  Arc<Mutex<QuoteDraft>>      │  │  Arc<PricingTables>          │     │
//! │  │  • quote id, timestamps      │  │  • catalog, bundles, promos  │     │
//! │  │  • cart, fast track          │  │  • rates                     │     │
//! │  │  • promo code, currency      │  │  • default currency          │     │
//! │  └──────────────────────────────┘  └──────────────────────────────┘     │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • QuoteState: exclusive access through the mutex                       │
//! │  • ConfigState: read-only after startup                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod quote;

pub use config::{
    ConfigState, DeskConfig, ENV_CONFIG_PATH, ENV_DEFAULT_CURRENCY, ENV_FAST_TRACK_RATE,
    ENV_USD_RATE, ENV_VAT_RATE,
};
pub use quote::{QuoteDraft, QuoteState};
