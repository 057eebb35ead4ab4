//! # Quote Desk Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        quote-desk                                       │
//! │                                                                         │
//! │  caller (UI, script) ──stdin──► JSON command ──► QuoteState             │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                              quote-core engine          │
//! │                                                     │                   │
//! │  caller ◄──stdout── JSON reply ◄────────────────────┘                   │
//! │                                                                         │
//! │  logs ──stderr──►                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status is non-zero when startup fails (bad configuration) or the
//! reply channel breaks.

use std::process::ExitCode;

fn main() -> ExitCode {
    match quote_desk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("quote-desk failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
