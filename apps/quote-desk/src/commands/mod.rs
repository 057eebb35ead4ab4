//! # Commands Module
//!
//! The line protocol spoken over stdin/stdout.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (wire types, dispatch)
//! ├── quote.rs    ◄─── Draft editing, invoice recomputation
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin (one JSON object per line)                                       │
//! │  ────────────────────────────────                                       │
//! │  {"command":"add_service","id":"cr-registration"}                       │
//! │  {"command":"set_fast_track","enabled":true}                            │
//! │  {"command":"apply_promo","code":"welcome10"}                           │
//! │  {"command":"set_currency","currency":"USD"}                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  handle_line ──► ShellCommand ──► dispatch ──► quote::* / config::*     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout (one JSON object per line)                                      │
//! │  ─────────────────────────────────                                      │
//! │  {"ok":{"draft":{...},"invoice":{...},"upsells":[...]}}                 │
//! │  {"error":{"code":"NOT_FOUND","message":"Service not found: x"}}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod quote;

use quote_core::Currency;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;
use crate::state::{ConfigState, QuoteState};

use self::config::ConfigResponse;
use self::quote::QuoteResponse;

/// One request line, tagged by `"command"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ShellCommand {
    AddService { id: String },
    RemoveService { id: String },
    SetFastTrack { enabled: bool },
    ApplyPromo { code: String },
    ClearPromo,
    SetCurrency { currency: Currency },
    ClearQuote,
    GetQuote,
    GetConfig,
}

/// Successful command payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Quote(Box<QuoteResponse>),
    Config(Box<ConfigResponse>),
}

/// One reply line: `{"ok": ...}` or `{"error": {code, message}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Ok(CommandOutput),
    Error(ApiError),
}

impl From<Result<CommandOutput, ApiError>> for Reply {
    fn from(result: Result<CommandOutput, ApiError>) -> Self {
        match result {
            Ok(output) => Reply::Ok(output),
            Err(err) => Reply::Error(err),
        }
    }
}

/// Runs a parsed command against the state.
pub fn dispatch(
    command: ShellCommand,
    quote: &QuoteState,
    config: &ConfigState,
) -> Result<CommandOutput, ApiError> {
    let response = match command {
        ShellCommand::GetConfig => {
            return Ok(CommandOutput::Config(Box::new(self::config::get_config(config))))
        }
        ShellCommand::AddService { id } => quote::add_service(quote, config, id),
        ShellCommand::RemoveService { id } => quote::remove_service(quote, config, id),
        ShellCommand::SetFastTrack { enabled } => quote::set_fast_track(quote, config, enabled),
        ShellCommand::ApplyPromo { code } => quote::apply_promo(quote, config, code),
        ShellCommand::ClearPromo => quote::clear_promo(quote, config),
        ShellCommand::SetCurrency { currency } => quote::set_currency(quote, config, currency),
        ShellCommand::ClearQuote => quote::clear_quote(quote, config),
        ShellCommand::GetQuote => quote::get_quote(quote, config),
    }?;

    Ok(CommandOutput::Quote(Box::new(response)))
}

/// Parses and runs one request line.
pub fn handle_line(line: &str, quote: &QuoteState, config: &ConfigState) -> Reply {
    let result = serde_json::from_str::<ShellCommand>(line)
        .map_err(ApiError::from)
        .and_then(|command| dispatch(command, quote, config));

    if let Err(err) = &result {
        warn!(code = ?err.code, message = %err.message, "Command failed");
    }

    Reply::from(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn setup() -> (QuoteState, ConfigState) {
        let config = ConfigState::builtin().unwrap();
        (QuoteState::new(config.default_currency()), config)
    }

    fn run(line: &str, quote: &QuoteState, config: &ConfigState) -> Value {
        serde_json::to_value(handle_line(line, quote, config)).unwrap()
    }

    #[test]
    fn test_command_parsing() {
        let parsed: ShellCommand =
            serde_json::from_str(r#"{"command":"set_currency","currency":"USD"}"#).unwrap();
        assert_eq!(
            parsed,
            ShellCommand::SetCurrency {
                currency: Currency::Usd
            }
        );

        let parsed: ShellCommand = serde_json::from_str(r#"{"command":"clear_quote"}"#).unwrap();
        assert_eq!(parsed, ShellCommand::ClearQuote);
    }

    #[test]
    fn test_session_over_the_wire() {
        let (quote, config) = setup();

        let reply = run(r#"{"command":"add_service","id":"cr-registration"}"#, &quote, &config);
        assert_eq!(reply["ok"]["invoice"]["grandTotal"], 5_175);
        assert_eq!(reply["ok"]["draft"]["cart"], json!(["cr-registration"]));

        let reply = run(r#"{"command":"set_fast_track","enabled":true}"#, &quote, &config);
        assert_eq!(reply["ok"]["invoice"]["fastTrackSurcharge"], 1_125);

        let reply = run(r#"{"command":"apply_promo","code":"bogus"}"#, &quote, &config);
        assert_eq!(reply["ok"]["promoMessage"], "Promo code BOGUS is not valid");
        assert_eq!(reply["ok"]["invoice"]["promo"]["status"], "invalid");

        let reply = run(r#"{"command":"get_quote"}"#, &quote, &config);
        assert!(reply["ok"].get("promoMessage").is_none());
    }

    #[test]
    fn test_get_config_over_the_wire() {
        let (quote, config) = setup();
        let reply = run(r#"{"command":"get_config"}"#, &quote, &config);
        assert_eq!(reply["ok"]["rates"]["usdExchange"], "0.2666");
    }

    #[test]
    fn test_errors_over_the_wire() {
        let (quote, config) = setup();

        let reply = run(r#"{"command":"add_service","id":"ghost"}"#, &quote, &config);
        assert_eq!(reply["error"]["code"], "NOT_FOUND");

        let reply = run(r#"{"command":"launch_rockets"}"#, &quote, &config);
        assert_eq!(reply["error"]["code"], "INVALID_COMMAND");

        let reply = run("not json", &quote, &config);
        assert_eq!(reply["error"]["code"], "INVALID_COMMAND");

        let reply = run(r#"{"command":"set_currency","currency":"EUR"}"#, &quote, &config);
        assert_eq!(reply["error"]["code"], "INVALID_COMMAND");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commands_share_one_draft() {
        let (quote, config) = setup();
        let ids = [
            "misa-license",
            "cr-registration",
            "articles-of-association",
            "chamber-membership",
            "national-address",
        ];

        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let quote = quote.clone();
                let config = config.clone();
                let line = format!(r#"{{"command":"add_service","id":"{}"}}"#, id);
                tokio::spawn(async move { handle_line(&line, &quote, &config) })
            })
            .collect();

        for handle in handles {
            assert!(matches!(handle.await.unwrap(), Reply::Ok(_)));
        }

        let reply = run(r#"{"command":"get_quote"}"#, &quote, &config);
        assert_eq!(reply["ok"]["invoice"]["lineItems"].as_array().unwrap().len(), ids.len());
        // formation-starter 2500 + post-cr-essentials 1000
        assert_eq!(reply["ok"]["invoice"]["bundleDiscount"], 3_500);
    }
}
