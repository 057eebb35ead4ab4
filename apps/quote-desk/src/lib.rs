//! # Quote Desk Library
//!
//! The interactive shell around `quote-core`: owns the draft, loads the
//! configuration and serves a line-oriented JSON protocol.
//!
//! ## Module Organization
//! ```text
//! quote_desk/
//! ├── lib.rs          ◄─── You are here (startup & serve loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── quote.rs    ◄─── Draft state (Arc<Mutex<QuoteDraft>>)
//! │   └── config.rs   ◄─── Configuration loading
//! ├── commands/
//! │   ├── mod.rs      ◄─── Wire types, dispatch
//! │   ├── quote.rs    ◄─── Draft editing commands
//! │   └── config.rs   ◄─── get_config
//! └── error.rs        ◄─── ConfigError / ApiError
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, BufRead, Write};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::handle_line;
use state::{ConfigState, QuoteState};

/// Runs the desk until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, writing to stderr             │
/// │     • Default: info,quote=debug, overridable with RUST_LOG              │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • seeds → TOML file → QUOTE_* environment                           │
/// │     • pricing tables validated; any error aborts here                   │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • QuoteState: empty draft in the default currency                   │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • one command per stdin line, one reply per stdout line             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting quote desk");

    let config = ConfigState::load(None)?;
    let quote = QuoteState::new(config.default_currency());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let served = serve(stdin.lock(), stdout.lock(), &quote, &config)?;

    info!(commands = served, "Input closed, shutting down");
    Ok(())
}

/// Serves commands from `input` until EOF. Returns how many were handled.
///
/// Blank lines are skipped. Every other line gets exactly one reply line,
/// flushed immediately.
pub fn serve<R, W>(input: R, mut output: W, quote: &QuoteState, config: &ConfigState) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut served = 0;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = handle_line(line, quote, config);
        serde_json::to_writer(&mut output, &reply)?;
        output.write_all(b"\n")?;
        output.flush()?;

        served += 1;
        debug!(served, "Reply written");
    }

    Ok(served)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quote_core=trace` - Trace the engine only
/// - Default: `info,quote=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quote=debug"));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
