//! Process-wide tracing setup for the bridge binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// `RUST_LOG` when it parses, otherwise [`DEFAULT_FILTER`].
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber: compact single-line events, RFC3339
/// timestamps, ANSI colors only on a terminal.
pub fn init() -> Result<(), TryInitError> {
    let use_ansi = io::stdout().is_terminal();

    let fmt_layer = fmt::layer()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_ansi(use_ansi);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
}
