//! Observability utilities.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber once for the process.
///
/// Filter comes from `RUST_LOG` (default `info`); `MCP_LOG_FORMAT=json`
/// switches from compact text to JSON lines. Safe to call from multiple
/// entry points: later calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json_format = std::env::var("MCP_LOG_FORMAT")
            .is_ok_and(|value| value.eq_ignore_ascii_case("json"));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json_format {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer().compact()).try_init()
        };

        // A host application may have installed its own subscriber already
        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
