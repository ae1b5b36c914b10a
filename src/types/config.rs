//! Configuration structures.
//!
//! Every knob has a working default; loading from a file or environment is
//! optional for callers that need overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Global configuration for the inspector core.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server process configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Connection lifecycle configuration.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Environment diagnostics configuration.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interpreter used to run the server script. `None` resolves per
    /// platform: `python` on Windows, `python3` elsewhere.
    pub interpreter: Option<String>,

    /// Delay after spawn before the health check, giving the interpreter
    /// time to fail fast on import errors.
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,

    /// Grace window between graceful termination and forced kill.
    #[serde(with = "humantime_serde")]
    pub stop_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            settle_delay: Duration::from_millis(500),
            stop_grace: Duration::from_secs(2),
        }
    }
}

/// Connection lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hard deadline for the whole connect sequence (spawn, handshake,
    /// tool discovery). A hung child becomes an observable, retryable error.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Environment diagnostics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Run the interpreter/package probe automatically when a connect
    /// attempt ends in the Error state.
    pub run_on_error: bool,

    /// Per-probe subprocess deadline.
    #[serde(with = "humantime_serde")]
    pub probe_timeout: Duration,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            run_on_error: true,
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
