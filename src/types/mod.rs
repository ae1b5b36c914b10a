//! Core types for the MCP inspector core.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the server process, connection
//!   lifecycle, and diagnostics

mod config;
mod errors;

pub use config::{Config, ConnectionConfig, DiagnosticsConfig, ObservabilityConfig, ServerConfig};
pub use errors::{Error, Result};
