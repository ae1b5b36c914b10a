//! # MCP Inspector Core — connection lifecycle orchestrator
//!
//! Drives a child process speaking the MCP tool-invocation protocol over
//! stdio: spawns and supervises it, runs the connect/disconnect state machine
//! under a hard deadline, materializes the remote tool schema into a
//! UI-agnostic catalog, and coerces free-form string parameters into
//! schema-typed values before invocation.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!   connect() ──►  │          McpConnection               │
//!   invoke_tool()  │  ┌───────────┐  ┌────────────┐       │
//!                  │  │  Process  │  │    Tool    │       │
//!                  │  │Supervisor │  │  Catalog   │       │
//!                  │  └─────┬─────┘  └────────────┘       │
//!                  │        │ stdio   ┌────────────┐      │
//!                  │        └───────► │  Protocol  │      │
//!                  │                  │   Client   │      │
//!                  │                  └────────────┘      │
//!                  └──────────┬───────────────────────────┘
//!                             ▼ watch channel
//!                      ConnectionState observers
//! ```
//!
//! The wire protocol itself lives behind the [`client::ProtocolClient`]
//! trait and is supplied by the embedding application.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod catalog;
pub mod client;
pub mod coerce;
pub mod connection;
pub mod diagnostics;
pub mod executor;
pub mod process;
pub mod resources;
pub mod types;

// Internal utilities
pub mod observability;

pub use connection::{ConnectionState, McpConnection};
pub use executor::InvocationOutcome;
pub use types::{Config, Error, Result};
