//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Connect-path errors never escape
//! `connect()` — they collapse into the `Error` connection state — and
//! invoke-path errors collapse into `InvocationOutcome::Error`. The only
//! variant intended to surface as a hard failure is `AlreadyRunning`, which
//! marks a caller bug rather than an environmental condition.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the inspector core.
#[derive(Error, Debug)]
pub enum Error {
    /// Supervisor misuse: `start` called while a child process is held.
    #[error("server process already running")]
    AlreadyRunning,

    /// The child process did not spawn or did not become healthy.
    #[error("server process failed to start: {0}")]
    ProcessStart(String),

    /// The remote side did not complete protocol negotiation.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The connect deadline expired.
    #[error("Connection timeout - server not responding")]
    Timeout,

    /// The bundled server script could not be supplied.
    #[error("server script unavailable: {0}")]
    ResourceMissing(String),

    /// Invocation attempted with no live connection.
    #[error("Not connected to MCP server")]
    NotConnected,

    /// Missing required parameters.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote tool call itself failed.
    #[error("{0}")]
    RemoteInvocation(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn process_start(msg: impl Into<String>) -> Self {
        Self::ProcessStart(msg.into())
    }

    pub fn handshake(msg: impl Into<String>) -> Self {
        Self::Handshake(msg.into())
    }

    pub fn resource_missing(msg: impl Into<String>) -> Self {
        Self::ResourceMissing(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn remote_invocation(msg: impl Into<String>) -> Self {
        Self::RemoteInvocation(msg.into())
    }
}
