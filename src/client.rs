//! Protocol client boundary.
//!
//! The wire-level MCP implementation (framing, handshake bytes, request
//! correlation) lives behind this trait and is supplied by the embedding
//! application. The orchestrator only ever hands a fresh client the child's
//! stdio streams and drives the four operations below.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::process::{ChildStdin, ChildStdout};

use crate::types::Result;

/// Raw tool descriptor as reported by the remote server's `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's arguments, passed through verbatim.
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Value,
}

/// One segment of a tool call result.
///
/// Only text segments carry output the executor cares about; everything else
/// (images, embedded resources) is preserved as `Other` and skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentSegment {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl ContentSegment {
    /// Text payload, if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentSegment::Text { text } => Some(text),
            ContentSegment::Other => None,
        }
    }
}

/// Client side of the tool-invocation protocol.
///
/// One client instance serves exactly one connection; the orchestrator
/// creates a fresh one per connect and drops it on disconnect.
#[async_trait]
pub trait ProtocolClient: Send {
    /// Perform the handshake over the child process's stdio streams.
    async fn connect(&mut self, stdin: ChildStdin, stdout: ChildStdout) -> Result<()>;

    /// Fetch the remote tool descriptors.
    async fn list_tools(&mut self) -> Result<Vec<RawTool>>;

    /// Invoke a remote tool with already-typed arguments.
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Vec<ContentSegment>>;

    /// Close the connection. Best-effort; callers log and move on.
    async fn close(&mut self) -> Result<()>;
}

/// Factory producing a fresh client for each connect attempt.
pub type ClientFactory = Box<dyn Fn() -> Box<dyn ProtocolClient> + Send + Sync>;
