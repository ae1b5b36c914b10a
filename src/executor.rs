//! Tool invocation — validation, coercion, remote call, outcome mapping.
//!
//! Every failure is materialized as `InvocationOutcome::Error`; nothing
//! raises past this boundary. The remote call itself carries no independent
//! deadline — it relies on the call's own blocking semantics, a known
//! limitation of this design.

use std::collections::HashMap;

use tracing::{error, info};

use crate::coerce;
use crate::connection::McpConnection;
use crate::types::Error;

/// Result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success { output: String },
    Error { message: String },
}

impl McpConnection {
    /// Invoke a remote tool with raw string parameters.
    ///
    /// Order of checks: live connection, required parameters, coercion,
    /// remote call. Validation failures short-circuit without contacting the
    /// remote process. On success the output is the newline-join of all text
    /// segments; non-text segments are ignored.
    pub async fn invoke_tool(
        &mut self,
        tool_name: &str,
        raw_params: &HashMap<String, String>,
    ) -> InvocationOutcome {
        if self.client.is_none() {
            return InvocationOutcome::Error {
                message: Error::NotConnected.to_string(),
            };
        }

        // An unknown tool validates against an empty schema; the remote call
        // reports its own error for the name.
        let (parameter_specs, required) = self
            .catalog
            .get(tool_name)
            .map(|tool| (tool.parameters.clone(), tool.required.clone()))
            .unwrap_or_default();
        let violations = coerce::validate_required(raw_params, &required);
        if !violations.is_empty() {
            return InvocationOutcome::Error {
                message: format!("Validation failed:\n{}", violations.join("\n")),
            };
        }

        let arguments = coerce::coerce(raw_params, &parameter_specs);
        info!("invoking tool {tool_name} with {} arguments", arguments.len());

        let Some(client) = self.client.as_mut() else {
            return InvocationOutcome::Error {
                message: Error::NotConnected.to_string(),
            };
        };

        match client.call_tool(tool_name, arguments).await {
            Ok(segments) => {
                let output = segments
                    .iter()
                    .filter_map(|segment| segment.as_text())
                    .collect::<Vec<_>>()
                    .join("\n");
                info!("tool {tool_name} executed successfully");
                InvocationOutcome::Success { output }
            }
            Err(err) => {
                error!("failed to invoke tool {tool_name}: {err}");
                let message = err.to_string();
                InvocationOutcome::Error {
                    message: if message.is_empty() {
                        "Unknown error".to_string()
                    } else {
                        message
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientFactory;
    use crate::resources::MockScriptSource;
    use crate::types::Config;

    fn idle_connection() -> McpConnection {
        let mut source = MockScriptSource::new();
        source
            .expect_server_script()
            .returning(|| Err(Error::resource_missing("unused")));
        let factory: ClientFactory =
            Box::new(|| unreachable!("no client is created in these tests"));
        let mut config = Config::default();
        config.diagnostics.run_on_error = false;
        McpConnection::new(config, Box::new(source), factory)
    }

    #[tokio::test]
    async fn invoke_without_connection_short_circuits() {
        let mut conn = idle_connection();
        let outcome = conn.invoke_tool("echo", &HashMap::new()).await;
        assert_eq!(
            outcome,
            InvocationOutcome::Error {
                message: "Not connected to MCP server".to_string()
            }
        );
    }
}
