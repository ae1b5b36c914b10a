//! Connection lifecycle orchestration.
//!
//! Owns the single live connection and drives the state machine:
//!
//! ```text
//! Disconnected --connect()--> Connecting --success--> Connected{tool_count}
//!                                  |--timeout/failure--> Error{message}
//! Connected --disconnect()--> Disconnected
//! Error --connect()--> Connecting          (retry always permitted)
//! ```
//!
//! Failures during connect never raise past `connect()`; they collapse into
//! the `Error` state followed by an implicit teardown, so the process handle
//! and catalog are never inconsistent with the reported state. State changes
//! are published through a watch channel; `Error` is observable after the
//! teardown and only an explicit `disconnect()` resets to `Disconnected`.

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::catalog::{ToolCatalog, ToolSpec};
use crate::client::{ClientFactory, ProtocolClient};
use crate::diagnostics::{self, DiagnosticReport};
use crate::process::ProcessSupervisor;
use crate::resources::ScriptSource;
use crate::types::{Config, Error, Result};

/// Connection status as seen by observers. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { tool_count: usize },
    Error { message: String },
}

/// Orchestrates the child process, protocol client, and tool catalog for
/// one connection at a time.
///
/// Construct once and share by handle; the `&mut self` operations plus the
/// state-machine early returns enforce "at most one connect in flight"
/// without a lock.
pub struct McpConnection {
    config: Config,
    supervisor: ProcessSupervisor,
    script_source: Box<dyn ScriptSource>,
    make_client: ClientFactory,
    pub(crate) client: Option<Box<dyn ProtocolClient>>,
    pub(crate) catalog: ToolCatalog,
    state_tx: watch::Sender<ConnectionState>,
    last_diagnostics: Option<DiagnosticReport>,
}

impl std::fmt::Debug for McpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpConnection")
            .field("state", &*self.state_tx.borrow())
            .field("tool_count", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl McpConnection {
    pub fn new(
        config: Config,
        script_source: Box<dyn ScriptSource>,
        make_client: ClientFactory,
    ) -> Self {
        let supervisor = ProcessSupervisor::new(&config.server);
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            supervisor,
            script_source,
            make_client,
            client: None,
            catalog: ToolCatalog::new(),
            state_tx,
            last_diagnostics: None,
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ConnectionState {
        self.state_tx.borrow().clone()
    }

    /// Tools from the current catalog, in server listing order.
    pub fn tools(&self) -> &[ToolSpec] {
        self.catalog.tools()
    }

    /// True while a handshaken client is held.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Liveness of the supervised server process.
    pub fn process_healthy(&mut self) -> bool {
        self.supervisor.is_healthy()
    }

    /// Diagnostic report captured on the most recent failed connect.
    pub fn last_diagnostics(&self) -> Option<&DiagnosticReport> {
        self.last_diagnostics.as_ref()
    }

    /// Connect to the MCP server under the configured hard deadline.
    ///
    /// No-op (with a warning) when already connected or connecting. All
    /// failures surface as the `Error` state, never as a return value.
    pub async fn connect(&mut self) {
        match self.state() {
            ConnectionState::Connected { .. } => {
                warn!("connect ignored: already connected");
                return;
            }
            ConnectionState::Connecting => {
                warn!("connect ignored: connection already in progress");
                return;
            }
            ConnectionState::Disconnected | ConnectionState::Error { .. } => {}
        }

        self.last_diagnostics = None;
        self.set_state(ConnectionState::Connecting);

        let deadline = self.config.connection.connect_timeout;
        match tokio::time::timeout(deadline, self.connect_inner()).await {
            Ok(Ok(tool_count)) => {
                info!("connected to MCP server with {tool_count} tools");
                self.set_state(ConnectionState::Connected { tool_count });
            }
            Ok(Err(err)) => {
                error!("failed to connect to MCP server: {err}");
                self.fail_connect(err.to_string()).await;
            }
            Err(_) => {
                error!("connection attempt exceeded {deadline:?}");
                self.fail_connect(Error::Timeout.to_string()).await;
            }
        }
    }

    /// The success path: script → spawn → settle → health check → handshake
    /// → tool discovery → catalog.
    async fn connect_inner(&mut self) -> Result<usize> {
        let script = self.script_source.server_script()?;
        let (stdin, stdout) = self.supervisor.start(&script)?;

        // Give the interpreter a moment to fail fast on import errors
        tokio::time::sleep(self.config.server.settle_delay).await;
        if !self.supervisor.is_healthy() {
            return Err(Error::process_start("server process exited during startup"));
        }

        let mut client = (self.make_client)();
        client.connect(stdin, stdout).await?;

        let raw_tools = client.list_tools().await?;
        self.catalog = ToolCatalog::from_remote_schema(&raw_tools);
        self.client = Some(client);
        Ok(self.catalog.len())
    }

    /// Publish the `Error` state, tear down, and capture diagnostics.
    ///
    /// Teardown here deliberately leaves the `Error` state in place; only an
    /// explicit `disconnect()` resets to `Disconnected`.
    async fn fail_connect(&mut self, message: String) {
        self.set_state(ConnectionState::Error { message });
        self.teardown().await;

        if self.config.diagnostics.run_on_error {
            let report = diagnostics::run(
                self.supervisor.interpreter(),
                self.config.diagnostics.probe_timeout,
            )
            .await;
            warn!("{}", report.to_display());
            self.last_diagnostics = Some(report);
        }
    }

    /// Disconnect from the MCP server.
    ///
    /// Always succeeds from the caller's point of view: client close errors
    /// are logged, the process is stopped, the catalog cleared, and the state
    /// reset unconditionally.
    pub async fn disconnect(&mut self) {
        self.teardown().await;
        self.last_diagnostics = None;
        self.set_state(ConnectionState::Disconnected);
    }

    /// Release the client, stop the process, and clear the catalog without
    /// touching the published state.
    async fn teardown(&mut self) {
        if let Some(mut client) = self.client.take() {
            if let Err(err) = client.close().await {
                warn!("error closing MCP client: {err}");
            }
        }
        self.supervisor.stop().await;
        self.catalog.clear();
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MockScriptSource;

    fn no_client_factory() -> ClientFactory {
        Box::new(|| unreachable!("client must not be created before a healthy process"))
    }

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.diagnostics.run_on_error = false;
        config
    }

    fn failing_source() -> Box<MockScriptSource> {
        let mut source = MockScriptSource::new();
        source
            .expect_server_script()
            .returning(|| Err(Error::resource_missing("server.py not found in resources")));
        Box::new(source)
    }

    #[tokio::test]
    async fn starts_disconnected() {
        let conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(!conn.is_connected());
        assert!(conn.tools().is_empty());
    }

    #[tokio::test]
    async fn missing_script_yields_error_state() {
        let mut conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        conn.connect().await;

        assert_eq!(
            conn.state(),
            ConnectionState::Error {
                message: "server script unavailable: server.py not found in resources"
                    .to_string()
            }
        );
        assert!(!conn.is_connected());
        assert!(!conn.process_healthy());
        assert!(conn.tools().is_empty());
    }

    #[tokio::test]
    async fn retry_from_error_is_permitted() {
        let mut conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        conn.connect().await;
        assert!(matches!(conn.state(), ConnectionState::Error { .. }));

        // Second attempt runs the full sequence again instead of bailing out
        conn.connect().await;
        assert!(matches!(conn.state(), ConnectionState::Error { .. }));
    }

    #[tokio::test]
    async fn disconnect_from_disconnected_is_a_no_op() {
        let mut conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        conn.disconnect().await;
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_clears_error_state() {
        let mut conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        conn.connect().await;
        assert!(matches!(conn.state(), ConnectionState::Error { .. }));

        conn.disconnect().await;
        assert_eq!(conn.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn observers_see_transitions() {
        let mut conn = McpConnection::new(quiet_config(), failing_source(), no_client_factory());
        let mut receiver = conn.subscribe();

        conn.connect().await;
        // Latest value is the error; intermediate Connecting was published
        assert!(receiver.has_changed().unwrap());
        assert!(matches!(
            &*receiver.borrow_and_update(),
            ConnectionState::Error { .. }
        ));
    }
}
