//! Environment diagnostics for connection troubleshooting.
//!
//! Shells out to check that the server interpreter exists and that the MCP
//! package is importable. Both probes are bounded; a probe that fails or
//! times out is a negative finding, never an error.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

/// Outcome of the interpreter/package probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub interpreter_available: bool,
    pub interpreter_version: Option<String>,
    pub package_installed: bool,
    pub error_message: Option<String>,
}

impl DiagnosticReport {
    /// Human-readable rendering for observers.
    pub fn to_display(&self) -> String {
        let mut out = String::from("MCP connection diagnostics:\n");

        out.push_str("  interpreter: ");
        match &self.interpreter_version {
            Some(version) if self.interpreter_available => {
                out.push_str(version);
                out.push('\n');
            }
            _ => out.push_str("not found\n"),
        }

        out.push_str("  mcp package: ");
        out.push_str(if self.package_installed {
            "installed\n"
        } else {
            "not installed\n"
        });

        if let Some(message) = &self.error_message {
            out.push_str(message);
            out.push('\n');
        }

        if !self.package_installed {
            out.push_str("To install: pip install mcp\n");
        }

        out
    }
}

/// Run both probes against the given interpreter.
pub async fn run(interpreter: &str, probe_timeout: Duration) -> DiagnosticReport {
    let version = check_interpreter(interpreter, probe_timeout).await;

    let Some(version) = version else {
        return DiagnosticReport {
            interpreter_available: false,
            interpreter_version: None,
            package_installed: false,
            error_message: Some(format!("{interpreter} is not installed or not in PATH")),
        };
    };

    let package_installed = check_mcp_package(interpreter, probe_timeout).await;
    let error_message =
        (!package_installed).then(|| "MCP package not installed. Run: pip install mcp".to_string());

    DiagnosticReport {
        interpreter_available: true,
        interpreter_version: Some(version),
        package_installed,
        error_message,
    }
}

/// `<interpreter> --version`, returning the banner on success.
async fn check_interpreter(interpreter: &str, probe_timeout: Duration) -> Option<String> {
    let output = tokio::time::timeout(
        probe_timeout,
        Command::new(interpreter)
            .arg("--version")
            .stdin(Stdio::null())
            .output(),
    )
    .await;

    match output {
        Ok(Ok(output)) if output.status.success() => {
            // Some interpreters print the version banner on stderr
            let banner = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).trim().to_string()
            } else {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            };
            info!("interpreter check: {banner}");
            Some(banner)
        }
        Ok(Ok(output)) => {
            debug!("interpreter check exited with {}", output.status);
            None
        }
        Ok(Err(err)) => {
            debug!("interpreter check failed: {err}");
            None
        }
        Err(_) => {
            debug!("interpreter check timed out after {probe_timeout:?}");
            None
        }
    }
}

/// Import probe for the server-side MCP package.
async fn check_mcp_package(interpreter: &str, probe_timeout: Duration) -> bool {
    let output = tokio::time::timeout(
        probe_timeout,
        Command::new(interpreter)
            .arg("-c")
            .arg("import mcp.server.fastmcp")
            .stdin(Stdio::null())
            .output(),
    )
    .await;

    match output {
        Ok(Ok(output)) if output.status.success() => true,
        Ok(Ok(output)) => {
            debug!(
                "mcp package check failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Ok(Err(err)) => {
            debug!("mcp package check failed: {err}");
            false
        }
        Err(_) => {
            debug!("mcp package check timed out after {probe_timeout:?}");
            false
        }
    }
}
