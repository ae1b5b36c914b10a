//! Server process supervision.
//!
//! Owns the child OS process: spawn with piped stdio, background stderr
//! drain, liveness check, and graceful-then-forced stop. The stdin/stdout
//! pair is handed out exactly once, to the protocol client during connect.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::types::{Error, Result, ServerConfig};

/// Stderr lines matching these markers are framework banners, not errors.
const NOISE_MARKERS: &[&str] = &["SLF4J", "INFO:"];

/// Interpreter name for the host platform. Pure lookup, no probing.
pub fn default_interpreter() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Supervises at most one child server process.
#[derive(Debug)]
pub struct ProcessSupervisor {
    child: Option<Child>,
    interpreter: Option<String>,
    stop_grace: Duration,
}

impl ProcessSupervisor {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            child: None,
            interpreter: config.interpreter.clone(),
            stop_grace: config.stop_grace,
        }
    }

    /// Interpreter this supervisor will launch.
    pub fn interpreter(&self) -> &str {
        self.interpreter.as_deref().unwrap_or_else(|| default_interpreter())
    }

    /// Spawn the server process and return its stdio streams.
    ///
    /// Starting while a child is already held is a caller bug and fails fast
    /// with `AlreadyRunning` rather than queuing or replacing the process.
    pub fn start(&mut self, script_path: &Path) -> Result<(ChildStdin, ChildStdout)> {
        if self.child.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let interpreter = self.interpreter().to_string();
        info!("starting MCP server: {} {}", interpreter, script_path.display());

        let mut child = Command::new(&interpreter)
            .arg(script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| Error::process_start(format!("failed to spawn {interpreter}: {err}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::process_start("child stdin was not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::process_start("child stdout was not piped"))?;

        if let Some(stderr) = child.stderr.take() {
            drain_stderr(stderr);
        }

        self.child = Some(child);
        Ok((stdin, stdout))
    }

    /// True only if a child is held and the OS reports it alive.
    /// Never an error: false before start and after stop.
    pub fn is_healthy(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Stop the child process. Idempotent.
    ///
    /// Tries graceful termination first and escalates to a forced kill once
    /// the grace window expires. The handle is always cleared; termination
    /// errors are logged, never propagated.
    pub async fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        terminate(&mut child);

        match tokio::time::timeout(self.stop_grace, child.wait()).await {
            Ok(Ok(status)) => info!("MCP server process exited: {status}"),
            Ok(Err(err)) => warn!("error waiting for server process exit: {err}"),
            Err(_) => {
                warn!(
                    "server process did not exit within {:?}, killing",
                    self.stop_grace
                );
                if let Err(err) = child.kill().await {
                    warn!("failed to kill server process: {err}");
                }
            }
        }
    }
}

/// Ask the child to terminate without forcing it.
#[cfg(unix)]
fn terminate(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        match i32::try_from(pid) {
            Ok(pid) => {
                if let Err(err) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
                    debug!("SIGTERM delivery failed: {err}");
                }
            }
            Err(_) => debug!("pid {pid} out of range for signal delivery"),
        }
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        debug!("terminate request failed: {err}");
    }
}

/// Forward the child's stderr to the log sink on a background task.
///
/// Runs for the lifetime of the process and ends silently when the stream
/// closes on exit. Holds no shared state beyond the log sink.
fn drain_stderr(stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !NOISE_MARKERS.iter().any(|marker| line.contains(marker)) {
                        warn!("MCP server stderr: {line}");
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    debug!("stderr drain ended: {err}");
                    break;
                }
            }
        }
    });
}
