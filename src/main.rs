//! mcp-doctor — environment diagnostics for MCP server connections.
//!
//! Checks that the server interpreter is on PATH and that the MCP package is
//! importable, then prints the report. Exits non-zero when a probe fails so
//! it can gate CI or setup scripts.

use std::time::Duration;

use clap::Parser;
use mcp_inspector_core::diagnostics;
use mcp_inspector_core::process::default_interpreter;

#[derive(Parser, Debug)]
#[command(name = "mcp-doctor", about = "Diagnose MCP server runtime requirements")]
struct Args {
    /// Interpreter to probe (defaults to the platform's python)
    #[arg(long, env = "MCP_INTERPRETER")]
    interpreter: Option<String>,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout: u64,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    mcp_inspector_core::observability::init_tracing();

    let args = Args::parse();
    let interpreter = args
        .interpreter
        .unwrap_or_else(|| default_interpreter().to_string());

    let report =
        diagnostics::run(&interpreter, Duration::from_secs(args.probe_timeout)).await;
    print!("{}", report.to_display());

    if report.interpreter_available && report.package_installed {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    }
}
