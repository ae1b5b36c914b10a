//! Bundled server script extraction.
//!
//! The orchestrator treats the script provider as an opaque path producer.
//! The default implementation embeds the demo server at build time and
//! materializes it to a temp file on first use; the file lives as long as
//! the source and is removed on drop.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempPath;
use tracing::info;

use crate::types::{Error, Result};

#[cfg_attr(test, mockall::automock)]
pub trait ScriptSource: Send + Sync {
    /// Path to a runnable server script.
    fn server_script(&self) -> Result<PathBuf>;
}

/// Demo MCP server embedded in the binary.
const SERVER_SCRIPT: &str = include_str!("../resources/server.py");

/// Extracts the bundled server script to a temporary file, once.
#[derive(Debug, Default)]
pub struct BundledServerScript {
    extracted: Mutex<Option<TempPath>>,
}

impl BundledServerScript {
    pub fn new() -> Self {
        Self::default()
    }

    fn extract() -> Result<TempPath> {
        let mut file = tempfile::Builder::new()
            .prefix("mcp-server")
            .suffix(".py")
            .tempfile()
            .map_err(|err| Error::resource_missing(format!("temp file creation failed: {err}")))?;
        file.write_all(SERVER_SCRIPT.as_bytes())
            .map_err(|err| Error::resource_missing(format!("script extraction failed: {err}")))?;

        let path = file.into_temp_path();
        info!("extracted MCP server to {}", path.display());
        Ok(path)
    }
}

impl ScriptSource for BundledServerScript {
    fn server_script(&self) -> Result<PathBuf> {
        let mut guard = self
            .extracted
            .lock()
            .map_err(|_| Error::resource_missing("script cache poisoned"))?;
        if guard.is_none() {
            *guard = Some(Self::extract()?);
        }
        match guard.as_ref() {
            Some(path) => Ok(path.to_path_buf()),
            None => Err(Error::resource_missing("script extraction yielded no path")),
        }
    }
}
