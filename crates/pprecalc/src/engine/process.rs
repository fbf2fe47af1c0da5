use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use super::args::build_args;
use super::{ComputeEngine, ComputeRequest};
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Size of the little-endian f32 at the end of the engine's output
pub const RESULT_SIZE: usize = 4;

/// Interpret the last four bytes of `output` as a little-endian f32.
pub fn parse_binary_tail(output: &[u8]) -> Result<f32> {
    let tail = output
        .len()
        .checked_sub(RESULT_SIZE)
        .map(|start| &output[start..])
        .ok_or(Error::EngineOutputTooShort(output.len()))?;

    let mut bytes = [0u8; RESULT_SIZE];
    bytes.copy_from_slice(tail);
    Ok(f32::from_le_bytes(bytes))
}

/// Runs the external pp calculator once per request
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    path: PathBuf,
    timeout: Duration,
}

impl ProcessEngine {
    pub fn new<P: Into<PathBuf>>(path: P, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.path.clone(), config.timeout())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ComputeEngine for ProcessEngine {
    async fn compute(&self, request: &ComputeRequest) -> Result<f32> {
        let args = build_args(request);
        debug!("Running {} {:?}", self.path.display(), args);

        let child = Command::new(&self.path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::EngineSpawnFailed(format!("{}: {}", self.path.display(), e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::EngineTimedOut(self.timeout))??;

        if !output.status.success() {
            warn!(
                "Compute engine exited with {} for {}: {}",
                output.status,
                request.map_path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        parse_binary_tail(&output.stdout)
    }
}
