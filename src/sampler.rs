use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;

use crate::color;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleResult {
    #[serde(rename = "sRGBHex")]
    pub srgb_hex: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("color sampling is not supported in this environment")]
    Unsupported,
    #[error("color sampling was cancelled")]
    Cancelled,
    #[error("color sampling failed: {0}")]
    Failed(String),
}

/// Platform eyedropper. Availability must be checked before `open`.
#[allow(async_fn_in_trait)]
pub trait Sampler {
    fn is_available(&self) -> bool;
    async fn open(&self) -> Result<SampleResult, SampleError>;
}

/// Runs an external picker program and reads a `#rrggbb` token from its
/// stdout. A non-zero exit counts as the user cancelling.
#[derive(Debug, Clone, Default)]
pub struct CommandSampler {
    command: Option<Vec<String>>,
}

impl CommandSampler {
    pub fn new(command_line: Option<&str>) -> Self {
        let command = command_line
            .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }

    pub fn unavailable() -> Self {
        Self { command: None }
    }
}

impl Sampler for CommandSampler {
    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    async fn open(&self) -> Result<SampleResult, SampleError> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            return Err(SampleError::Unsupported);
        };
        debug!("Launching sampler '{}'", program);
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| SampleError::Failed(format!("failed to launch {}: {}", program, e)))?;
        if !output.status.success() {
            return Err(SampleError::Cancelled);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = stdout.trim();
        match color::normalize_token(token) {
            Some(srgb_hex) => Ok(SampleResult { srgb_hex }),
            None => Err(SampleError::Failed(format!("unexpected sampler output '{}'", token))),
        }
    }
}
