use std::process::Stdio;

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Pipes the copied text into a clipboard program such as `wl-copy`.
#[derive(Debug, Clone, Default)]
pub struct CommandClipboard {
    command: Option<Vec<String>>,
}

impl CommandClipboard {
    pub fn new(command_line: Option<&str>) -> Self {
        let command = command_line
            .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }
}

impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let (program, args) = self
            .command
            .as_ref()
            .and_then(|c| c.split_first())
            .ok_or_else(|| anyhow!("no clipboard command configured"))?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch {}", program))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        let status = child.wait().await?;
        if !status.success() {
            bail!("{} exited with {}", program, status);
        }
        Ok(())
    }
}
