use anyhow::{anyhow, Result};
use std::process::{Command, Stdio};

/// Spawn a command line detached from the window manager. The line is split
/// on whitespace; no shell is involved.
pub fn spawn(cmdline: &str) -> Result<()> {
    let mut parts = cmdline.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("empty spawn command"))?;

    Command::new(program)
        .args(parts)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow!("Failed to spawn {}: {}", program, e))?;

    Ok(())
}
