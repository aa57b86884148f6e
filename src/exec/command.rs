// src/exec/command.rs

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TaskConfig;

/// Run one task's command through the platform shell and return its stdout,
/// with trailing whitespace trimmed.
///
/// A spawn error or a non-zero exit status is an error, which the bounded
/// executor records as a failed slot.
pub async fn run_command(task: TaskConfig) -> Result<String> {
    info!(task = %task.name, cmd = %task.cmd, "starting task process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&task.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&task.cmd);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = cmd
        .output()
        .await
        .with_context(|| format!("spawning process for task '{}'", task.name))?;

    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(task = %task.name, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        task = %task.name,
        exit_code = code,
        success = output.status.success(),
        "task process exited"
    );

    if !output.status.success() {
        bail!("task '{}' exited with code {}", task.name, code);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}
