use anyhow::{Context, Result};
use std::env;
use std::process::{Command, Stdio};

/// Runs `cmd_str` through `shell_cmd` and returns its exit status.
///
/// A process terminated by a signal has no status; that counts as 1.
pub fn run_shell_command(cmd_str: &str, shell_cmd: &str) -> Result<i32> {
    // Simple heuristic: "cmd" or "cmd.exe" uses /C, others use -c
    let flag = if shell_cmd.contains("cmd") && !shell_cmd.contains("sh") {
        "/C"
    } else {
        "-c"
    };

    let status = Command::new(shell_cmd)
        .arg(flag)
        .arg(cmd_str)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to spawn shell process '{}'", shell_cmd))?;

    Ok(status.code().unwrap_or(1))
}

pub fn detect_shell(config_shell: Option<&String>) -> String {
    config_shell
        .cloned()
        .or_else(|| env::var("SHELL").ok())
        .unwrap_or_else(|| if cfg!(windows) { "cmd".to_string() } else { "sh".to_string() })
}
